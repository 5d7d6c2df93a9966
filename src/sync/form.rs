// src/sync/form.rs
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;
use uuid::Uuid;

/// Read-only view of every field's current value, handed to validators.
pub struct FieldValues<'a, K, V> {
    values: &'a HashMap<K, Option<V>>,
}

impl<'a, K: Eq + Hash, V> FieldValues<'a, K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key).and_then(Option::as_ref)
    }
}

pub type Validator<K, V> = Box<dyn Fn(Option<&V>, &FieldValues<'_, K, V>) -> bool + Send + Sync>;

pub fn rule<K, V, F>(f: F) -> Validator<K, V>
where
    K: 'static,
    V: 'static,
    F: Fn(Option<&V>, &FieldValues<'_, K, V>) -> bool + Send + Sync + 'static,
{
    Box::new(f)
}

/// Build a validator that only looks at its own value and rejects untouched fields.
pub fn check<K, V, F>(f: F) -> Validator<K, V>
where
    K: 'static,
    V: 'static,
    F: Fn(&V) -> bool + Send + Sync + 'static,
{
    rule(move |value, _| value.map_or(false, |v| f(v)))
}

pub struct FieldSpec<K, V> {
    pub initial: Option<V>,
    pub validator: Option<Validator<K, V>>,
    pub depends_on: Vec<K>,
}

impl<K, V> FieldSpec<K, V> {
    pub fn new(initial: Option<V>) -> Self {
        Self {
            initial,
            validator: None,
            depends_on: Vec::new(),
        }
    }

    pub fn validator(mut self, validator: Validator<K, V>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn depends_on(mut self, keys: Vec<K>) -> Self {
        self.depends_on = keys;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
    /// No validator yet, e.g. still waiting on data it needs
    Pending,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Form has fields that are not valid: {fields:?}")]
pub struct ValidationError<K: Debug> {
    pub fields: Vec<K>,
}

struct Field<K, V> {
    id: String,
    validator: Option<Validator<K, V>>,
    depends_on: Vec<K>,
    validity: Validity,
}

/// Draft record of a form with per-field validity.
pub struct FormState<K, V> {
    order: Vec<K>,
    values: HashMap<K, Option<V>>,
    fields: HashMap<K, Field<K, V>>,
}

impl<K, V> FormState<K, V>
where
    K: Copy + Eq + Hash + Debug,
    V: Clone,
{
    pub fn new(specs: Vec<(K, FieldSpec<K, V>)>) -> Self {
        let form_id = Uuid::new_v4().simple().to_string();
        let mut order = Vec::with_capacity(specs.len());
        let mut values = HashMap::new();
        let mut fields = HashMap::new();

        for (index, (key, spec)) in specs.into_iter().enumerate() {
            order.push(key);
            values.insert(key, spec.initial);
            fields.insert(
                key,
                Field {
                    id: format!("field-{}-{}", &form_id[..8], index),
                    validator: spec.validator,
                    depends_on: spec.depends_on,
                    validity: Validity::Pending,
                },
            );
        }

        let mut form = Self { order, values, fields };
        for key in form.order.clone() {
            form.revalidate(key);
        }
        form
    }

    fn revalidate(&mut self, key: K) {
        let view = FieldValues { values: &self.values };
        let value = self.values.get(&key).and_then(Option::as_ref);
        if let Some(field) = self.fields.get_mut(&key) {
            field.validity = match &field.validator {
                None => Validity::Pending,
                Some(validator) if validator(value, &view) => Validity::Valid,
                Some(_) => Validity::Invalid,
            };
        }
    }

    fn dependents_of(&self, key: K) -> Vec<K> {
        self.order
            .iter()
            .copied()
            .filter(|k| *k != key && self.fields[k].depends_on.contains(&key))
            .collect()
    }

    /// Set one field and re-check it plus the fields that depend on it.
    pub fn set_field(&mut self, key: K, value: Option<V>) {
        if !self.fields.contains_key(&key) {
            log::warn!("Ignoring unknown form field {:?}", key);
            return;
        }
        self.values.insert(key, value);
        self.revalidate(key);
        for dependent in self.dependents_of(key) {
            self.revalidate(dependent);
        }
    }

    /// Install a validator once whatever it needs is available.
    pub fn set_validator(&mut self, key: K, validator: Validator<K, V>) {
        if let Some(field) = self.fields.get_mut(&key) {
            field.validator = Some(validator);
            self.revalidate(key);
        }
    }

    pub fn value(&self, key: K) -> Option<&V> {
        self.values.get(&key).and_then(Option::as_ref)
    }

    pub fn validity(&self, key: K) -> Validity {
        self.fields.get(&key).map_or(Validity::Pending, |f| f.validity)
    }

    pub fn is_valid(&self, key: K) -> bool {
        self.validity(key) == Validity::Valid
    }

    pub fn all_valid(&self) -> bool {
        self.fields.values().all(|f| f.validity == Validity::Valid)
    }

    pub fn field_id(&self, key: K) -> Option<&str> {
        self.fields.get(&key).map(|f| f.id.as_str())
    }

    /// Settled values of every field, or the keys that block submission.
    pub fn submit(&self) -> Result<HashMap<K, V>, ValidationError<K>> {
        let invalid: Vec<K> = self
            .order
            .iter()
            .copied()
            .filter(|k| !self.is_valid(*k))
            .collect();
        if !invalid.is_empty() {
            return Err(ValidationError { fields: invalid });
        }

        Ok(self
            .values
            .iter()
            .filter_map(|(k, v)| v.clone().map(|v| (*k, v)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Name,
        Password,
        Confirm,
    }

    #[test]
    fn test_all_valid_after_set() {
        let mut form: FormState<Key, String> = FormState::new(vec![(
            Key::Name,
            FieldSpec::new(None).validator(check(|v: &String| !v.is_empty())),
        )]);
        assert!(!form.all_valid());
        assert_eq!(form.validity(Key::Name), Validity::Invalid);

        form.set_field(Key::Name, Some("x".to_string()));
        assert!(form.all_valid());
    }

    #[test]
    fn test_validator_may_accept_untouched() {
        let form: FormState<Key, String> = FormState::new(vec![(
            Key::Name,
            FieldSpec::new(None).validator(rule(|value, _| value.is_none())),
        )]);
        assert!(form.all_valid());
    }

    #[test]
    fn test_missing_validator_is_pending() {
        let mut form: FormState<Key, String> =
            FormState::new(vec![(Key::Name, FieldSpec::new(Some("abc".to_string())))]);
        assert_eq!(form.validity(Key::Name), Validity::Pending);
        assert!(!form.all_valid());

        form.set_validator(Key::Name, check(|v: &String| v == "abc"));
        assert_eq!(form.validity(Key::Name), Validity::Valid);
    }

    #[test]
    fn test_dependent_field_is_rechecked() {
        let mut form: FormState<Key, String> = FormState::new(vec![
            (Key::Password, FieldSpec::new(None).validator(check(|v: &String| v.len() >= 4))),
            (
                Key::Confirm,
                FieldSpec::new(None)
                    .validator(rule(|value, fields| {
                        value.is_some() && value == fields.get(&Key::Password)
                    }))
                    .depends_on(vec![Key::Password]),
            ),
        ]);

        form.set_field(Key::Password, Some("hunter2".to_string()));
        form.set_field(Key::Confirm, Some("hunter2".to_string()));
        assert!(form.all_valid());

        // Changing the dependency invalidates the confirmation
        form.set_field(Key::Password, Some("hunter3".to_string()));
        assert_eq!(form.validity(Key::Confirm), Validity::Invalid);
        assert!(!form.all_valid());
        assert_eq!(form.value(Key::Password).map(String::as_str), Some("hunter3"));
        assert_eq!(form.value(Key::Confirm).map(String::as_str), Some("hunter2"));
    }

    #[test]
    fn test_field_ids_are_stable_and_unique() {
        let mut form: FormState<Key, String> = FormState::new(vec![
            (Key::Name, FieldSpec::new(None)),
            (Key::Password, FieldSpec::new(None)),
        ]);
        let name_id = form.field_id(Key::Name).unwrap().to_string();
        let password_id = form.field_id(Key::Password).unwrap().to_string();
        assert_ne!(name_id, password_id);

        form.set_field(Key::Name, Some("n".to_string()));
        assert_eq!(form.field_id(Key::Name), Some(name_id.as_str()));
        assert_eq!(form.field_id(Key::Confirm), None);

        let other: FormState<Key, String> = FormState::new(vec![(Key::Name, FieldSpec::new(None))]);
        assert_ne!(other.field_id(Key::Name), Some(name_id.as_str()));
    }

    #[test]
    fn test_submit() {
        let mut form: FormState<Key, String> = FormState::new(vec![
            (Key::Name, FieldSpec::new(None).validator(check(|v: &String| !v.is_empty()))),
            (Key::Password, FieldSpec::new(Some("pw".to_string())).validator(check(|_: &String| true))),
        ]);
        assert_eq!(form.submit(), Err(ValidationError { fields: vec![Key::Name] }));

        form.set_field(Key::Name, Some("vault".to_string()));
        let values = form.submit().unwrap();
        assert_eq!(values[&Key::Name], "vault");
        assert_eq!(values[&Key::Password], "pw");
    }
}
