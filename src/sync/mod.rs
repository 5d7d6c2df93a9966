// src/sync/mod.rs
//! Draft-state machinery shared by the front-end flows.

pub mod action;
pub mod debounce;
pub mod form;

pub use action::{ActionState, ActionTracker};
pub use debounce::{CommitFn, DebouncedState};
pub use form::{check, rule, FieldSpec, FieldValues, FormState, ValidationError, Validator, Validity};
