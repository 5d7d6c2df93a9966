// src/lib.rs
//! Credential generation engine and the draft-state machinery that keeps a
//! password manager front end in sync with its background host.

pub mod cli;
pub mod core;
pub mod generators;
pub mod host;
pub mod logging;
pub mod models;
pub mod storage;
pub mod sync;
pub mod utils;

pub use crate::core::config::Config;
pub use crate::generators::{compute_entropy_bits, generate_password, generate_random_words, Alphabet};
pub use crate::host::{HostError, MessageHost};
pub use crate::models::{GeneratedValue, GeneratorSettings};
