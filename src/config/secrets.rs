//! Secret handling utilities.
//!
//! Re-exports secrecy types used for the model API key.

pub use secrecy::{ExposeSecret, SecretString};
