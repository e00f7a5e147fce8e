//! Utilities shared across the console.

mod secret;

pub use secret::SecretString;
