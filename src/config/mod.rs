//! Configuration module
//!
//! Handles loading and validating configuration from TOML files and environment variables.

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str, permission_table};
pub use types::*;
