//! Configuration types for nexus-console
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::error::ConfigError;
use crate::util::SecretString;
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hosted backend connection settings
    pub backend: BackendConfig,

    /// Console behavior
    pub console: ConsoleConfig,

    /// Per-role seed overrides: role id -> feature ids
    pub permissions: HashMap<String, Vec<String>>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Hosted backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL (e.g., `https://xyz.supabase.co`)
    pub url: String,

    /// Public anon key (prefer env var SUPABASE_ANON_KEY)
    pub anon_key: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: None,
            timeout_secs: 30,
        }
    }
}

impl BackendConfig {
    /// Check that everything needed to reach the backend is present
    pub fn require_connection(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Missing {
                field: "backend.url (set SUPABASE_URL environment variable)".to_string(),
            });
        }
        if self.anon_key.as_ref().is_none_or(SecretString::is_empty) {
            return Err(ConfigError::Missing {
                field: "backend.anon_key (set SUPABASE_ANON_KEY environment variable)".to_string(),
            });
        }
        Ok(())
    }
}

/// Console configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// What happens to an active tab whose feature gets disabled
    pub disabled_tab: DisabledTabPolicy,

    /// Prompt printed before each command
    pub prompt: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            disabled_tab: DisabledTabPolicy::Evict,
            prompt: "nexus> ".to_string(),
        }
    }
}

/// Handling of an active tab removed from the role's enabled set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisabledTabPolicy {
    /// Re-select the active tab immediately
    #[default]
    Evict,
    /// Keep showing the tab until the user navigates away
    Sticky,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
