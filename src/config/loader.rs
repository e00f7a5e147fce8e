//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. `SUPABASE_URL` / `SUPABASE_ANON_KEY`
//! 2. Environment variables (NEXUS_CONSOLE_*)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::access::RolePermissionTable;
use crate::config::types::AppConfig;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "nexus-console.toml",
    ".nexus-console.toml",
    "~/.config/nexus-console/config.toml",
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // Configuration file: an explicit path must exist, otherwise the first
    // default path that exists wins
    if let Some(path) = config_path {
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., NEXUS_CONSOLE_BACKEND__URL, NEXUS_CONSOLE_CONSOLE__DISABLED_TAB
    // Double underscore (__) maps to nested keys (backend.url)
    builder = builder.add_source(
        Environment::with_prefix("NEXUS_CONSOLE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // Conventional backend variables
    for (env_var, key) in [
        ("SUPABASE_URL", "backend.url"),
        ("SUPABASE_ANON_KEY", "backend.anon_key"),
    ] {
        if let Ok(value) = std::env::var(env_var)
            && !value.is_empty()
        {
            builder = builder
                .set_override(key, value)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
        }
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Build the initial permission table from the seed and configured overrides
pub fn permission_table(config: &AppConfig) -> Result<RolePermissionTable, ConfigError> {
    RolePermissionTable::with_overrides(&config.permissions).map_err(|e| ConfigError::Invalid {
        message: format!("permissions: {}", e),
    })
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let url = &config.backend.url;
    if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "backend.url must start with http:// or https://, got: {}",
                url
            ),
        });
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "backend.timeout_secs must be greater than 0".to_string(),
        });
    }

    permission_table(config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Feature, FeatureSet, Role};
    use crate::config::DisabledTabPolicy;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[backend]
url = "https://nexus.example.co"
anon_key = "anon-key"

[console]
disabled_tab = "sticky"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.backend.url, "https://nexus.example.co");
        assert_eq!(
            config.backend.anon_key.as_ref().map(|k| k.expose_secret()),
            Some("anon-key")
        );
        assert_eq!(config.console.disabled_tab, DisabledTabPolicy::Sticky);
    }

    #[test]
    fn test_load_permission_overrides() {
        let toml = r#"
[permissions]
MANAGER = ["timeline", "coaching"]
"#;

        let config = load_config_from_str(toml).unwrap();
        let table = permission_table(&config).unwrap();
        assert_eq!(
            table.get(Role::Manager),
            &FeatureSet::from([Feature::Timeline, Feature::Coaching])
        );
    }

    #[test]
    fn test_unknown_feature_in_permissions() {
        let toml = r#"
[permissions]
ADMIN = ["timeline", "crm"]
"#;

        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_role_in_permissions() {
        let toml = r#"
[permissions]
AUDITOR = ["timeline"]
"#;

        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_invalid_url_error() {
        let toml = r#"
[backend]
url = "not-a-url"
"#;

        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_zero_timeout_error() {
        let toml = r#"
[backend]
timeout_secs = 0
"#;

        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.backend.url.is_empty());
        assert_eq!(config.console.prompt, "nexus> ");
    }
}
