//! Error types for nexus-console
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to `anyhow` only in the binary.

use crate::access::{Feature, Role};
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },
}

/// Permission model errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Role identifier outside the closed role set
    #[error("Unknown role '{role}'")]
    UnknownRole { role: String },

    /// Feature identifier outside the closed feature set
    #[error("Invalid feature '{feature}'")]
    InvalidFeature { feature: String },

    /// Two permission keys name the same role
    #[error("Role {role} is configured more than once")]
    DuplicateRole { role: Role },

    #[error("Feature '{feature}' is not enabled for role {role}")]
    FeatureNotEnabled { role: Role, feature: Feature },

    #[error("No user is signed in")]
    NotSignedIn,
}

impl AccessError {
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Self::UnknownRole { role: role.into() }
    }

    pub fn invalid_feature(feature: impl Into<String>) -> Self {
        Self::InvalidFeature {
            feature: feature.into(),
        }
    }
}

/// Auth backend and profile store errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unauthorized: invalid or expired session")]
    Unauthorized,

    #[error("No profile found for user '{user_id}'")]
    NotFound { user_id: String },

    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}

impl SessionError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => SessionError::Unauthorized,
            _ => SessionError::Backend {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }
}

/// Console command parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for session and profile operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_from_response() {
        assert!(matches!(
            SessionError::from_response(401, ""),
            SessionError::Unauthorized
        ));

        assert!(matches!(
            SessionError::from_response(403, ""),
            SessionError::Unauthorized
        ));

        let err = SessionError::from_response(400, r#"{"code":"22P02"}"#);
        assert!(matches!(err, SessionError::Backend { status: 400, .. }));
        assert!(err.to_string().contains("22P02"));

        let err = SessionError::from_response(503, "");
        assert!(matches!(err, SessionError::Backend { status: 503, .. }));
        assert!(err.to_string().contains("HTTP 503"));

        let err = SessionError::from_response(500, "boom");
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_access_error_messages() {
        let err = AccessError::unknown_role("INTERN");
        assert!(err.to_string().contains("INTERN"));

        let err = AccessError::invalid_feature("crm");
        assert!(err.to_string().contains("crm"));

        let err = AccessError::FeatureNotEnabled {
            role: Role::Representative,
            feature: Feature::Simulator,
        };
        assert!(err.to_string().contains("simulator"));
        assert!(err.to_string().contains("REP"));
    }

    #[test]
    fn test_app_error_wraps_layers() {
        let err: AppError = AccessError::NotSignedIn.into();
        assert!(matches!(err, AppError::Access(_)));
        assert!(err.to_string().starts_with("Access error"));

        let err: AppError = CommandError::Unknown("dance".to_string()).into();
        assert!(err.to_string().contains("dance"));
    }
}
