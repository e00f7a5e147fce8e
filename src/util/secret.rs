//! Redacting wrapper for credentials
//!
//! Passwords, access tokens and the backend anon key travel through commands,
//! sessions and configuration. All of them print as `[REDACTED]`.

use serde::Deserialize;
use std::fmt;

/// Credential whose value is only reachable through [`SecretString::expose_secret`].
///
/// # Features
/// - `Debug` and `Display` print `[REDACTED]`
/// - Deserializes from a plain string, for `backend.anon_key` in config
/// - Clears its buffer on drop (best effort)
///
/// ```ignore
/// let key = SecretString::new("anon-key");
/// assert_eq!(format!("{key:?}"), "[REDACTED]");
/// let header = format!("Bearer {}", key.expose_secret());
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a password, access token or key.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The raw value, for building request headers and comparing credentials
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Whether the wrapped value is empty, e.g. an unset `SUPABASE_ANON_KEY=`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Takes ownership without copying, e.g. a password token split off an input line
impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Best effort only; copies made elsewhere are not cleared
        self.0.clear();
        self.0.shrink_to_fit();
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_printed() {
        let password = SecretString::new("password123");
        assert_eq!(format!("{:?}", password), "[REDACTED]");
        assert_eq!(format!("{}", password), "[REDACTED]");
        assert_eq!(password.expose_secret(), "password123");
    }

    #[test]
    fn test_redacted_inside_structs() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            email: &'static str,
            password: SecretString,
        }

        let creds = Credentials {
            email: "alex@nexus.ai",
            password: SecretString::from("hunter2".to_string()),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alex@nexus.ai"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_deserialize_anon_key() {
        let key: SecretString = serde_json::from_str(r#""anon-key""#).unwrap();
        assert_eq!(key.expose_secret(), "anon-key");
        assert!(!key.is_empty());
    }
}
