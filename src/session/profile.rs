//! User profiles and the profile store trait

use crate::access::Role;
use crate::error::SessionResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Appraisal rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Exceeds,
    Meets,
    Developing,
    Below,
}

/// Row of the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub performance_score: Option<f64>,
    #[serde(default)]
    pub current_rating: Option<Rating>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub appraisal_period: Option<String>,
}

impl UserProfile {
    /// Profile with only the required columns set
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            territory: None,
            avatar: None,
            email: None,
            performance_score: None,
            current_rating: None,
            target: None,
            appraisal_period: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_territory(mut self, territory: impl Into<String>) -> Self {
        self.territory = Some(territory.into());
        self
    }
}

/// Profile lookup by auth user id
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile row; `SessionError::NotFound` when no row exists
    async fn get_profile(&self, user_id: &str) -> SessionResult<UserProfile>;
}

pub type SharedProfileStore = Arc<dyn ProfileStore>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile_row() {
        let json = r#"{
            "id": "rm-001",
            "name": "Alex Rivera",
            "role": "REP",
            "territory": "NE",
            "avatar": null,
            "email": "alex@nexus.ai",
            "performance_score": 92,
            "current_rating": "Exceeds",
            "target": "$1.2B",
            "appraisal_period": "Q1 2024"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, Role::Representative);
        assert_eq!(profile.avatar, None);
        assert_eq!(profile.performance_score, Some(92.0));
        assert_eq!(profile.current_rating, Some(Rating::Exceeds));
    }

    #[test]
    fn test_deserialize_minimal_row() {
        let json = r#"{"id": "u-1", "name": "Pat", "role": "MANAGER"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile, UserProfile::new("u-1", "Pat", Role::Manager));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"id": "u-1", "name": "Pat", "role": "INTERN"}"#;
        assert!(serde_json::from_str::<UserProfile>(json).is_err());
    }
}
