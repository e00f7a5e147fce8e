//! In-memory backend
//!
//! Fixture implementation of the session provider and profile store, used by
//! tests and by the console's offline mode.

use crate::access::Role;
use crate::error::{SessionError, SessionResult};
use crate::session::profile::{ProfileStore, Rating, UserProfile};
use crate::session::provider::{Session, SessionChannel, SessionProvider};
use crate::util::SecretString;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

struct Account {
    user_id: String,
    password: SecretString,
}

/// Session provider and profile store backed by maps
#[derive(Default)]
pub struct InMemoryBackend {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    profiles: HashMap<String, UserProfile>,
    latency: HashMap<String, Duration>,
    session: SessionChannel,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with the demo users, password `password123`
    pub fn demo() -> Self {
        let mut rep = UserProfile::new("u-rep", "Alex Rivera", Role::Representative)
            .with_email("alex@nexus.ai")
            .with_territory("Commercial Banking - NE");
        rep.performance_score = Some(88.0);
        rep.current_rating = Some(Rating::Meets);
        rep.target = Some("$1.2B".to_string());
        rep.appraisal_period = Some("Q1 2024".to_string());

        let manager = UserProfile::new("u-manager", "Jordan Smith", Role::Manager)
            .with_email("manager@nexus.ai")
            .with_territory("EMEA");
        let admin = UserProfile::new("u-admin", "Sarah Director", Role::Admin)
            .with_email("admin@nexus.ai")
            .with_territory("Corporate");
        let super_admin = UserProfile::new("u-super", "Chief Systems Admin", Role::SuperAdmin)
            .with_email("super@nexus.ai")
            .with_territory("Global Operations");

        [rep, manager, admin, super_admin]
            .into_iter()
            .fold(Self::new(), |backend, profile| {
                let email = profile.email.clone().unwrap_or_default();
                let user_id = profile.id.clone();
                backend
                    .with_account(email, "password123", user_id)
                    .with_profile(profile)
            })
    }

    /// Register a password account
    pub fn with_account(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        self.accounts.insert(
            email.into(),
            Account {
                user_id: user_id.into(),
                password: SecretString::new(password),
            },
        );
        self
    }

    /// Register an access token for a user id
    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    /// Delay profile lookups for one user
    pub fn with_latency(mut self, user_id: impl Into<String>, delay: Duration) -> Self {
        self.latency.insert(user_id.into(), delay);
        self
    }

    fn has_account(&self, user_id: &str) -> bool {
        self.accounts.values().any(|a| a.user_id == user_id)
    }

    fn email_for(&self, user_id: &str) -> Option<String> {
        self.profiles.get(user_id).and_then(|p| p.email.clone())
    }
}

#[async_trait]
impl SessionProvider for InMemoryBackend {
    fn current_session(&self) -> Option<Session> {
        self.session.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> SessionResult<Session> {
        let account = self
            .accounts
            .get(email)
            .filter(|a| a.password.expose_secret() == password.expose_secret())
            .ok_or(SessionError::Unauthorized)?;

        let session = Session::new(
            account.user_id.clone(),
            Some(email.to_string()),
            format!("memory-{}", account.user_id),
        );
        self.session.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_in_with_token(&self, access_token: SecretString) -> SessionResult<Session> {
        let token = access_token.expose_secret();
        let user_id = self
            .tokens
            .get(token)
            .cloned()
            .or_else(|| {
                // tokens issued by password sign-in
                token
                    .strip_prefix("memory-")
                    .filter(|id| self.has_account(id))
                    .map(String::from)
            })
            .ok_or(SessionError::Unauthorized)?;

        let session = Session {
            email: self.email_for(&user_id),
            user_id,
            access_token,
        };
        self.session.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> SessionResult<()> {
        self.session.publish(None);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "in-memory"
    }
}

#[async_trait]
impl ProfileStore for InMemoryBackend {
    async fn get_profile(&self, user_id: &str) -> SessionResult<UserProfile> {
        if let Some(delay) = self.latency.get(user_id) {
            debug!(user_id, delay_ms = delay.as_millis() as u64, "Delaying profile lookup");
            tokio::time::sleep(*delay).await;
        }

        self.profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound {
                user_id: user_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_password_sign_in_publishes_session() {
        let backend = InMemoryBackend::demo();
        let rx = backend.subscribe();

        let session = backend
            .sign_in_with_password("admin@nexus.ai", &SecretString::new("password123"))
            .await
            .unwrap();

        assert_eq!(session.user_id, "u-admin");
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            backend.current_session().map(|s| s.user_id),
            Some("u-admin".to_string())
        );
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let backend = InMemoryBackend::demo();
        let result = backend
            .sign_in_with_password("admin@nexus.ai", &SecretString::new("nope"))
            .await;

        assert!(matches!(result, Err(SessionError::Unauthorized)));
        assert!(backend.current_session().is_none());
    }

    #[tokio::test]
    async fn test_token_sign_in_and_sign_out() {
        let backend = InMemoryBackend::demo().with_token("tok-1", "u-rep");

        let session = backend
            .sign_in_with_token(SecretString::new("tok-1"))
            .await
            .unwrap();
        assert_eq!(session.email.as_deref(), Some("alex@nexus.ai"));

        backend.sign_out().await.unwrap();
        assert!(backend.current_session().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let backend = InMemoryBackend::demo();
        let result = backend.sign_in_with_token(SecretString::new("bogus")).await;
        assert!(matches!(result, Err(SessionError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_issued_token_resumes_only_known_accounts() {
        let backend = InMemoryBackend::demo();

        let session = backend
            .sign_in_with_password("alex@nexus.ai", &SecretString::new("password123"))
            .await
            .unwrap();
        let resumed = backend
            .sign_in_with_token(session.access_token.clone())
            .await
            .unwrap();
        assert_eq!(resumed.user_id, "u-rep");

        let result = backend
            .sign_in_with_token(SecretString::new("memory-u-intruder"))
            .await;
        assert!(matches!(result, Err(SessionError::Unauthorized)));
        assert_eq!(
            backend.current_session().map(|s| s.user_id),
            Some("u-rep".to_string())
        );
    }

    #[tokio::test]
    async fn test_demo_profiles_cover_every_role() {
        let backend = InMemoryBackend::demo();
        let mut roles = Vec::new();
        for id in ["u-rep", "u-manager", "u-admin", "u-super"] {
            roles.push(backend.get_profile(id).await.unwrap().role);
        }
        for role in Role::all() {
            assert!(roles.contains(role));
        }
    }
}
