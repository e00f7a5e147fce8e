//! Session provider trait
//!
//! Abstracts the hosted auth service: who is signed in, and a change feed
//! that fires on sign-in and sign-out.

use crate::error::SessionResult;
use crate::util::SecretString;
// async_trait required for dyn-compatibility with Arc<dyn SessionProvider>
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Authenticated session, opaque to the permission model
#[derive(Debug, Clone)]
pub struct Session {
    /// Auth user id, also the primary key of the profile row
    pub user_id: String,
    pub email: Option<String>,
    pub access_token: SecretString,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        email: Option<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email,
            access_token: SecretString::new(access_token),
        }
    }
}

/// Auth/session provider
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The session currently held, if any
    fn current_session(&self) -> Option<Session>;

    /// Change feed; the receiver observes every sign-in and sign-out
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    /// Exchange credentials for a session
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> SessionResult<Session>;

    /// Adopt an existing access token after validating it
    async fn sign_in_with_token(&self, access_token: SecretString) -> SessionResult<Session>;

    /// Drop the current session
    async fn sign_out(&self) -> SessionResult<()>;

    /// Get a description of the provider (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Shared handle type for session providers
pub type SharedSessionProvider = Arc<dyn SessionProvider>;

/// Current-session cell with change notification, shared by providers
#[derive(Debug)]
pub struct SessionChannel {
    tx: watch::Sender<Option<Session>>,
}

impl SessionChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Replace the session and notify subscribers
    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_redacted() {
        let session = Session::new("u-1", None, "secret-access-token");
        let debug = format!("{:?}", session);
        assert!(debug.contains("u-1"));
        assert!(!debug.contains("secret-access-token"));
    }

    #[tokio::test]
    async fn test_channel_notifies_subscribers() {
        let channel = SessionChannel::new();
        let mut rx = channel.subscribe();
        assert!(channel.current().is_none());

        channel.publish(Some(Session::new("u-1", None, "t")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|s| s.user_id.as_str()), Some("u-1"));

        channel.publish(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
