//! Session resolution
//!
//! Turns a session (or its absence) into a user profile. Each request carries
//! a [`Ticket`]; only the result for the most recently issued ticket may be
//! applied, so a slow lookup for an earlier sign-in can never overwrite a
//! newer one.

use crate::error::SessionError;
use crate::session::profile::{SharedProfileStore, UserProfile};
use crate::session::provider::Session;
use std::fmt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sequence number of one resolution request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets and decides which results are still current
#[derive(Debug, Default)]
pub struct ResolutionTracker {
    issued: u64,
    applied: Option<u64>,
}

impl ResolutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Whether `ticket` is the newest issued ticket
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Whether a resolution is outstanding
    pub fn is_pending(&self) -> bool {
        self.issued > 0 && self.applied != Some(self.issued)
    }

    /// Mark `ticket` as applied if it is current. Returns false for stale tickets.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.applied = Some(ticket.0);
        true
    }
}

/// Outcome of one resolution request
#[derive(Debug)]
pub enum Resolution {
    /// Profile found for the session
    SignedIn(UserProfile),
    /// No session
    SignedOut,
    /// Session present but the profile could not be resolved; treated as signed out
    Failed(SessionError),
}

impl Resolution {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Resolution::SignedIn(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Resolution result tagged with the ticket it answers
#[derive(Debug)]
pub struct ResolvedProfile {
    pub ticket: Ticket,
    pub resolution: Resolution,
}

/// Resolves sessions against a profile store
#[derive(Clone)]
pub struct SessionResolver {
    profiles: SharedProfileStore,
}

impl SessionResolver {
    pub fn new(profiles: SharedProfileStore) -> Self {
        Self { profiles }
    }

    /// Resolve a session to a profile. Never retries.
    pub async fn resolve(&self, session: Option<&Session>) -> Resolution {
        let Some(session) = session else {
            return Resolution::SignedOut;
        };

        match self.profiles.get_profile(&session.user_id).await {
            Ok(profile) => Resolution::SignedIn(profile),
            Err(e) => {
                warn!(user_id = %session.user_id, error = %e, "Profile resolution failed");
                Resolution::Failed(e)
            }
        }
    }

    /// Resolve in a background task and post the result to `results`
    pub fn spawn(
        &self,
        ticket: Ticket,
        session: Option<Session>,
        results: mpsc::Sender<ResolvedProfile>,
    ) -> JoinHandle<()> {
        let resolver = self.clone();
        tokio::spawn(async move {
            let resolution = resolver.resolve(session.as_ref()).await;
            if results
                .send(ResolvedProfile { ticket, resolution })
                .await
                .is_err()
            {
                debug!(ticket = %ticket, "Resolution receiver dropped");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::session::memory::InMemoryBackend;
    use std::sync::Arc;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut tracker = ResolutionTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(first < second);
        assert!(!tracker.is_current(first));
        assert!(tracker.is_pending());

        assert!(tracker.accept(second));
        assert!(!tracker.is_pending());
        assert!(!tracker.accept(first));
    }

    #[test]
    fn test_nothing_pending_initially() {
        let tracker = ResolutionTracker::new();
        assert!(!tracker.is_pending());
    }

    #[tokio::test]
    async fn test_resolve_signed_out() {
        let backend = Arc::new(InMemoryBackend::new());
        let resolver = SessionResolver::new(backend);
        assert!(matches!(resolver.resolve(None).await, Resolution::SignedOut));
    }

    #[tokio::test]
    async fn test_resolve_profile() {
        let backend = Arc::new(
            InMemoryBackend::new().with_profile(UserProfile::new("u-1", "Pat", Role::Manager)),
        );
        let resolver = SessionResolver::new(backend);
        let session = Session::new("u-1", None, "token");

        let resolution = resolver.resolve(Some(&session)).await;
        assert_eq!(resolution.profile().map(|p| p.role), Some(Role::Manager));
    }

    #[tokio::test]
    async fn test_missing_profile_is_failure() {
        let resolver = SessionResolver::new(Arc::new(InMemoryBackend::new()));
        let session = Session::new("ghost", None, "token");

        let resolution = resolver.resolve(Some(&session)).await;
        assert!(matches!(
            resolution,
            Resolution::Failed(SessionError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_spawn_posts_tagged_result() {
        let resolver = SessionResolver::new(Arc::new(InMemoryBackend::new()));
        let (tx, mut rx) = mpsc::channel(4);
        let mut tracker = ResolutionTracker::new();
        let ticket = tracker.issue();

        resolver.spawn(ticket, None, tx).await.unwrap();

        let resolved = rx.recv().await.unwrap();
        assert_eq!(resolved.ticket, ticket);
        assert!(matches!(resolved.resolution, Resolution::SignedOut));
    }
}
