//! Session module
//!
//! Boundary with the hosted auth backend and profile table. The permission
//! model only ever sees the resolved [`UserProfile`].

pub mod memory;
pub mod profile;
pub mod provider;
pub mod resolver;
pub mod rest;

pub use memory::InMemoryBackend;
pub use profile::{ProfileStore, Rating, SharedProfileStore, UserProfile};
pub use provider::{Session, SessionChannel, SessionProvider, SharedSessionProvider};
pub use resolver::{Resolution, ResolutionTracker, ResolvedProfile, SessionResolver, Ticket};
pub use rest::RestBackend;
