//! Nexus Console
//!
//! Role-gated business console: a signed-in user's role decides which
//! sections they may see and open, and administrators edit that mapping live.
//!
//! ## Features
//!
//! - **Role-permission table** mapping each of the four roles to its enabled sections
//! - **Default tab selection** by ordered rule table, with a placeholder for empty sets
//! - **Navigation filter** in registry order
//! - **Permission editor** toggling a section for a role, effective immediately
//! - **Session resolution** against a Supabase-style backend, stale results discarded
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Example Configuration
//!
//! ```toml
//! [backend]
//! url = "https://xyz.supabase.co"
//! # anon key from SUPABASE_ANON_KEY env var
//!
//! [console]
//! disabled_tab = "evict"
//!
//! [permissions]
//! MANAGER = ["admin-dashboard", "timeline"]
//! ```

pub mod access;
pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod util;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use console::{Console, Shell};
pub use error::{AppError, Result};
