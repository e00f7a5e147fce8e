//! Access control module
//!
//! Role-based feature visibility for the console.
//!
//! ## Model
//!
//! ```text
//! session -> profile (role) -> role-permission table -> active tab + navigation
//!                                      ^
//!                                      +-- permission editor (toggle)
//! ```
//!
//! - Every role owns exactly one enabled-feature set.
//! - Navigation shows the registry subset a role may see, in registry order.
//! - The active tab is always an enabled feature or the placeholder state.
//!
//! ## Example Configuration
//!
//! ```toml
//! [permissions]
//! MANAGER = ["admin-dashboard", "timeline", "coaching"]
//! ```

pub mod editor;
pub mod navigation;
pub mod registry;
pub mod selector;
pub mod table;
pub mod types;

pub use editor::{FeatureToggle, PermissionEditor, RolePermissionView, permission_matrix};
pub use navigation::{navigation_for, visible_features};
pub use registry::{FeatureRegistry, NavEntry};
pub use selector::{ActiveTab, SELECTION_RULES, SelectionRule, select_active_tab};
pub use table::RolePermissionTable;
pub use types::{Feature, FeatureSet, Role};
