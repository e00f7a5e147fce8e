//! Permission editor
//!
//! Admin-facing mutation surface over the role-permission table. Holding a
//! `PermissionEditor` requires a mutable borrow of the table, so only the
//! owner of the table can hand one out.

use crate::access::registry::{FeatureRegistry, NavEntry};
use crate::access::table::RolePermissionTable;
use crate::access::types::{Feature, Role};
use serde::Serialize;
use tracing::info;

/// A registry entry annotated with its state for one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureToggle {
    #[serde(flatten)]
    pub entry: NavEntry,
    pub enabled: bool,
}

/// Every registry entry for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolePermissionView {
    pub role: Role,
    pub title: &'static str,
    pub features: Vec<FeatureToggle>,
}

/// Annotated matrix for every role, read-only
pub fn permission_matrix(
    registry: &FeatureRegistry,
    table: &RolePermissionTable,
) -> Vec<RolePermissionView> {
    Role::all()
        .iter()
        .map(|role| role_view(registry, table, *role))
        .collect()
}

/// Annotated registry for a single role
pub fn role_view(
    registry: &FeatureRegistry,
    table: &RolePermissionTable,
    role: Role,
) -> RolePermissionView {
    let enabled = table.get(role);
    RolePermissionView {
        role,
        title: role.title(),
        features: registry
            .entries()
            .map(|entry| FeatureToggle {
                entry,
                enabled: enabled.contains(entry.feature),
            })
            .collect(),
    }
}

pub struct PermissionEditor<'a> {
    table: &'a mut RolePermissionTable,
}

impl<'a> PermissionEditor<'a> {
    pub fn new(table: &'a mut RolePermissionTable) -> Self {
        Self { table }
    }

    /// Flip `feature` for `role`: remove it if enabled, append it otherwise.
    ///
    /// Returns whether the feature is enabled afterwards.
    pub fn toggle(&mut self, role: Role, feature: Feature) -> bool {
        let mut features = self.table.get(role).clone();
        let enabled = if features.contains(feature) {
            features.remove(feature);
            false
        } else {
            features.insert(feature);
            true
        };
        self.table.set_enabled_features(role, features);

        info!(role = %role, feature = %feature, enabled, "Toggled feature");
        enabled
    }
}
