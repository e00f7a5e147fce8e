//! Navigation filter
//!
//! Restricts the registry to the features a role may navigate to, keeping
//! registry order.

use crate::access::registry::{FeatureRegistry, NavEntry};
use crate::access::table::RolePermissionTable;
use crate::access::types::{Feature, FeatureSet, Role};

/// Registry features present in `enabled`, in registry order
pub fn visible_features(registry: &FeatureRegistry, enabled: &FeatureSet) -> Vec<Feature> {
    registry
        .features()
        .iter()
        .copied()
        .filter(|feature| enabled.contains(*feature))
        .collect()
}

/// Menu entries for a role under the current table
pub fn navigation_for(
    registry: &FeatureRegistry,
    table: &RolePermissionTable,
    role: Role,
) -> Vec<NavEntry> {
    let enabled = table.get(role);
    registry
        .entries()
        .filter(|entry| enabled.contains(entry.feature))
        .collect()
}
