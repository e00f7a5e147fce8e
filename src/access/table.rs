//! Role-permission table
//!
//! Holds the authoritative Role -> enabled features mapping. Every role has
//! exactly one entry for the lifetime of the table.

use crate::access::types::{Feature, FeatureSet, Role};
use crate::error::AccessError;
use std::collections::HashMap;
use tracing::debug;

/// Role -> enabled feature set, total over [`Role`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionTable {
    entries: [FeatureSet; 4],
}

const fn slot(role: Role) -> usize {
    match role {
        Role::Representative => 0,
        Role::Manager => 1,
        Role::Admin => 2,
        Role::SuperAdmin => 3,
    }
}

impl RolePermissionTable {
    /// Table in which no role has any feature enabled
    pub fn empty() -> Self {
        Self {
            entries: Default::default(),
        }
    }

    /// The seed loaded at process start
    pub fn seeded() -> Self {
        let mut table = Self::empty();
        table.set_enabled_features(
            Role::Representative,
            [
                Feature::EmployeeDashboard,
                Feature::Timeline,
                Feature::VoiceAutomation,
                Feature::Coaching,
            ],
        );
        table.set_enabled_features(
            Role::Admin,
            [
                Feature::AdminDashboard,
                Feature::Timeline,
                Feature::Simulator,
                Feature::Strategy,
                Feature::UserManagement,
            ],
        );
        table.set_enabled_features(Role::SuperAdmin, Feature::all());
        table
    }

    /// Seed table with per-role overrides keyed by role and feature ids.
    ///
    /// Fails on the first unknown role or feature id, and on a role named by
    /// more than one key (role ids are case-insensitive). Nothing is applied
    /// in that case.
    pub fn with_overrides<S: AsRef<str>>(
        overrides: &HashMap<String, Vec<S>>,
    ) -> Result<Self, AccessError> {
        let mut seen = [false; 4];
        let mut table = Self::seeded();
        for (role_id, feature_ids) in overrides {
            let role = Role::try_parse(role_id).ok_or_else(|| AccessError::unknown_role(role_id))?;
            if std::mem::replace(&mut seen[slot(role)], true) {
                return Err(AccessError::DuplicateRole { role });
            }
            table.set_enabled_feature_ids(role, feature_ids)?;
        }
        Ok(table)
    }

    /// Current enabled set for `role`
    pub fn get(&self, role: Role) -> &FeatureSet {
        &self.entries[slot(role)]
    }

    /// Look up a role by its identifier
    pub fn get_by_id(&self, role_id: &str) -> Result<&FeatureSet, AccessError> {
        Role::try_parse(role_id)
            .map(|role| self.get(role))
            .ok_or_else(|| AccessError::unknown_role(role_id))
    }

    /// Replace the enabled set for `role` wholesale
    pub fn set_enabled_features(&mut self, role: Role, features: impl Into<FeatureSet>) {
        let features = features.into();
        debug!(role = %role, count = features.len(), "Replacing enabled features");
        self.entries[slot(role)] = features;
    }

    /// Replace the enabled set for `role` from feature identifiers.
    ///
    /// Every identifier is validated before the table is touched.
    pub fn set_enabled_feature_ids<S: AsRef<str>>(
        &mut self,
        role: Role,
        feature_ids: &[S],
    ) -> Result<(), AccessError> {
        let features = feature_ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                Feature::try_parse(id).ok_or_else(|| AccessError::invalid_feature(id))
            })
            .collect::<Result<FeatureSet, _>>()?;

        self.set_enabled_features(role, features);
        Ok(())
    }

    /// Iterate over every role and its enabled set
    pub fn iter(&self) -> impl Iterator<Item = (Role, &FeatureSet)> + '_ {
        Role::all().iter().map(move |role| (*role, self.get(*role)))
    }
}

impl Default for RolePermissionTable {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_total() {
        let table = RolePermissionTable::empty();
        for role in Role::all() {
            assert!(table.get(*role).is_empty());
        }
        assert_eq!(table.iter().count(), Role::all().len());
    }

    #[test]
    fn test_seed_contents() {
        let table = RolePermissionTable::seeded();

        let rep = table.get(Role::Representative);
        assert_eq!(rep.first(), Some(Feature::EmployeeDashboard));
        assert!(rep.contains(Feature::Coaching));
        assert!(!rep.contains(Feature::Simulator));

        assert!(table.get(Role::Manager).is_empty());
        assert!(table.get(Role::Admin).contains(Feature::UserManagement));
        assert_eq!(table.get(Role::SuperAdmin).len(), Feature::all().len());
    }

    #[test]
    fn test_get_by_id_unknown_role() {
        let table = RolePermissionTable::seeded();
        assert!(table.get_by_id("ADMIN").is_ok());
        assert_eq!(
            table.get_by_id("AUDITOR"),
            Err(AccessError::unknown_role("AUDITOR"))
        );
    }

    #[test]
    fn test_set_enabled_features_idempotent() {
        let mut once = RolePermissionTable::seeded();
        once.set_enabled_features(Role::Manager, [Feature::Timeline, Feature::Coaching]);

        let mut twice = once.clone();
        twice.set_enabled_features(Role::Manager, [Feature::Timeline, Feature::Coaching]);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_feature_rejects_whole_update() {
        let mut table = RolePermissionTable::seeded();
        let before = table.get(Role::Admin).clone();

        let result = table.set_enabled_feature_ids(Role::Admin, &["timeline", "crm"]);

        assert_eq!(result, Err(AccessError::invalid_feature("crm")));
        assert_eq!(table.get(Role::Admin), &before);
    }

    #[test]
    fn test_with_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("manager".to_string(), vec!["timeline", "coaching"]);

        let table = RolePermissionTable::with_overrides(&overrides).unwrap();
        assert_eq!(
            table.get(Role::Manager),
            &FeatureSet::from([Feature::Timeline, Feature::Coaching])
        );
        assert_eq!(
            table.get(Role::Admin),
            RolePermissionTable::seeded().get(Role::Admin)
        );
    }

    #[test]
    fn test_with_overrides_unknown_role() {
        let mut overrides = HashMap::new();
        overrides.insert("AUDITOR".to_string(), vec!["timeline"]);

        let result = RolePermissionTable::with_overrides(&overrides);
        assert!(matches!(result, Err(AccessError::UnknownRole { .. })));
    }

    #[test]
    fn test_with_overrides_rejects_same_role_twice() {
        let mut overrides = HashMap::new();
        overrides.insert("REP".to_string(), vec!["timeline"]);
        overrides.insert("rep".to_string(), vec!["coaching"]);

        let result = RolePermissionTable::with_overrides(&overrides);
        assert_eq!(
            result,
            Err(AccessError::DuplicateRole {
                role: Role::Representative
            })
        );
    }
}
