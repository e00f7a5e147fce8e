//! Active-tab selection
//!
//! Picks the feature a user lands on after sign-in. Selection is an ordered
//! rule table evaluated top to bottom; the first rule that yields a tab wins:
//!
//! 1. Empty enabled set -> placeholder
//! 2. Representative -> employee dashboard
//! 3. Admin -> admin dashboard
//! 4. Super admin -> feature settings
//! 5. Anyone else -> first enabled feature
//!
//! A pinned default that is not enabled for the role is skipped so the
//! selected tab is always a member of the enabled set.

use crate::access::types::{Feature, FeatureSet, Role};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// What the main view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "feature")]
pub enum ActiveTab {
    /// A feature is rendered
    Selected(Feature),
    /// No feature selected ("choose a feature" empty state)
    Placeholder,
}

impl ActiveTab {
    pub fn feature(&self) -> Option<Feature> {
        match self {
            ActiveTab::Selected(feature) => Some(*feature),
            ActiveTab::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ActiveTab::Placeholder)
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveTab::Selected(feature) => write!(f, "{}", feature),
            ActiveTab::Placeholder => f.write_str("(select a feature)"),
        }
    }
}

/// One row of the selection rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// Nothing enabled: show the placeholder
    EmptySet,
    /// Role-specific landing feature, independent of its position in the set
    Pinned { role: Role, feature: Feature },
    /// First enabled feature in insertion order
    FirstEnabled,
}

impl SelectionRule {
    /// Evaluate this rule; `None` means fall through to the next one
    pub fn apply(&self, role: Role, enabled: &FeatureSet) -> Option<ActiveTab> {
        match *self {
            SelectionRule::EmptySet => enabled.is_empty().then_some(ActiveTab::Placeholder),
            SelectionRule::Pinned {
                role: pinned_role,
                feature,
            } => (pinned_role == role && enabled.contains(feature))
                .then_some(ActiveTab::Selected(feature)),
            SelectionRule::FirstEnabled => enabled.first().map(ActiveTab::Selected),
        }
    }
}

/// Rules in precedence order
pub const SELECTION_RULES: &[SelectionRule] = &[
    SelectionRule::EmptySet,
    SelectionRule::Pinned {
        role: Role::Representative,
        feature: Feature::EmployeeDashboard,
    },
    SelectionRule::Pinned {
        role: Role::Admin,
        feature: Feature::AdminDashboard,
    },
    SelectionRule::Pinned {
        role: Role::SuperAdmin,
        feature: Feature::FeatureSettings,
    },
    SelectionRule::FirstEnabled,
];

/// Derive the initial tab for a role. Pure in (role, enabled).
pub fn select_active_tab(role: Role, enabled: &FeatureSet) -> ActiveTab {
    select_with_rules(SELECTION_RULES, role, enabled)
}

/// Same as [`select_active_tab`] over an explicit rule table
pub fn select_with_rules(rules: &[SelectionRule], role: Role, enabled: &FeatureSet) -> ActiveTab {
    for (index, rule) in rules.iter().enumerate() {
        if let Some(tab) = rule.apply(role, enabled) {
            trace!(role = %role, rule = index, tab = %tab, "Selected active tab");
            return tab;
        }
    }
    ActiveTab::Placeholder
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rep_dashboard_not_first(
        Role::Representative,
        &[Feature::Strategy, Feature::EmployeeDashboard, Feature::Timeline],
        ActiveTab::Selected(Feature::EmployeeDashboard)
    )]
    #[case::manager_first_enabled(
        Role::Manager,
        &[Feature::Timeline, Feature::Coaching],
        ActiveTab::Selected(Feature::Timeline)
    )]
    #[case::admin_pinned(
        Role::Admin,
        &[Feature::Timeline, Feature::AdminDashboard],
        ActiveTab::Selected(Feature::AdminDashboard)
    )]
    #[case::super_admin_pinned(
        Role::SuperAdmin,
        &[Feature::EmployeeDashboard, Feature::FeatureSettings],
        ActiveTab::Selected(Feature::FeatureSettings)
    )]
    #[case::pinned_missing_falls_through(
        Role::Representative,
        &[Feature::Coaching, Feature::Timeline],
        ActiveTab::Selected(Feature::Coaching)
    )]
    #[case::empty_set(Role::SuperAdmin, &[], ActiveTab::Placeholder)]
    fn test_select_active_tab(
        #[case] role: Role,
        #[case] enabled: &[Feature],
        #[case] expected: ActiveTab,
    ) {
        assert_eq!(select_active_tab(role, &FeatureSet::from(enabled)), expected);
    }

    #[test]
    fn test_empty_set_for_every_role() {
        for role in Role::all() {
            assert!(select_active_tab(*role, &FeatureSet::new()).is_placeholder());
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        let enabled = FeatureSet::from([Feature::Strategy, Feature::Simulator]);
        let first = select_active_tab(Role::Manager, &enabled);
        for _ in 0..10 {
            assert_eq!(select_active_tab(Role::Manager, &enabled), first);
        }
    }

    #[test]
    fn test_rule_table_can_be_audited_independently() {
        let enabled = FeatureSet::from([Feature::Timeline, Feature::EmployeeDashboard]);

        assert_eq!(SelectionRule::EmptySet.apply(Role::Representative, &enabled), None);
        assert_eq!(
            SELECTION_RULES[1].apply(Role::Representative, &enabled),
            Some(ActiveTab::Selected(Feature::EmployeeDashboard))
        );
        assert_eq!(SELECTION_RULES[1].apply(Role::Manager, &enabled), None);

        let only_fallback =
            select_with_rules(&[SelectionRule::FirstEnabled], Role::Representative, &enabled);
        assert_eq!(only_fallback, ActiveTab::Selected(Feature::Timeline));
    }
}
