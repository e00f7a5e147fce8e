//! Access control types
//!
//! Roles, features and the ordered feature set used by the permission table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role, as stored in the `profiles.role` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "REP")]
    Representative,
    #[serde(rename = "MANAGER")]
    Manager,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "SUPER_ADMIN")]
    SuperAdmin,
}

impl Role {
    /// Get the role identifier as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Representative => "REP",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Human-readable title shown in the permission editor
    pub const fn title(&self) -> &'static str {
        match self {
            Role::Representative => "Relationship Manager",
            Role::Manager => "Team Manager",
            Role::Admin => "Regional Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    /// Try to parse a role from its identifier (case-insensitive)
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "REP" => Some(Role::Representative),
            "MANAGER" => Some(Role::Manager),
            "ADMIN" => Some(Role::Admin),
            "SUPER_ADMIN" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Get all roles
    pub const fn all() -> &'static [Role] {
        &[
            Role::Representative,
            Role::Manager,
            Role::Admin,
            Role::SuperAdmin,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Addressable section of the console.
///
/// Declaration order is the canonical registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    EmployeeDashboard,
    AdminDashboard,
    Timeline,
    VoiceAutomation,
    Coaching,
    Simulator,
    Strategy,
    UserManagement,
    FeatureSettings,
}

impl Feature {
    /// Get the feature identifier as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Feature::EmployeeDashboard => "employee-dashboard",
            Feature::AdminDashboard => "admin-dashboard",
            Feature::Timeline => "timeline",
            Feature::VoiceAutomation => "voice-automation",
            Feature::Coaching => "coaching",
            Feature::Simulator => "simulator",
            Feature::Strategy => "strategy",
            Feature::UserManagement => "user-management",
            Feature::FeatureSettings => "feature-settings",
        }
    }

    /// Try to parse a feature from its identifier
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "employee-dashboard" => Some(Feature::EmployeeDashboard),
            "admin-dashboard" => Some(Feature::AdminDashboard),
            "timeline" => Some(Feature::Timeline),
            "voice-automation" => Some(Feature::VoiceAutomation),
            "coaching" => Some(Feature::Coaching),
            "simulator" => Some(Feature::Simulator),
            "strategy" => Some(Feature::Strategy),
            "user-management" => Some(Feature::UserManagement),
            "feature-settings" => Some(Feature::FeatureSettings),
            _ => None,
        }
    }

    /// Get all features in registry order
    pub const fn all() -> &'static [Feature] {
        &[
            Feature::EmployeeDashboard,
            Feature::AdminDashboard,
            Feature::Timeline,
            Feature::VoiceAutomation,
            Feature::Coaching,
            Feature::Simulator,
            Feature::Strategy,
            Feature::UserManagement,
            Feature::FeatureSettings,
        ]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of enabled features that remembers insertion order.
///
/// Equality is set equality: two sets holding the same features in a
/// different order compare equal.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FeatureSet(Vec<Feature>);

impl FeatureSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature at the end. Returns false if it was already present.
    pub fn insert(&mut self, feature: Feature) -> bool {
        if self.contains(feature) {
            return false;
        }
        self.0.push(feature);
        true
    }

    /// Remove a feature. Returns false if it was not present.
    pub fn remove(&mut self, feature: Feature) -> bool {
        let before = self.0.len();
        self.0.retain(|f| *f != feature);
        self.0.len() != before
    }

    /// Whether `feature` is enabled
    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    /// First feature in insertion order
    pub fn first(&self) -> Option<Feature> {
        self.0.first().copied()
    }

    /// Whether no feature is enabled
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of enabled features
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Features in insertion order
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }
}

impl PartialEq for FeatureSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|f| other.contains(f))
    }
}

impl Eq for FeatureSet {}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl<const N: usize> From<[Feature; N]> for FeatureSet {
    fn from(features: [Feature; N]) -> Self {
        features.into_iter().collect()
    }
}

impl From<&[Feature]> for FeatureSet {
    fn from(features: &[Feature]) -> Self {
        features.iter().copied().collect()
    }
}
