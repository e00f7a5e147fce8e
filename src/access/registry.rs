//! Feature registry
//!
//! The ordered list of sections the console can show. The order here is the
//! order of the navigation menu and of the permission editor.

use crate::access::types::Feature;
use serde::Serialize;

/// Navigation entry for a registered feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub feature: Feature,
    pub label: &'static str,
    pub icon: &'static str,
}

impl NavEntry {
    pub const fn for_feature(feature: Feature) -> Self {
        let (label, icon) = match feature {
            Feature::EmployeeDashboard => ("My Performance", "fa-user-chart"),
            Feature::AdminDashboard => ("Team Ratings", "fa-users-gear"),
            Feature::Timeline => ("Client Journey", "fa-timeline"),
            Feature::VoiceAutomation => ("Voice Automation", "fa-phone-volume"),
            Feature::Coaching => ("Coaching Hub", "fa-graduation-cap"),
            Feature::Simulator => ("Capital Simulator", "fa-flask-vial"),
            Feature::Strategy => ("Strategy Hub", "fa-microchip"),
            Feature::UserManagement => ("User Management", "fa-id-card-clip"),
            Feature::FeatureSettings => ("System Settings", "fa-sliders"),
        };
        Self {
            feature,
            label,
            icon,
        }
    }
}

/// Ordered, duplicate-free list of features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRegistry {
    features: Vec<Feature>,
}

impl FeatureRegistry {
    /// Build a registry from an explicit order. Later duplicates are dropped.
    pub fn new(order: impl IntoIterator<Item = Feature>) -> Self {
        let mut features = Vec::new();
        for feature in order {
            if !features.contains(&feature) {
                features.push(feature);
            }
        }
        Self { features }
    }

    /// The registry shipped with the console
    pub fn standard() -> Self {
        Self::new(Feature::all().iter().copied())
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn entries(&self) -> impl Iterator<Item = NavEntry> + '_ {
        self.features.iter().copied().map(NavEntry::for_feature)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
