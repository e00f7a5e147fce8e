//! Console state container
//!
//! Single owner of the permission table, the signed-in user and the active
//! tab. Readers borrow it; every mutation goes through `&mut Console`, so the
//! single-writer contract is enforced by the borrow checker rather than a lock.

use crate::access::{
    ActiveTab, Feature, FeatureRegistry, NavEntry, PermissionEditor, Role, RolePermissionTable,
    RolePermissionView, navigation_for, permission_matrix, select_active_tab,
};
use crate::config::{AppConfig, DisabledTabPolicy, permission_table};
use crate::error::{AccessError, ConfigError};
use crate::session::{Resolution, ResolutionTracker, ResolvedProfile, Ticket, UserProfile};
use tracing::{debug, info, warn};

/// Where the console is in the sign-in lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStatus {
    /// A profile lookup is outstanding; nothing is selected yet
    Resolving,
    /// No user; route to the sign-in entry point
    SignedOut,
    SignedIn,
}

/// Whether a resolution result was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued after this one; the result was dropped
    Stale,
}

pub struct Console {
    registry: FeatureRegistry,
    table: RolePermissionTable,
    policy: DisabledTabPolicy,
    tracker: ResolutionTracker,
    user: Option<UserProfile>,
    active: ActiveTab,
}

impl Console {
    /// Signed-out console over an explicit registry, table and policy
    pub fn new(
        registry: FeatureRegistry,
        table: RolePermissionTable,
        policy: DisabledTabPolicy,
    ) -> Self {
        Self {
            registry,
            table,
            policy,
            tracker: ResolutionTracker::new(),
            user: None,
            active: ActiveTab::Placeholder,
        }
    }

    /// Console seeded from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            FeatureRegistry::standard(),
            permission_table(config)?,
            config.console.disabled_tab,
        ))
    }

    /// Lifecycle state; `Resolving` wins while a ticket is outstanding
    pub fn status(&self) -> ConsoleStatus {
        if self.tracker.is_pending() {
            ConsoleStatus::Resolving
        } else if self.user.is_some() {
            ConsoleStatus::SignedIn
        } else {
            ConsoleStatus::SignedOut
        }
    }

    /// Profile of the signed-in user, if a resolution has been applied
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Active tab of the signed-in user; `None` while signed out or resolving
    pub fn active_tab(&self) -> Option<ActiveTab> {
        match self.status() {
            ConsoleStatus::SignedIn => Some(self.active),
            _ => None,
        }
    }

    /// Features the console can show, in menu order
    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Current role-permission table, including live edits
    pub fn table(&self) -> &RolePermissionTable {
        &self.table
    }

    /// Handling of an active tab that gets disabled
    pub fn policy(&self) -> DisabledTabPolicy {
        self.policy
    }

    /// Start a resolution request. The current user is cleared until a
    /// result for the returned ticket is applied.
    pub fn begin_resolution(&mut self) -> Ticket {
        let ticket = self.tracker.issue();
        self.user = None;
        self.active = ActiveTab::Placeholder;
        debug!(ticket = %ticket, "Session resolution started");
        ticket
    }

    /// Apply a resolution result if its ticket is still the newest one
    pub fn apply_resolution(&mut self, resolved: ResolvedProfile) -> ApplyOutcome {
        if !self.tracker.accept(resolved.ticket) {
            debug!(ticket = %resolved.ticket, "Discarding stale session resolution");
            return ApplyOutcome::Stale;
        }

        match resolved.resolution {
            Resolution::SignedIn(profile) => {
                self.active = select_active_tab(profile.role, self.table.get(profile.role));
                info!(
                    user_id = %profile.id,
                    role = %profile.role,
                    active = %self.active,
                    "User signed in"
                );
                self.user = Some(profile);
            }
            Resolution::SignedOut => {
                info!("User signed out");
                self.clear_user();
            }
            Resolution::Failed(e) => {
                warn!(error = %e, "Treating unresolved profile as signed out");
                self.clear_user();
            }
        }
        ApplyOutcome::Applied
    }

    fn clear_user(&mut self) {
        self.user = None;
        self.active = ActiveTab::Placeholder;
    }

    fn signed_in_role(&self) -> Result<Role, AccessError> {
        match (self.status(), &self.user) {
            (ConsoleStatus::SignedIn, Some(user)) => Ok(user.role),
            _ => Err(AccessError::NotSignedIn),
        }
    }

    /// Menu for the signed-in user; empty when nobody is signed in
    pub fn navigation(&self) -> Vec<NavEntry> {
        match self.signed_in_role() {
            Ok(role) => navigation_for(&self.registry, &self.table, role),
            Err(_) => Vec::new(),
        }
    }

    /// Switch the active tab within the user's enabled set
    pub fn open(&mut self, feature: Feature) -> Result<ActiveTab, AccessError> {
        let role = self.signed_in_role()?;
        if !self.table.get(role).contains(feature) || !self.registry.contains(feature) {
            return Err(AccessError::FeatureNotEnabled { role, feature });
        }
        self.active = ActiveTab::Selected(feature);
        debug!(role = %role, feature = %feature, "Opened feature");
        Ok(self.active)
    }

    /// Permission editor view for every role
    pub fn permission_matrix(&self) -> Vec<RolePermissionView> {
        permission_matrix(&self.registry, &self.table)
    }

    /// Toggle a feature for a role. Only users who can see the feature
    /// settings section may edit permissions.
    pub fn toggle(&mut self, role: Role, feature: Feature) -> Result<bool, AccessError> {
        let editor_role = self.signed_in_role()?;
        if !self.table.get(editor_role).contains(Feature::FeatureSettings) {
            return Err(AccessError::FeatureNotEnabled {
                role: editor_role,
                feature: Feature::FeatureSettings,
            });
        }

        let enabled = PermissionEditor::new(&mut self.table).toggle(role, feature);
        self.enforce_policy();
        Ok(enabled)
    }

    /// Re-check the active tab after the table changed
    fn enforce_policy(&mut self) {
        let Some(role) = self.user.as_ref().map(|u| u.role) else {
            return;
        };
        let Some(current) = self.active.feature() else {
            return;
        };
        if self.table.get(role).contains(current) {
            return;
        }

        match self.policy {
            DisabledTabPolicy::Evict => {
                self.active = select_active_tab(role, self.table.get(role));
                info!(
                    role = %role,
                    disabled = %current,
                    active = %self.active,
                    "Active tab disabled, re-selected"
                );
            }
            DisabledTabPolicy::Sticky => {
                debug!(role = %role, feature = %current, "Keeping disabled tab until navigation");
            }
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(
            FeatureRegistry::standard(),
            RolePermissionTable::seeded(),
            DisabledTabPolicy::default(),
        )
    }
}
