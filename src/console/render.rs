//! Plain-text rendering of console state

use crate::access::{ActiveTab, NavEntry, RolePermissionView};
use crate::console::state::{Console, ConsoleStatus};
use std::fmt::Write;

/// Navigation menu, one entry per line, active entry marked
pub fn render_navigation(entries: &[NavEntry], active: Option<ActiveTab>) -> String {
    if entries.is_empty() {
        return "No sections available.\n".to_string();
    }

    let current = active.and_then(|tab| tab.feature());
    let mut out = String::new();
    for entry in entries {
        let marker = if Some(entry.feature) == current { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:<20} {}", marker, entry.label, entry.feature);
    }
    out
}

/// Permission editor grid: one block per role
pub fn render_matrix(views: &[RolePermissionView]) -> String {
    let mut out = String::new();
    for view in views {
        let _ = writeln!(out, "{} ({})", view.title, view.role);
        for toggle in &view.features {
            let check = if toggle.enabled { "x" } else { " " };
            let _ = writeln!(
                out,
                "  [{}] {:<20} {}",
                check, toggle.entry.label, toggle.entry.feature
            );
        }
    }
    out
}

/// Session summary for `whoami`
pub fn render_status(console: &Console) -> String {
    match (console.status(), console.user()) {
        (ConsoleStatus::Resolving, _) => "Resolving session...\n".to_string(),
        (ConsoleStatus::SignedIn, Some(user)) => {
            let mut out = format!("{} <{}> as {}\n", user.name, user.id, user.role.title());
            if let Some(territory) = &user.territory {
                let _ = writeln!(out, "Territory: {}", territory);
            }
            if let Some(tab) = console.active_tab() {
                let _ = writeln!(out, "Active: {}", tab);
            }
            out
        }
        _ => "Not signed in. Use `login <email> <password>`.\n".to_string(),
    }
}
