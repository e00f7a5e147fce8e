//! Console module
//!
//! Presentation layer: the state container that owns the permission table
//! and the current user, the command parser, text rendering and the
//! operator shell that drives them.

pub mod command;
pub mod render;
pub mod shell;
pub mod state;

pub use command::{Command, HELP};
pub use render::{render_matrix, render_navigation, render_status};
pub use shell::Shell;
pub use state::{ApplyOutcome, Console, ConsoleStatus};
