//! Shared UI for the admin console: the context providers, the views and
//! the dialogs they open. The web and desktop packages only add routing and
//! platform configuration on top.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod overlay;
pub use overlay::{make_overlay, OverlayStore};

#[cfg(not(target_arch = "wasm32"))]
pub mod config_file;

pub mod views;
pub mod dialogs;

pub const CONSOLE_CSS: Asset = asset!("/assets/styling/console.css");

mod console;
pub use console::{use_console, use_session, Console, ConsoleProvider, Session};

mod navbar;
pub use navbar::{NavTab, Navbar};

pub mod activity_log;
pub use activity_log::{log_activity, log_save, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle};
