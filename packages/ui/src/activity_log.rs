//! Operator-facing activity log.
//!
//! Everything worth telling the operator about (fetch failures, assignment
//! results, overlay write problems) lands here as well as in `tracing`. The
//! log is a context signal provided by the app root.

use dioxus::prelude::*;
use store::SaveOutcome;

/// Oldest entries are dropped past this.
const MAX_ENTRIES: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    pub fn push(&mut self, level: LogLevel, message: &str) {
        self.entries.push(LogEntry {
            timestamp: current_time(),
            level,
            message: message.to_string(),
        });
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.level == LogLevel::Error)
            .count()
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    log.write().push(level, message);
}

/// Record an overlay write. Clean writes stay out of the log.
pub fn log_save(log: &mut Signal<ActivityLog>, what: &str, outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Unchanged | SaveOutcome::Written { .. } => {}
        SaveOutcome::Overwrote { previous, revision } => log_activity(
            log,
            LogLevel::Warning,
            &format!(
                "{what}: saved over changes from another window (revision {previous} -> {revision})"
            ),
        ),
        SaveOutcome::Failed => log_activity(
            log,
            LogLevel::Error,
            &format!("{what}: could not be saved locally"),
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

/// UTC wall clock; native builds have no local timezone database at hand.
#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (h, m, s) = ((secs / 3600) % 24, (secs / 60) % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}
