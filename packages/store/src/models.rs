//! # Overlay domain models
//!
//! Types persisted by [`crate::Overlay`]. The backend has no notion of any of
//! these: targets, levels, project assignments and the cached display fields
//! exist only on the operator's machine.
//!
//! | Type | Persisted as |
//! |------|--------------|
//! | [`Level`] | `"Level 1"`, `"Level 2"`, `"Level 3"` |
//! | [`LevelFilter`] | `"All Level"` or a level label |
//! | [`UserStatusFilter`] | `"All Users"`, `"Active Users"`, `"Inactive Users"` |
//! | [`CachedUserInfo`] | `{ email, first_name, last_name, username }` |
//!
//! [`OverlayRecord`] is never persisted as such; it is the per-user join of
//! every overlay map, built on read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned user id.
pub type UserId = i64;

/// Server-assigned project id.
pub type ProjectId = i64;

/// Operator-assigned skill level. Users without an entry are `Level 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    pub fn label(self) -> &'static str {
        match self {
            Level::One => "Level 1",
            Level::Two => "Level 2",
            Level::Three => "Level 3",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label.trim())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Level {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value).ok_or_else(|| format!("unknown level `{value}`"))
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.label().to_string()
    }
}

/// Directory filter on the overlay level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LevelFilter {
    #[default]
    All,
    Only(Level),
}

impl LevelFilter {
    const ALL_LABEL: &'static str = "All Level";

    pub fn options() -> Vec<LevelFilter> {
        std::iter::once(LevelFilter::All)
            .chain(Level::ALL.into_iter().map(LevelFilter::Only))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelFilter::All => Self::ALL_LABEL,
            LevelFilter::Only(level) => level.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        if label.trim() == Self::ALL_LABEL {
            return Some(LevelFilter::All);
        }
        Level::from_label(label).map(LevelFilter::Only)
    }

    pub fn admits(self, level: Level) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(wanted) => wanted == level,
        }
    }
}

impl TryFrom<String> for LevelFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value).ok_or_else(|| format!("unknown level filter `{value}`"))
    }
}

impl From<LevelFilter> for String {
    fn from(filter: LevelFilter) -> Self {
        filter.label().to_string()
    }
}

/// Directory filter on the server-side `is_active` flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UserStatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl UserStatusFilter {
    pub const ALL: [UserStatusFilter; 3] = [
        UserStatusFilter::All,
        UserStatusFilter::Active,
        UserStatusFilter::Inactive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UserStatusFilter::All => "All Users",
            UserStatusFilter::Active => "Active Users",
            UserStatusFilter::Inactive => "Inactive Users",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.label() == label.trim())
    }

    pub fn admits(self, is_active: bool) -> bool {
        match self {
            UserStatusFilter::All => true,
            UserStatusFilter::Active => is_active,
            UserStatusFilter::Inactive => !is_active,
        }
    }
}

impl TryFrom<String> for UserStatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_label(&value).ok_or_else(|| format!("unknown user filter `{value}`"))
    }
}

impl From<UserStatusFilter> for String {
    fn from(filter: UserStatusFilter) -> Self {
        filter.label().to_string()
    }
}

/// Display fields remembered for users that have project assignments, so the
/// assigned-tasks view can render them without the user being on the current
/// directory page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUserInfo {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl CachedUserInfo {
    /// "First Last" when either name is known, otherwise the email.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone()
        } else {
            full
        }
    }
}

/// Everything the overlay knows about one user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayRecord {
    pub user_id: UserId,
    pub target: Option<String>,
    pub level: Level,
    pub projects: Vec<ProjectId>,
    pub info: Option<CachedUserInfo>,
}

impl OverlayRecord {
    /// Target text as shown in the directory table.
    pub fn target_label(&self) -> &str {
        self.target.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels_roundtrip_through_json() {
        let json = serde_json::to_string(&Level::Two).unwrap();
        assert_eq!(json, "\"Level 2\"");
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Level::Two);
        assert!(serde_json::from_str::<Level>("\"Level 9\"").is_err());
    }

    #[test]
    fn test_level_filter_admits() {
        assert!(LevelFilter::All.admits(Level::Three));
        assert!(LevelFilter::Only(Level::One).admits(Level::One));
        assert!(!LevelFilter::Only(Level::One).admits(Level::Two));
        assert_eq!(LevelFilter::from_label("All Level"), Some(LevelFilter::All));
        assert_eq!(LevelFilter::options().len(), 4);
    }

    #[test]
    fn test_user_status_filter_admits() {
        assert!(UserStatusFilter::All.admits(false));
        assert!(UserStatusFilter::Active.admits(true));
        assert!(!UserStatusFilter::Active.admits(false));
        assert!(UserStatusFilter::Inactive.admits(false));
        assert_eq!(
            UserStatusFilter::from_label("Inactive Users"),
            Some(UserStatusFilter::Inactive)
        );
    }

    #[test]
    fn test_cached_user_info_display_name() {
        let mut info = CachedUserInfo {
            email: "alice@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(info.display_name(), "alice@example.com");

        info.first_name = Some("Alice".to_string());
        info.last_name = Some(" ".to_string());
        assert_eq!(info.display_name(), "Alice");
    }
}
