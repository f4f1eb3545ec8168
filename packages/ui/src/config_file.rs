//! Loading `admin-console.toml` on native platforms.
//!
//! The file lives in `<config_dir>/labeling-admin/`. A missing file means
//! defaults; an unreadable or malformed one is logged and also means
//! defaults, so the console always starts. `LS_ADMIN_TOKEN`, when set,
//! replaces the token from the file.

use std::path::{Path, PathBuf};

use store::ConsoleConfig;

pub const TOKEN_ENV: &str = "LS_ADMIN_TOKEN";

/// `<config_dir>/labeling-admin/admin-console.toml`
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("labeling-admin")
        .join(ConsoleConfig::filename())
}

/// Load the config from the platform location and apply the env override.
pub fn load_config() -> ConsoleConfig {
    let config = load_config_from(&config_path());
    apply_token_override(config, std::env::var(TOKEN_ENV).ok())
}

pub fn load_config_from(path: &Path) -> ConsoleConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no console config, using defaults");
            return ConsoleConfig::default();
        }
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to read console config");
            return ConsoleConfig::default();
        }
    };
    match ConsoleConfig::from_toml(&text) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "invalid console config, using defaults");
            ConsoleConfig::default()
        }
    }
}

fn apply_token_override(config: ConsoleConfig, token: Option<String>) -> ConsoleConfig {
    match token {
        Some(token) if !token.trim().is_empty() => config.with_token(Some(token)),
        _ => config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: Option<&str>) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "labeling_admin_config_{name}_{}.toml",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        if let Some(contents) = contents {
            std::fs::write(&path, contents).unwrap();
        }
        path
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = temp_file("missing", None);
        assert_eq!(load_config_from(&path), ConsoleConfig::default());
    }

    #[test]
    fn test_malformed_file_is_default() {
        let path = temp_file("malformed", Some("[server\nbase_url = "));
        assert_eq!(load_config_from(&path), ConsoleConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_values_and_token_override() {
        let path = temp_file(
            "values",
            Some("[server]\nbase_url = \"https://labels.example.com\"\ntoken = \"from-file\"\n"),
        );
        let config = load_config_from(&path);
        assert_eq!(config.server.base_url, "https://labels.example.com");

        let kept = apply_token_override(config.clone(), Some("  ".to_string()));
        assert_eq!(kept.server.token.as_deref(), Some("from-file"));

        let replaced = apply_token_override(config, Some("from-env".to_string()));
        assert_eq!(replaced.server.token.as_deref(), Some("from-env"));
        let _ = std::fs::remove_file(&path);
    }
}
