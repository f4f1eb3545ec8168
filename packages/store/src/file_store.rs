//! # Filesystem-backed overlay store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that keeps each overlay
//! key in its own file. It is used on desktop to retain operator metadata
//! across restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── levelFilter.json
//! ├── userTargets.json
//! └── ...
//! ```
//!
//! Writes go to a sibling `.tmp` file first and are renamed into place, so a
//! crash mid-write leaves the previous value intact.
//!
//! ## Platform data directories
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/labeling-admin/` |
//! | Linux | `~/.local/share/labeling-admin/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\labeling-admin\` |

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::overlay::KeyValueStore;
use crate::StoreError;

/// Filesystem-backed KeyValueStore for desktop persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }

    /// Delete every stored key.
    pub fn delete_all(base: &Path) {
        if let Err(error) = std::fs::remove_dir_all(base) {
            if error.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %base.display(), %error, "failed to clear overlay directory");
            }
        }
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(StoreError::Read {
                key: key.to_string(),
                message: error.to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let write_error = |error: std::io::Error| StoreError::Write {
            key: key.to_string(),
            message: error.to_string(),
        };

        std::fs::create_dir_all(&self.base).map_err(write_error)?;
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(write_error)?;
        std::fs::rename(&tmp, &path).map_err(write_error)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::Write {
                key: key.to_string(),
                message: error.to_string(),
            }),
        }
    }
}
