pub mod config;
pub mod envelope;
pub mod models;
pub mod overlay;

mod error;
pub use error::StoreError;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use config::ConsoleConfig;
pub use models::{
    CachedUserInfo, Level, LevelFilter, OverlayRecord, ProjectId, UserId, UserStatusFilter,
};
pub use overlay::{KeyValueStore, Overlay, OverlayKey, SaveOutcome};
