//! Shared overlay constructor for all platforms.
//!
//! Returns a [`store::Overlay`] backed by the appropriate [`store::KeyValueStore`]:
//! - **Web** (WASM + `web` feature): `window.localStorage` via [`store::LocalStorageStore`]
//! - **Desktop** (native): one JSON file per key via [`store::FileStore`]
//! - **WASM without `web`**: in-memory only, nothing survives a reload

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type OverlayStore = store::LocalStorageStore;

#[cfg(not(target_arch = "wasm32"))]
pub type OverlayStore = store::FileStore;

#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type OverlayStore = store::MemoryStore;

/// Create a platform-appropriate overlay scoped to an optional namespace.
///
/// When `namespace` is `Some("staging")`:
/// - **Web**: keys are stored as `"staging:userTargets"` etc.
/// - **Desktop**: files live under `<data_dir>/labeling-admin/staging/`
///
/// When `namespace` is `None`, the unscoped keys earlier builds wrote are used.
pub fn make_overlay(namespace: Option<&str>) -> store::Overlay<OverlayStore> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::Overlay::new(store::LocalStorageStore::with_namespace(namespace))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("labeling-admin");
        let scoped = match namespace {
            Some(ns) => base.join(ns),
            None => base,
        };
        store::Overlay::new(store::FileStore::new(scoped))
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        let _ = namespace;
        store::Overlay::new(store::MemoryStore::new())
    }
}
