//! # `localStorage` overlay store: browser-side persistence
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] implementation used on the
//! **web platform**. Each overlay key maps to one `window.localStorage` item.
//!
//! ## Namespacing
//!
//! Unscoped stores use the bare key names, which is what earlier builds of the
//! console wrote, so existing browser profiles keep their data. A scoped store
//! prefixes every key with `"<namespace>:"`, isolating e.g. two backends
//! administered from the same browser.
//!
//! ## Error handling
//!
//! Storage can be missing (no window), disabled by the browser, or full.
//! Each case surfaces as a [`StoreError`]; [`crate::Overlay`] logs it and the
//! console carries on without persistence.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::overlay::KeyValueStore;
use crate::StoreError;

/// `window.localStorage`-backed KeyValueStore for web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore {
    prefix: Option<String>,
}

impl LocalStorageStore {
    /// Create a store scoped to an optional namespace.
    ///
    /// - `Some("staging")` → keys like `"staging:userTargets"`
    /// - `None` → keys like `"userTargets"`
    pub fn with_namespace(namespace: Option<&str>) -> Self {
        Self {
            prefix: namespace
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
        }
    }

    fn item_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }

    fn storage() -> Result<Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|err| StoreError::Unavailable(js_message(err)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))
    }
}

fn js_message(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl KeyValueStore for LocalStorageStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(&self.item_name(key))
            .map_err(|err| StoreError::Read {
                key: key.to_string(),
                message: js_message(err),
            })
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.item_name(key), &value)
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                message: js_message(err),
            })
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&self.item_name(key))
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                message: js_message(err),
            })
    }
}
