use thiserror::Error;

/// Failures raised by overlay backends and the envelope codec.
///
/// These never reach the operator directly: [`crate::Overlay`] logs them and
/// falls back to defaults (reads) or a [`crate::SaveOutcome::Failed`] (writes).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read `{key}`: {message}")]
    Read { key: String, message: String },

    #[error("failed to write `{key}`: {message}")]
    Write { key: String, message: String },

    #[error("invalid JSON stored under `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode value for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{key}` was written with schema {found}, newest understood is {supported}")]
    UnsupportedSchema { key: String, found: u32, supported: u32 },
}
