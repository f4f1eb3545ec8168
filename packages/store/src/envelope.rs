//! # Versioned envelopes for overlay values
//!
//! Every value the overlay writes is wrapped as
//!
//! ```json
//! { "schema": 1, "revision": 7, "updated_at": 1760000000000, "value": ... }
//! ```
//!
//! `revision` grows by one on every save of the key and lets a handle notice
//! that someone else (another tab, another window) wrote the key since it last
//! looked. `schema` guards against reading a layout from a newer build.
//!
//! Values written before envelopes existed are still readable: plain JSON is
//! taken as-is, and a bare non-JSON string (how the two filter keys used to be
//! stored) is tried as a JSON string. Both decode as revision `0`.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::StoreError;

/// Newest envelope layout this build reads and the one it writes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub schema: u32,
    pub revision: u64,
    pub updated_at: i64,
    pub value: T,
}

/// A decoded value and the revision it was stored under.
#[derive(Debug, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub revision: u64,
}

/// Wrap `value` for storage under `key`.
pub fn encode<T: Serialize>(key: &str, value: &T, revision: u64) -> Result<String, StoreError> {
    let envelope = Envelope {
        schema: SCHEMA_VERSION,
        revision,
        updated_at: now_millis(),
        value,
    };
    serde_json::to_string(&envelope).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Decode a stored value, accepting both envelopes and legacy raw values.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Decoded<T>, StoreError> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(source) => {
            // Legacy bare string, e.g. `Level 2` without quotes.
            return serde_json::from_value(Value::String(raw.to_string()))
                .map(|value| Decoded { value, revision: 0 })
                .map_err(|_| StoreError::Decode {
                    key: key.to_string(),
                    source,
                });
        }
    };

    if is_envelope(&parsed) {
        let envelope: Envelope<T> =
            serde_json::from_value(parsed).map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })?;
        if envelope.schema > SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                key: key.to_string(),
                found: envelope.schema,
                supported: SCHEMA_VERSION,
            });
        }
        return Ok(Decoded {
            value: envelope.value,
            revision: envelope.revision,
        });
    }

    serde_json::from_value(parsed)
        .map(|value| Decoded { value, revision: 0 })
        .map_err(|source| StoreError::Decode {
            key: key.to_string(),
            source,
        })
}

/// Revision of a stored value without decoding its payload. Legacy or
/// unreadable values count as revision `0`.
pub fn peek_revision(raw: &str) -> u64 {
    serde_json::from_str::<Envelope<IgnoredAny>>(raw)
        .map(|envelope| envelope.revision)
        .unwrap_or(0)
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.len() == 4
            && map.contains_key("schema")
            && map.contains_key("revision")
            && map.contains_key("value")
            && map.contains_key("updated_at")
    })
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        js_sys::Date::now() as i64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::{Level, LevelFilter};

    #[test]
    fn test_envelope_roundtrip_keeps_revision() {
        let raw = encode("userTargets", &vec![1, 2, 3], 4).unwrap();
        let decoded: Decoded<Vec<i64>> = decode("userTargets", &raw).unwrap();
        assert_eq!(decoded.value, vec![1, 2, 3]);
        assert_eq!(decoded.revision, 4);
        assert_eq!(peek_revision(&raw), 4);
    }

    #[test]
    fn test_legacy_json_object_decodes_at_revision_zero() {
        let raw = r#"{"12":"Level 3","7":"Level 1"}"#;
        let decoded: Decoded<BTreeMap<i64, Level>> = decode("userLevels", raw).unwrap();
        assert_eq!(decoded.revision, 0);
        assert_eq!(decoded.value.get(&12), Some(&Level::Three));
        assert_eq!(peek_revision(raw), 0);
    }

    #[test]
    fn test_legacy_bare_string_decodes() {
        let decoded: Decoded<LevelFilter> = decode("levelFilter", "Level 2").unwrap();
        assert_eq!(decoded.value, LevelFilter::Only(Level::Two));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = decode::<BTreeMap<i64, String>>("userTargets", "{not json");
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let raw = r#"{"schema":99,"revision":1,"updated_at":0,"value":[]}"#;
        let result = decode::<Vec<i64>>("userProjectAssignments", raw);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedSchema { found: 99, .. })
        ));
    }
}
