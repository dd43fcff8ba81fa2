//! The string encoding OS preference services store values in.

use super::{StoreError, Value};

pub fn to_json(key: &str, value: &Value) -> Result<String, StoreError> {
    serde_json::to_string(value)
        .map_err(|e| StoreError::Backend(format!("cannot encode preference `{key}`: {e}")))
}

/// Values that fail to decode read as absent.
pub fn from_json(key: &str, s: &str) -> Option<Value> {
    match serde_json::from_str(s) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring undecodable value for preference `{key}`: {e}");
            None
        }
    }
}
