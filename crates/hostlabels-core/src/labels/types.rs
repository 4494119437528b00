//! Label record type and store error definitions.

use serde::{Deserialize, Serialize};

/// Sequence that terminates a key in the label file grammar.
pub(super) const KEY_DELIMITER: &str = "\":";

// ==============================================================================
// Label
// ==============================================================================

/// A single host label. `value` is kept raw and may contain `$(token)`
/// placeholders; expansion happens only when the store is formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>, hidden: bool) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            hidden,
        }
    }
}

// ==============================================================================
// Errors
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LabelStoreError {
    #[error("label key must not be empty")]
    EmptyKey,

    #[error("label key cannot be stored in a label file: {0:?}")]
    InvalidKey(String),

    #[error("value for label `{0}` must not contain line breaks")]
    InvalidValue(String),
}

/// Reject keys and values that the line grammar cannot represent.
pub(super) fn validate_entry(key: &str, value: &str) -> Result<(), LabelStoreError> {
    if key.is_empty() {
        return Err(LabelStoreError::EmptyKey);
    }
    // The first `":` on a line ends the key, so the key itself must not contain one.
    if key.contains(KEY_DELIMITER) || key.contains(['\n', '\r']) {
        return Err(LabelStoreError::InvalidKey(key.to_string()));
    }
    if value.contains('\n') {
        return Err(LabelStoreError::InvalidValue(key.to_string()));
    }
    Ok(())
}
