//! Schema errors.

use crate::key::SettingKey;

/// Errors raised while interpreting setting names and values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// The setting name is not part of the schema, or the default table has
    /// no entry for it.
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    /// The value does not fit the kind of the setting.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        key: SettingKey,
        reason: String,
    },

    /// A defaults file could not be parsed.
    #[error("defaults parse error: {0}")]
    Toml(String),
}

impl SchemaError {
    pub(crate) fn invalid(key: SettingKey, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}
