//! Editor errors.

use cch_schema::{SchemaError, SettingKey};

use crate::store::StoreError;

/// Errors surfaced by the editing core.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// An exception index (or a handle issued before a delete) no longer
    /// points at an entry.
    #[error("exception index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A setting name outside the schema, or missing from the default table.
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    /// Input rejected at the binding boundary.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: SettingKey, reason: String },

    /// The host defaults could not be read.
    #[error("invalid defaults: {0}")]
    Defaults(String),

    /// The storage collaborator did not accept the save. The in-memory
    /// config is unchanged.
    #[error("save failed: {0}")]
    PersistFailure(String),

    /// Loading from the storage collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SchemaError> for EditorError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownKey(name) => Self::UnknownKey(name),
            SchemaError::InvalidValue { key, reason } => Self::InvalidValue { key, reason },
            SchemaError::Toml(msg) => Self::Defaults(msg),
        }
    }
}

/// Result alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
