//! CCH Config - editing core for the compact custom header configuration
//!
//! A header configuration is a base layer of settings plus a list of
//! exceptions, each a set of conditions paired with an overlay layer.
//! This crate resolves effective values through overlay -> base -> defaults,
//! applies single-field edits without letting a layer store what it would
//! inherit anyway, edits the exception list, and prunes the base layer
//! before it is persisted.

pub mod config;
pub mod error;
pub mod exceptions;
pub mod root;
pub mod session;
pub mod store;

pub use cch_schema::{DefaultTable, SchemaError, SettingKey, SettingValue, ValueKind};
pub use config::{parse_id_list, prune, ConfigLayer, Scope, TabVisibility};
pub use error::{EditorError, EditorResult};
pub use exceptions::{ConditionKey, Conditions, Exception, ExceptionHandle, ExceptionList};
pub use root::{RootConfig, Target};
pub use session::{ConfigObserver, EditorSession};
pub use store::{ConfigStore, DashboardFileStore, MemoryStore, SaveFailure, StoreError};
