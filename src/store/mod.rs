//! Storage collaborators
//!
//! The editing core never touches storage itself; a session loads its
//! starting config and defaults through a [`ConfigStore`] and hands the
//! finished config back to it on save.

mod file;
mod memory;

pub use file::{DashboardFileStore, CCH_KEY};
pub use memory::{MemoryStore, SaveFailure};

use cch_schema::DefaultTable;

use crate::root::RootConfig;

/// Where header configuration is loaded from and saved to.
pub trait ConfigStore {
    /// The currently persisted configuration.
    fn load_current(&self) -> Result<RootConfig, StoreError>;

    /// Persist `config` as a whole. Either all of it is stored or the call
    /// fails.
    fn save(&mut self, config: &RootConfig) -> Result<(), StoreError>;

    /// The default table lookups fall back to.
    fn defaults(&self) -> Result<DefaultTable, StoreError> {
        Ok(DefaultTable::builtin())
    }
}

/// Storage errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Save rejected: {0}")]
    Rejected(String),
}
