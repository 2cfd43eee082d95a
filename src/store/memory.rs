//! In-process store with save failure injection.

use cch_schema::DefaultTable;

use super::{ConfigStore, StoreError};
use crate::root::RootConfig;

/// Failure injected into [`MemoryStore::save`].
#[derive(Debug, Clone)]
pub struct SaveFailure {
    /// Message carried by the rejection
    pub message: String,
    /// Number of saves to fail before succeeding (None = always fail)
    pub fail_count: Option<u32>,
}

impl SaveFailure {
    /// Fail every save.
    pub fn always(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fail_count: None,
        }
    }

    /// Fail the next `count` saves, then succeed.
    pub fn times(count: u32, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fail_count: Some(count),
        }
    }
}

/// Store keeping the persisted config in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stored: RootConfig,
    defaults: DefaultTable,
    failure: Option<SaveFailure>,
    attempts: u32,
    saves: u32,
}

impl MemoryStore {
    pub fn new(stored: RootConfig) -> Self {
        Self {
            stored,
            ..Self::default()
        }
    }

    /// Use `defaults` instead of the builtin table.
    pub fn with_defaults(mut self, defaults: DefaultTable) -> Self {
        self.defaults = defaults;
        self
    }

    /// Inject a save failure.
    pub fn inject(&mut self, failure: SaveFailure) {
        self.failure = Some(failure);
        self.attempts = 0;
    }

    /// Clear any injected failure.
    pub fn clear_failure(&mut self) {
        self.failure = None;
        self.attempts = 0;
    }

    /// The persisted config.
    pub fn stored(&self) -> &RootConfig {
        &self.stored
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> u32 {
        self.saves
    }

    fn check_failure(&mut self) -> Option<String> {
        let (fail_count, message) = match &self.failure {
            Some(failure) => (failure.fail_count, failure.message.clone()),
            None => return None,
        };
        self.attempts += 1;
        match fail_count {
            Some(limit) if self.attempts > limit => None,
            _ => Some(message),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load_current(&self) -> Result<RootConfig, StoreError> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, config: &RootConfig) -> Result<(), StoreError> {
        if let Some(message) = self.check_failure() {
            return Err(StoreError::Rejected(message));
        }
        self.stored = config.clone();
        self.saves += 1;
        Ok(())
    }

    fn defaults(&self) -> Result<DefaultTable, StoreError> {
        Ok(self.defaults.clone())
    }
}
