//! An editing session over one header configuration.
//!
//! The session holds two values: the config as last loaded or saved, and
//! the working config every edit produces a new version of. Saving hands
//! the working config to the store; until the store accepts it the loaded
//! snapshot is kept, so a failed save leaves both values as they were and
//! cancelling returns the snapshot untouched.

use cch_schema::{DefaultTable, SettingKey, SettingValue};
use tracing::{debug, info, warn};

use crate::config::Scope;
use crate::error::{EditorError, EditorResult};
use crate::exceptions::{ConditionKey, Exception};
use crate::root::{RootConfig, Target};
use crate::store::ConfigStore;

/// Receives the full config after every committed edit.
pub trait ConfigObserver {
    fn config_changed(&self, config: &RootConfig);
}

impl<F> ConfigObserver for F
where
    F: Fn(&RootConfig),
{
    fn config_changed(&self, config: &RootConfig) {
        self(config)
    }
}

/// Editing session owning a store and the config being edited.
pub struct EditorSession<S: ConfigStore> {
    store: S,
    defaults: DefaultTable,
    snapshot: RootConfig,
    working: RootConfig,
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl<S: ConfigStore> EditorSession<S> {
    /// Load defaults and the current config from `store`.
    pub fn open(store: S) -> EditorResult<Self> {
        let defaults = store.defaults()?;
        let snapshot = store.load_current()?;
        debug!(
            base_keys = snapshot.base.len(),
            exceptions = snapshot.exceptions.len(),
            "editor session opened"
        );

        Ok(Self {
            store,
            defaults,
            working: snapshot.clone(),
            snapshot,
            observers: Vec::new(),
        })
    }

    /// The working config.
    pub fn config(&self) -> &RootConfig {
        &self.working
    }

    /// The config as last loaded or successfully saved.
    pub fn snapshot(&self) -> &RootConfig {
        &self.snapshot
    }

    pub fn defaults(&self) -> &DefaultTable {
        &self.defaults
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Whether there are edits not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.working != self.snapshot
    }

    /// Register an observer for committed edits.
    pub fn subscribe(&mut self, observer: impl ConfigObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Resolution scope for `target` in the working config.
    pub fn scope(&self, target: Target) -> EditorResult<Scope<'_>> {
        self.working.scope(target, &self.defaults)
    }

    /// Apply a typed edit to the layer at `target`.
    pub fn set_field(
        &mut self,
        target: Target,
        key: SettingKey,
        value: SettingValue,
    ) -> EditorResult<&RootConfig> {
        let layer = self.scope(target)?.set_field(key, value);
        let next = self.working.with_layer(target, layer)?;
        Ok(self.commit(next))
    }

    /// Apply an edit given as text, validating it against the key's kind.
    pub fn set_field_str(&mut self, target: Target, name: &str, raw: &str) -> EditorResult<&RootConfig> {
        let key: SettingKey = name.parse()?;
        let value = key.parse_value(raw)?;
        self.set_field(target, key, value)
    }

    /// Remove `key` from the layer at `target` so it inherits again.
    pub fn clear_field(&mut self, target: Target, key: SettingKey) -> EditorResult<&RootConfig> {
        self.set_field(target, key, SettingValue::Text(String::new()))
    }

    pub fn set_base_field(&mut self, key: SettingKey, value: SettingValue) -> EditorResult<&RootConfig> {
        self.set_field(Target::Base, key, value)
    }

    pub fn clear_base_field(&mut self, key: SettingKey) -> EditorResult<&RootConfig> {
        self.clear_field(Target::Base, key)
    }

    pub fn set_exception_field(
        &mut self,
        index: usize,
        key: SettingKey,
        value: SettingValue,
    ) -> EditorResult<&RootConfig> {
        self.set_field(Target::Exception(index), key, value)
    }

    /// Set one condition of exception `index`; empty input removes it.
    pub fn set_exception_condition(
        &mut self,
        index: usize,
        key: ConditionKey,
        value: &str,
    ) -> EditorResult<&RootConfig> {
        let current = self.working.exceptions.get(index)?;
        let exception = current.with_conditions(current.conditions.with_condition(key, value));
        self.replace_exception(index, exception)
    }

    /// Append an empty exception and return its index.
    pub fn add_exception(&mut self) -> usize {
        let next = self.working.with_exceptions(self.working.exceptions.add());
        self.commit(next).exceptions.len() - 1
    }

    pub fn replace_exception(&mut self, index: usize, exception: Exception) -> EditorResult<&RootConfig> {
        let exceptions = self.working.exceptions.replace(index, exception)?;
        let next = self.working.with_exceptions(exceptions);
        Ok(self.commit(next))
    }

    /// Remove exception `index`. Indices of later exceptions shift down.
    pub fn delete_exception(&mut self, index: usize) -> EditorResult<&RootConfig> {
        let exceptions = self.working.exceptions.delete(index)?;
        let next = self.working.with_exceptions(exceptions);
        Ok(self.commit(next))
    }

    /// Prune the base layer and persist the working config.
    ///
    /// On failure nothing in the session changes and the error is returned
    /// as [`EditorError::PersistFailure`]; there is no retry.
    pub fn save(&mut self) -> EditorResult<()> {
        let candidate = self.working.pruned(&self.defaults);

        match self.store.save(&candidate) {
            Ok(()) => {
                info!(
                    base_keys = candidate.base.len(),
                    exceptions = candidate.exceptions.len(),
                    "configuration saved"
                );
                self.snapshot = candidate.clone();
                self.working = candidate;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "save failed, keeping in-memory configuration");
                Err(EditorError::PersistFailure(e.to_string()))
            }
        }
    }

    /// End the session without saving, returning the loaded snapshot.
    pub fn cancel(self) -> RootConfig {
        debug!(dirty = self.is_dirty(), "editor session cancelled");
        self.snapshot
    }

    /// Give the store back, dropping the session.
    pub fn into_store(self) -> S {
        self.store
    }

    fn commit(&mut self, next: RootConfig) -> &RootConfig {
        self.working = next;
        for observer in &self.observers {
            observer.config_changed(&self.working);
        }
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLayer;
    use crate::store::{MemoryStore, SaveFailure};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> EditorSession<MemoryStore> {
        EditorSession::open(MemoryStore::default()).unwrap()
    }

    #[test]
    fn test_open_copies_stored_config() {
        let stored = RootConfig::default()
            .with_base(ConfigLayer::new().with(SettingKey::Menu, "hide".into()));
        let session = EditorSession::open(MemoryStore::new(stored.clone())).unwrap();

        assert_eq!(session.config(), &stored);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_edit_notifies_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session();
        let sink = Rc::clone(&seen);
        session.subscribe(move |config: &RootConfig| sink.borrow_mut().push(config.clone()));

        session.set_base_field(SettingKey::Swipe, SettingValue::Flag(true)).unwrap();
        session.add_exception();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].base.contains(SettingKey::Swipe));
        assert_eq!(seen[1].exceptions.len(), 1);
    }

    #[test]
    fn test_failed_edit_notifies_nobody() {
        let count = Rc::new(RefCell::new(0));
        let mut session = session();
        let sink = Rc::clone(&count);
        session.subscribe(move |_: &RootConfig| *sink.borrow_mut() += 1);

        assert!(session.delete_exception(0).is_err());
        assert!(session.set_field_str(Target::Base, "menu", "sideways").is_err());
        assert_eq!(*count.borrow(), 0);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_set_field_str_validates() {
        let mut session = session();
        session.set_field_str(Target::Base, "clock_format", "24").unwrap();
        assert_eq!(
            session.config().base.get(SettingKey::ClockFormat),
            Some(&SettingValue::from("24"))
        );

        assert!(matches!(
            session.set_field_str(Target::Base, "colour", "red"),
            Err(EditorError::UnknownKey(_))
        ));
        assert!(matches!(
            session.set_field_str(Target::Base, "header", "maybe"),
            Err(EditorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_exception_condition_edit() {
        let mut session = session();
        let index = session.add_exception();
        session
            .set_exception_condition(index, ConditionKey::UserAgent, "Mobile")
            .unwrap();

        assert_eq!(session.config().exceptions.get(index).unwrap().label(), "Mobile");

        session.set_exception_condition(index, ConditionKey::UserAgent, "").unwrap();
        assert!(session.config().exceptions.get(index).unwrap().conditions.is_empty());
    }

    #[test]
    fn test_save_prunes_and_updates_snapshot() {
        let mut session = session();
        session.set_base_field(SettingKey::Menu, "clock".into()).unwrap();
        // stored directly, bypassing normalization
        let base = session.config().base.with(SettingKey::Header, SettingValue::Flag(true));
        let next = session.config().with_base(base);
        session.commit(next);

        session.save().unwrap();

        let stored = session.store().stored().clone();
        assert!(!stored.base.contains(SettingKey::Header));
        assert!(stored.base.contains(SettingKey::Menu));
        assert_eq!(session.snapshot(), &stored);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let mut session = session();
        session.store_mut().inject(SaveFailure::always("backend offline"));
        session.set_base_field(SettingKey::KioskMode, SettingValue::Flag(true)).unwrap();
        let before = session.config().clone();

        let err = session.save().unwrap_err();

        assert!(matches!(err, EditorError::PersistFailure(ref msg) if msg.contains("backend offline")));
        assert_eq!(session.config(), &before);
        assert_eq!(session.snapshot(), &RootConfig::default());
        assert!(session.is_dirty());
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn test_cancel_returns_snapshot() {
        let mut session = session();
        session.set_base_field(SettingKey::Swipe, SettingValue::Flag(true)).unwrap();
        assert_eq!(session.cancel(), RootConfig::default());
    }
}
