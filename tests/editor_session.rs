//! Editor Session Tests
//!
//! Full load -> edit -> save cycles against the in-memory and on-disk
//! stores.

use cch_config::{
    ConditionKey, ConfigLayer, ConfigStore, DashboardFileStore, DefaultTable, EditorError,
    EditorSession, MemoryStore, RootConfig, SaveFailure, SettingKey, SettingValue, Target,
};
use serde_json::{json, Value};
use std::cell::Cell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

fn write_dashboard(dir: &TempDir, document: Value) -> std::path::PathBuf {
    let path = dir.path().join("ui-lovelace.json");
    fs::write(&path, document.to_string()).unwrap();
    path
}

fn read_dashboard(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// On-disk sessions
// =============================================================================

#[test]
fn test_file_session_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_dashboard(
        &dir,
        json!({
            "title": "Home",
            "views": [{"title": "Main"}],
            "cch": {"header": true, "menu": "hide"}
        }),
    );

    let mut session = EditorSession::open(DashboardFileStore::new(&path)).unwrap();
    session
        .set_field_str(Target::Base, "kiosk_mode", "true")
        .unwrap();
    let index = session.add_exception();
    session
        .set_exception_condition(index, ConditionKey::User, "Tablet")
        .unwrap();
    session
        .set_exception_field(index, SettingKey::KioskMode, SettingValue::Flag(false))
        .unwrap();
    session.save().unwrap();

    let document = read_dashboard(&path);
    assert_eq!(document["title"], "Home");
    assert_eq!(
        document["cch"],
        json!({
            "menu": "hide",
            "kiosk_mode": true,
            "exceptions": [
                {"conditions": {"user": "Tablet"}, "config": {"kiosk_mode": false}}
            ]
        })
    );

    // a fresh session sees exactly what was saved
    let reopened = EditorSession::open(DashboardFileStore::new(&path)).unwrap();
    assert_eq!(reopened.config(), session.config());
    let scope = reopened.scope(Target::Exception(0)).unwrap();
    assert_eq!(scope.resolve(SettingKey::Header).unwrap(), SettingValue::Flag(true));
}

#[test]
fn test_exception_extras_survive_save() {
    let dir = TempDir::new().unwrap();
    let path = write_dashboard(
        &dir,
        json!({
            "cch": {
                "exceptions": [
                    {
                        "conditions": {"user": "a", "device_id": "xyz"},
                        "config": {},
                        "note": "keep"
                    }
                ]
            }
        }),
    );

    let mut session = EditorSession::open(DashboardFileStore::new(&path)).unwrap();
    session
        .set_exception_condition(0, ConditionKey::UserAgent, "Mobile")
        .unwrap();
    session
        .set_exception_field(0, SettingKey::Menu, "clock".into())
        .unwrap();
    session.save().unwrap();

    let document = read_dashboard(&path);
    assert_eq!(
        document["cch"]["exceptions"],
        json!([
            {
                "conditions": {"user": "a", "user_agent": "Mobile", "device_id": "xyz"},
                "config": {"menu": "clock"},
                "note": "keep"
            }
        ])
    );
}

#[test]
fn test_file_session_with_host_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_dashboard(&dir, json!({"cch": {"swipe": true}}));
    let defaults_path = dir.path().join("defaults.toml");
    fs::write(&defaults_path, "swipe = true\n").unwrap();

    let store = DashboardFileStore::new(&path).with_defaults_file(&defaults_path);
    let mut session = EditorSession::open(store).unwrap();
    assert_eq!(session.defaults().get(SettingKey::Swipe).unwrap(), &SettingValue::Flag(true));

    session.save().unwrap();
    assert_eq!(read_dashboard(&path)["cch"], json!({}));
}

#[test]
fn test_malformed_cch_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = write_dashboard(&dir, json!({"cch": {"header": "sometimes"}}));

    let result = EditorSession::open(DashboardFileStore::new(&path));
    assert!(matches!(result, Err(EditorError::Store(_))));
}

// =============================================================================
// Save failures
// =============================================================================

#[test]
fn test_failed_save_then_retry_by_caller() {
    let mut store = MemoryStore::default();
    store.inject(SaveFailure::times(1, "timeout"));
    let mut session = EditorSession::open(store).unwrap();

    session
        .set_base_field(SettingKey::Voice, SettingValue::from("overflow"))
        .unwrap();
    let edited = session.config().clone();

    assert!(matches!(session.save(), Err(EditorError::PersistFailure(_))));
    assert_eq!(session.config(), &edited);
    assert_eq!(session.store().stored(), &RootConfig::default());

    // nothing retried on its own; the caller saves again
    session.save().unwrap();
    assert_eq!(session.store().stored(), &edited);
    assert_eq!(session.store().save_count(), 1);
}

#[test]
fn test_partial_defaults_store() {
    let defaults = DefaultTable::from_entries([(SettingKey::Header, SettingValue::Flag(true))]);
    let mut session = EditorSession::open(MemoryStore::default().with_defaults(defaults)).unwrap();

    // no inherited value: stored as given
    session
        .set_base_field(SettingKey::Swipe, SettingValue::Flag(false))
        .unwrap();
    assert!(session.config().base.contains(SettingKey::Swipe));

    assert!(matches!(
        session.scope(Target::Base).unwrap().resolve(SettingKey::Menu),
        Err(EditorError::UnknownKey(_))
    ));
}

// =============================================================================
// Change events
// =============================================================================

#[test]
fn test_every_committed_edit_fires_once() {
    let fired = Rc::new(Cell::new(0));
    let mut session = EditorSession::open(MemoryStore::default()).unwrap();
    let counter = Rc::clone(&fired);
    session.subscribe(move |_: &RootConfig| counter.set(counter.get() + 1));

    session.add_exception();
    session.add_exception();
    session
        .set_exception_field(1, SettingKey::Menu, SettingValue::from("clock"))
        .unwrap();
    session.delete_exception(0).unwrap();
    assert!(session.delete_exception(1).is_err());

    assert_eq!(fired.get(), 4);
    assert_eq!(session.config().exceptions.len(), 1);
    assert_eq!(
        session
            .config()
            .exceptions
            .get(0)
            .unwrap()
            .config
            .get(SettingKey::Menu),
        Some(&SettingValue::from("clock"))
    );
}

#[test]
fn test_cancel_discards_edits() {
    let stored = RootConfig::default()
        .with_base(ConfigLayer::new().with(SettingKey::Chevrons, SettingValue::Flag(true)));
    let mut session = EditorSession::open(MemoryStore::new(stored.clone())).unwrap();
    session.clear_base_field(SettingKey::Chevrons).unwrap();
    assert!(session.is_dirty());

    assert_eq!(session.cancel(), stored);
}

#[test]
fn test_store_trait_object_usable() {
    let mut store: Box<dyn ConfigStore> = Box::new(MemoryStore::default());
    store.save(&RootConfig::default()).unwrap();
    assert_eq!(store.load_current().unwrap(), RootConfig::default());
}
