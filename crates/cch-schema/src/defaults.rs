//! Default values (the last step of every lookup).

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::key::{SettingKey, ValueKind};
use crate::value::SettingValue;

/// Immutable mapping from setting key to its default value.
///
/// The builtin table covers every key. Hosts may hand in a partial table;
/// looking up a key it lacks is reported as [`SchemaError::UnknownKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    entries: BTreeMap<SettingKey, SettingValue>,
}

impl Default for DefaultTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DefaultTable {
    /// The stock defaults shipped with the plugin.
    pub fn builtin() -> Self {
        use SettingKey::*;

        let text = |s: &str| SettingValue::Text(s.to_string());
        Self::from_entries([
            (Disable, SettingValue::Flag(false)),
            (Header, SettingValue::Flag(true)),
            (Chevrons, SettingValue::Flag(false)),
            (Redirect, SettingValue::Flag(true)),
            (KioskMode, SettingValue::Flag(false)),
            (HideHelp, SettingValue::Flag(false)),
            (SidebarClosed, SettingValue::Flag(false)),
            (SidebarSwipe, SettingValue::Flag(true)),
            (Menu, text("show")),
            (Notifications, text("show")),
            (Voice, text("show")),
            (Options, text("show")),
            (ClockFormat, text("12")),
            (ClockAmPm, SettingValue::Flag(true)),
            (ClockDate, SettingValue::Flag(false)),
            (DateLocale, text("")),
            (ShowTabs, text("")),
            (HideTabs, text("")),
            (DefaultTab, text("")),
            (Swipe, SettingValue::Flag(false)),
            (SwipeWrap, SettingValue::Flag(true)),
            (SwipePreventDefault, SettingValue::Flag(false)),
            (SwipeAnimate, text("none")),
            (SwipeAmount, text("15")),
            (SwipeSkip, text("")),
        ])
    }

    /// Build a table from explicit entries. Keys not given have no default.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (SettingKey, SettingValue)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Default for `key`.
    pub fn get(&self, key: SettingKey) -> Result<&SettingValue, SchemaError> {
        self.entries
            .get(&key)
            .ok_or_else(|| SchemaError::UnknownKey(key.as_str().to_string()))
    }

    /// Whether the table has an entry for `key`.
    pub fn contains(&self, key: SettingKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply host overrides given as a flat TOML table (`swipe = true`).
    ///
    /// Unknown keys and values of the wrong kind are rejected; the table is
    /// left as it was in that case.
    pub fn with_overrides_toml(&self, contents: &str) -> Result<Self, SchemaError> {
        let table: toml::Table =
            toml::from_str(contents).map_err(|e| SchemaError::Toml(e.to_string()))?;

        let mut entries = self.entries.clone();
        for (name, raw) in table {
            let key: SettingKey = name.parse()?;
            entries.insert(key, Self::toml_to_setting(key, raw)?);
        }

        Ok(Self { entries })
    }

    fn toml_to_setting(key: SettingKey, raw: toml::Value) -> Result<SettingValue, SchemaError> {
        match (key.kind(), raw) {
            (ValueKind::Flag, toml::Value::Boolean(b)) => Ok(SettingValue::Flag(b)),
            (ValueKind::NumberText, toml::Value::Integer(i)) => Ok(SettingValue::Text(i.to_string())),
            (ValueKind::NumberText, toml::Value::Float(f)) if f.is_finite() => {
                Ok(SettingValue::Text(f.to_string()))
            }
            (ValueKind::Flag, other) => Err(SchemaError::invalid(
                key,
                format!("expected a boolean, got {}", other.type_str()),
            )),
            (_, toml::Value::String(s)) => key.parse_value(&s),
            (_, other) => Err(SchemaError::invalid(
                key,
                format!("expected a string, got {}", other.type_str()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_key() {
        let defaults = DefaultTable::builtin();
        assert_eq!(defaults.len(), SettingKey::ALL.len());
        for key in SettingKey::ALL {
            let value = defaults.get(key).unwrap();
            if !value.is_empty_text() {
                assert!(key.accepts(value), "{} default has wrong shape", key);
            }
        }
    }

    #[test]
    fn test_builtin_values() {
        let defaults = DefaultTable::builtin();
        assert_eq!(defaults.get(SettingKey::Header).unwrap(), &SettingValue::Flag(true));
        assert_eq!(defaults.get(SettingKey::KioskMode).unwrap(), &SettingValue::Flag(false));
        assert_eq!(defaults.get(SettingKey::Menu).unwrap(), &SettingValue::from("show"));
        assert_eq!(defaults.get(SettingKey::SwipeAmount).unwrap(), &SettingValue::from("15"));
    }

    #[test]
    fn test_partial_table_reports_missing_key() {
        let defaults = DefaultTable::from_entries([(SettingKey::Header, SettingValue::Flag(true))]);
        assert!(defaults.contains(SettingKey::Header));
        assert_eq!(
            defaults.get(SettingKey::Swipe).unwrap_err(),
            SchemaError::UnknownKey("swipe".to_string())
        );
    }

    #[test]
    fn test_toml_overrides() {
        let defaults = DefaultTable::builtin()
            .with_overrides_toml("swipe = true\nswipe_amount = 30\nmenu = \"hide\"\n")
            .unwrap();

        assert_eq!(defaults.get(SettingKey::Swipe).unwrap(), &SettingValue::Flag(true));
        assert_eq!(defaults.get(SettingKey::SwipeAmount).unwrap(), &SettingValue::from("30"));
        assert_eq!(defaults.get(SettingKey::Menu).unwrap(), &SettingValue::from("hide"));
        // untouched keys keep their builtin value
        assert_eq!(defaults.get(SettingKey::Header).unwrap(), &SettingValue::Flag(true));
    }

    #[test]
    fn test_toml_rejects_bad_input() {
        let defaults = DefaultTable::builtin();
        assert!(matches!(
            defaults.with_overrides_toml("bogus = true"),
            Err(SchemaError::UnknownKey(_))
        ));
        assert!(matches!(
            defaults.with_overrides_toml("header = \"yes\""),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert!(matches!(
            defaults.with_overrides_toml("voice = \"maybe\""),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert!(matches!(
            defaults.with_overrides_toml("header = "),
            Err(SchemaError::Toml(_))
        ));
    }
}
