//! One layer of configuration: the base config or an exception overlay.
//!
//! A key present in a layer means "set here"; a key absent means "inherit".
//! Persisted keys that are not settings (anything outside [`SettingKey`])
//! are kept verbatim so that saving never drops data written by other
//! tools.

use cch_schema::{SchemaError, SettingKey, SettingValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A layer of explicit setting overrides.
///
/// Layers are values: every edit produces a new layer and leaves the
/// original untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ConfigLayer {
    settings: BTreeMap<SettingKey, SettingValue>,
    passthrough: Map<String, Value>,
}

impl ConfigLayer {
    /// An empty layer (inherits everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored at this layer, if any.
    pub fn get(&self, key: SettingKey) -> Option<&SettingValue> {
        self.settings.get(&key)
    }

    pub fn contains(&self, key: SettingKey) -> bool {
        self.settings.contains_key(&key)
    }

    /// Stored settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.settings.iter().map(|(k, v)| (*k, v))
    }

    /// Number of stored settings (pass-through keys not counted).
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Persisted keys this crate does not interpret.
    pub fn passthrough(&self) -> &Map<String, Value> {
        &self.passthrough
    }

    /// Copy of this layer with `key` stored as `value`, without any
    /// normalization. Editors should go through [`ConfigLayer::with_field`].
    pub fn with(&self, key: SettingKey, value: SettingValue) -> Self {
        let mut next = self.clone();
        next.settings.insert(key, value);
        next
    }

    /// Copy of this layer with `key` removed.
    pub fn without(&self, key: SettingKey) -> Self {
        let mut next = self.clone();
        next.settings.remove(&key);
        next
    }

    /// Copy of this layer keeping only the settings `keep` accepts.
    pub(crate) fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(SettingKey, &SettingValue) -> bool,
    {
        let mut next = self.clone();
        next.settings.retain(|k, v| keep(*k, v));
        next
    }
}

impl FromIterator<(SettingKey, SettingValue)> for ConfigLayer {
    fn from_iter<I: IntoIterator<Item = (SettingKey, SettingValue)>>(iter: I) -> Self {
        Self {
            settings: iter.into_iter().collect(),
            passthrough: Map::new(),
        }
    }
}

impl TryFrom<Map<String, Value>> for ConfigLayer {
    type Error = SchemaError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut layer = ConfigLayer::new();

        for (name, raw) in map {
            let key = match name.parse::<SettingKey>() {
                Ok(key) => key,
                Err(_) => {
                    layer.passthrough.insert(name, raw);
                    continue;
                }
            };

            let value: SettingValue = serde_json::from_value(raw).map_err(|e| {
                SchemaError::InvalidValue {
                    key,
                    reason: e.to_string(),
                }
            })?;

            // an empty stored string means "inherit"
            if value.is_empty_text() {
                continue;
            }

            if !key.accepts(&value) {
                return Err(SchemaError::InvalidValue {
                    key,
                    reason: format!("unexpected value {}", value),
                });
            }

            layer.settings.insert(key, value);
        }

        Ok(layer)
    }
}

impl From<ConfigLayer> for Map<String, Value> {
    fn from(layer: ConfigLayer) -> Self {
        let mut map = layer.passthrough;
        for (key, value) in layer.settings {
            let json = match value {
                SettingValue::Flag(b) => Value::Bool(b),
                SettingValue::Number(n) => Value::Number(n),
                SettingValue::Text(s) => Value::String(s),
            };
            map.insert(key.as_str().to_string(), json);
        }
        map
    }
}
