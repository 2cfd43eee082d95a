//! The persisted unit: base layer plus exceptions.

use cch_schema::DefaultTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{prune, ConfigLayer, Scope};
use crate::error::{EditorError, EditorResult};
use crate::exceptions::{Exception, ExceptionList};

const EXCEPTIONS_KEY: &str = "exceptions";

/// Which layer an edit or lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Base,
    Exception(usize),
}

/// Full header configuration as stored by the dashboard.
///
/// Serialized as the base layer's keys with an optional `exceptions` array
/// alongside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RootConfig {
    pub base: ConfigLayer,
    pub exceptions: ExceptionList,
}

impl RootConfig {
    pub fn new(base: ConfigLayer, exceptions: ExceptionList) -> Self {
        Self { base, exceptions }
    }

    /// Resolution scope for `target`.
    pub fn scope<'a>(&'a self, target: Target, defaults: &'a DefaultTable) -> EditorResult<Scope<'a>> {
        match target {
            Target::Base => Ok(Scope::root(&self.base, defaults)),
            Target::Exception(index) => {
                let exception = self.exceptions.get(index)?;
                Ok(Scope::exception(&exception.config, &self.base, defaults))
            }
        }
    }

    /// Copy with the base layer replaced.
    pub fn with_base(&self, base: ConfigLayer) -> Self {
        Self {
            base,
            exceptions: self.exceptions.clone(),
        }
    }

    /// Copy with the exception list replaced.
    pub fn with_exceptions(&self, exceptions: ExceptionList) -> Self {
        Self {
            base: self.base.clone(),
            exceptions,
        }
    }

    /// Copy with the layer at `target` replaced.
    pub fn with_layer(&self, target: Target, layer: ConfigLayer) -> EditorResult<Self> {
        match target {
            Target::Base => Ok(self.with_base(layer)),
            Target::Exception(index) => {
                let exception: Exception = self.exceptions.get(index)?.with_config(layer);
                Ok(self.with_exceptions(self.exceptions.replace(index, exception)?))
            }
        }
    }

    /// Copy ready to persist: the base is pruned against the defaults.
    /// Overlays are already minimal from edit-time normalization.
    pub fn pruned(&self, defaults: &DefaultTable) -> Self {
        self.with_base(prune(&self.base, defaults))
    }
}

impl TryFrom<Map<String, Value>> for RootConfig {
    type Error = EditorError;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let exceptions = match map.remove(EXCEPTIONS_KEY) {
            None | Some(Value::Null) => ExceptionList::new(),
            Some(raw) => serde_json::from_value::<Vec<Exception>>(raw)
                .map_err(|e| crate::store::StoreError::Parse(format!("exceptions: {}", e)))?
                .into(),
        };
        let base = ConfigLayer::try_from(map)?;
        Ok(Self { base, exceptions })
    }
}

impl From<RootConfig> for Map<String, Value> {
    fn from(config: RootConfig) -> Self {
        let mut map: Map<String, Value> = config.base.into();
        if !config.exceptions.is_empty() {
            let items: Vec<Exception> = config.exceptions.into();
            let items = items
                .into_iter()
                .map(|exception| Value::Object(exception.into()))
                .collect();
            map.insert(EXCEPTIONS_KEY.to_string(), Value::Array(items));
        }
        map
    }
}
