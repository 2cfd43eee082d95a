//! The ordered list of exceptions and its structural edits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::conditions::Conditions;
use crate::config::ConfigLayer;
use crate::error::{EditorError, EditorResult};

/// Header shown for an exception with no conditions yet.
pub const UNNAMED_EXCEPTION: &str = "New Exception";

/// A conditional overlay on top of the base config.
///
/// Members other than `conditions` and `config` are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Map<String, Value>")]
pub struct Exception {
    #[serde(default)]
    pub conditions: Conditions,

    #[serde(default)]
    pub config: ConfigLayer,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Exception> for Map<String, Value> {
    fn from(exception: Exception) -> Self {
        let mut map = exception.extra;
        map.insert(
            "conditions".to_string(),
            Value::Object(exception.conditions.into()),
        );
        map.insert("config".to_string(), Value::Object(exception.config.into()));
        map
    }
}

impl Exception {
    pub fn new(conditions: Conditions, config: ConfigLayer) -> Self {
        Self {
            conditions,
            config,
            extra: Map::new(),
        }
    }

    /// Copy with the conditions replaced.
    pub fn with_conditions(&self, conditions: Conditions) -> Self {
        Self {
            conditions,
            ..self.clone()
        }
    }

    /// Copy with the overlay replaced.
    pub fn with_config(&self, config: ConfigLayer) -> Self {
        Self {
            config,
            ..self.clone()
        }
    }

    /// Display name: the set condition values, comma separated.
    pub fn label(&self) -> String {
        if self.conditions.is_empty() {
            return UNNAMED_EXCEPTION.to_string();
        }
        self.conditions.values().collect::<Vec<_>>().join(", ")
    }
}

/// A position in a specific revision of an [`ExceptionList`].
///
/// Deleting an entry bumps the list revision, so handles taken before a
/// delete stop resolving instead of silently pointing at a shifted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionHandle {
    index: usize,
    revision: u64,
}

impl ExceptionHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered exceptions. Every edit returns a new list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Exception>", into = "Vec<Exception>")]
pub struct ExceptionList {
    items: Vec<Exception>,
    revision: u64,
}

impl PartialEq for ExceptionList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl From<Vec<Exception>> for ExceptionList {
    fn from(items: Vec<Exception>) -> Self {
        Self { items, revision: 0 }
    }
}

impl From<ExceptionList> for Vec<Exception> {
    fn from(list: ExceptionList) -> Self {
        list.items
    }
}

impl ExceptionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> EditorResult<&Exception> {
        self.items.get(index).ok_or(EditorError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exception> {
        self.items.iter()
    }

    /// Append an exception with no conditions and an empty overlay.
    pub fn add(&self) -> Self {
        let mut next = self.clone();
        next.items.push(Exception::default());
        debug!(len = next.items.len(), "exception added");
        next
    }

    /// Copy with position `index` holding `exception`.
    pub fn replace(&self, index: usize, exception: Exception) -> EditorResult<Self> {
        self.check(index)?;
        let mut next = self.clone();
        next.items[index] = exception;
        debug!(index, "exception replaced");
        Ok(next)
    }

    /// Copy without position `index`; later entries shift down by one and
    /// all outstanding handles are invalidated.
    pub fn delete(&self, index: usize) -> EditorResult<Self> {
        self.check(index)?;
        let mut next = self.clone();
        next.items.remove(index);
        next.revision += 1;
        debug!(index, len = next.items.len(), "exception deleted");
        Ok(next)
    }

    /// Handle to position `index` in this revision of the list.
    pub fn handle(&self, index: usize) -> EditorResult<ExceptionHandle> {
        self.check(index)?;
        Ok(ExceptionHandle {
            index,
            revision: self.revision,
        })
    }

    pub fn get_at(&self, handle: ExceptionHandle) -> EditorResult<&Exception> {
        self.get(self.resolve_handle(handle)?)
    }

    pub fn replace_at(&self, handle: ExceptionHandle, exception: Exception) -> EditorResult<Self> {
        self.replace(self.resolve_handle(handle)?, exception)
    }

    pub fn delete_at(&self, handle: ExceptionHandle) -> EditorResult<Self> {
        self.delete(self.resolve_handle(handle)?)
    }

    fn resolve_handle(&self, handle: ExceptionHandle) -> EditorResult<usize> {
        if handle.revision != self.revision {
            return Err(EditorError::IndexOutOfRange {
                index: handle.index,
                len: self.items.len(),
            });
        }
        Ok(handle.index)
    }

    fn check(&self, index: usize) -> EditorResult<()> {
        if index >= self.items.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}
