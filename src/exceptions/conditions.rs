//! Exception conditions.
//!
//! Matching is done by the header at render time; here conditions are
//! opaque strings that are only stored and edited.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Which condition an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKey {
    User,
    UserAgent,
    MediaQuery,
}

impl ConditionKey {
    pub const ALL: [ConditionKey; 3] = [Self::User, Self::UserAgent, Self::MediaQuery];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::UserAgent => "user_agent",
            Self::MediaQuery => "media_query",
        }
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionKey {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| EditorError::UnknownKey(s.to_string()))
    }
}

/// Conditions under which an exception applies. Unset means "any".
///
/// Condition names this crate does not know are kept in `extra` and
/// written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Map<String, Value>")]
pub struct Conditions {
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub media_query: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Conditions> for Map<String, Value> {
    fn from(conditions: Conditions) -> Self {
        let mut map = conditions.extra;
        for (key, value) in [
            (ConditionKey::User, conditions.user),
            (ConditionKey::UserAgent, conditions.user_agent),
            (ConditionKey::MediaQuery, conditions.media_query),
        ] {
            if let Some(value) = value {
                map.insert(key.as_str().to_string(), Value::String(value));
            }
        }
        map
    }
}

impl Conditions {
    pub fn get(&self, key: ConditionKey) -> Option<&str> {
        match key {
            ConditionKey::User => self.user.as_deref(),
            ConditionKey::UserAgent => self.user_agent.as_deref(),
            ConditionKey::MediaQuery => self.media_query.as_deref(),
        }
    }

    /// Copy with `key` set to `value`; empty input removes the condition.
    pub fn with_condition(&self, key: ConditionKey, value: &str) -> Self {
        let mut next = self.clone();
        let slot = match key {
            ConditionKey::User => &mut next.user,
            ConditionKey::UserAgent => &mut next.user_agent,
            ConditionKey::MediaQuery => &mut next.media_query,
        };
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        next
    }

    /// Set condition values in display order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        ConditionKey::ALL.into_iter().filter_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }
}
