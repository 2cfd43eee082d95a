//! Setting values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single setting value as persisted.
///
/// Untagged so that stored configuration stays plain JSON
/// (`true`, `"clock"`, `15`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl SettingValue {
    /// The boolean, if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// The text, if this is a string value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for `Text("")`, the "clear to inherit" input.
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Equality that treats a number and its decimal rendering as the same
    /// value (`15` and `"15"`).
    ///
    /// Used when pruning persisted configuration, where either form may
    /// have been written.
    pub fn loosely_eq(&self, other: &SettingValue) -> bool {
        match (self, other) {
            (Self::Number(n), Self::Text(s)) | (Self::Text(s), Self::Number(n)) => {
                match (n.as_f64(), s.trim().parse::<f64>()) {
                    (Some(a), Ok(b)) => a == b,
                    _ => false,
                }
            }
            _ => self == other,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}
