//! Setting keys and the kind of value each accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::value::SettingValue;
use crate::{BUTTON_CHOICES, CLOCK_FORMATS, OPTIONS_CHOICES, SWIPE_ANIMATIONS};

/// Every setting a configuration layer can carry.
///
/// The set is closed: persisted keys outside it are carried through
/// untouched by the layer code and never resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Disable,
    Header,
    Chevrons,
    Redirect,
    KioskMode,
    HideHelp,
    SidebarClosed,
    SidebarSwipe,
    Menu,
    Notifications,
    Voice,
    Options,
    ClockFormat,
    ClockAmPm,
    ClockDate,
    DateLocale,
    ShowTabs,
    HideTabs,
    DefaultTab,
    Swipe,
    SwipeWrap,
    SwipePreventDefault,
    SwipeAnimate,
    SwipeAmount,
    SwipeSkip,
}

/// Shape of the value a setting accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A boolean toggle.
    Flag,
    /// One string out of a fixed set.
    Choice(&'static [&'static str]),
    /// Free text.
    Text,
    /// Comma-separated list of view ids or indices, stored as text.
    IdList,
    /// A number carried as text ("15"); plain JSON numbers are also accepted.
    NumberText,
}

impl SettingKey {
    /// All keys in display order.
    pub const ALL: [SettingKey; 25] = [
        SettingKey::Disable,
        SettingKey::Header,
        SettingKey::Chevrons,
        SettingKey::Redirect,
        SettingKey::KioskMode,
        SettingKey::HideHelp,
        SettingKey::SidebarClosed,
        SettingKey::SidebarSwipe,
        SettingKey::Menu,
        SettingKey::Notifications,
        SettingKey::Voice,
        SettingKey::Options,
        SettingKey::ClockFormat,
        SettingKey::ClockAmPm,
        SettingKey::ClockDate,
        SettingKey::DateLocale,
        SettingKey::ShowTabs,
        SettingKey::HideTabs,
        SettingKey::DefaultTab,
        SettingKey::Swipe,
        SettingKey::SwipeWrap,
        SettingKey::SwipePreventDefault,
        SettingKey::SwipeAnimate,
        SettingKey::SwipeAmount,
        SettingKey::SwipeSkip,
    ];

    /// Persisted name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Header => "header",
            Self::Chevrons => "chevrons",
            Self::Redirect => "redirect",
            Self::KioskMode => "kiosk_mode",
            Self::HideHelp => "hide_help",
            Self::SidebarClosed => "sidebar_closed",
            Self::SidebarSwipe => "sidebar_swipe",
            Self::Menu => "menu",
            Self::Notifications => "notifications",
            Self::Voice => "voice",
            Self::Options => "options",
            Self::ClockFormat => "clock_format",
            Self::ClockAmPm => "clock_am_pm",
            Self::ClockDate => "clock_date",
            Self::DateLocale => "date_locale",
            Self::ShowTabs => "show_tabs",
            Self::HideTabs => "hide_tabs",
            Self::DefaultTab => "default_tab",
            Self::Swipe => "swipe",
            Self::SwipeWrap => "swipe_wrap",
            Self::SwipePreventDefault => "swipe_prevent_default",
            Self::SwipeAnimate => "swipe_animate",
            Self::SwipeAmount => "swipe_amount",
            Self::SwipeSkip => "swipe_skip",
        }
    }

    /// Kind of value this key accepts.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Disable
            | Self::Header
            | Self::Chevrons
            | Self::Redirect
            | Self::KioskMode
            | Self::HideHelp
            | Self::SidebarClosed
            | Self::SidebarSwipe
            | Self::ClockAmPm
            | Self::ClockDate
            | Self::Swipe
            | Self::SwipeWrap
            | Self::SwipePreventDefault => ValueKind::Flag,
            Self::Menu | Self::Notifications | Self::Voice => ValueKind::Choice(BUTTON_CHOICES),
            Self::Options => ValueKind::Choice(OPTIONS_CHOICES),
            Self::ClockFormat => ValueKind::Choice(CLOCK_FORMATS),
            Self::SwipeAnimate => ValueKind::Choice(SWIPE_ANIMATIONS),
            Self::DateLocale | Self::DefaultTab => ValueKind::Text,
            Self::ShowTabs | Self::HideTabs | Self::SwipeSkip => ValueKind::IdList,
            Self::SwipeAmount => ValueKind::NumberText,
        }
    }

    /// Parse user input for this key into a typed value.
    ///
    /// Empty input is always accepted as `Text("")`, which editors treat as
    /// "clear this key".
    pub fn parse_value(&self, raw: &str) -> Result<SettingValue, SchemaError> {
        if raw.is_empty() {
            return Ok(SettingValue::Text(String::new()));
        }

        match self.kind() {
            ValueKind::Flag => match raw {
                "true" => Ok(SettingValue::Flag(true)),
                "false" => Ok(SettingValue::Flag(false)),
                other => Err(SchemaError::invalid(
                    *self,
                    format!("expected true or false, got {:?}", other),
                )),
            },
            ValueKind::Choice(choices) => {
                if choices.contains(&raw) {
                    Ok(SettingValue::Text(raw.to_string()))
                } else {
                    Err(SchemaError::invalid(
                        *self,
                        format!("expected one of {}, got {:?}", choices.join("|"), raw),
                    ))
                }
            }
            ValueKind::Text | ValueKind::IdList => Ok(SettingValue::Text(raw.to_string())),
            ValueKind::NumberText => match raw.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(SettingValue::Text(raw.trim().to_string())),
                _ => Err(SchemaError::invalid(
                    *self,
                    format!("expected a number, got {:?}", raw),
                )),
            },
        }
    }

    /// Whether a stored value has the right shape for this key.
    ///
    /// Only the JSON shape is checked here; choice membership is enforced at
    /// input time by [`SettingKey::parse_value`].
    pub fn accepts(&self, value: &SettingValue) -> bool {
        match (self.kind(), value) {
            (ValueKind::Flag, SettingValue::Flag(_)) => true,
            (ValueKind::NumberText, SettingValue::Number(_) | SettingValue::Text(_)) => true,
            (ValueKind::Choice(_) | ValueKind::Text | ValueKind::IdList, SettingValue::Text(_)) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKey(s.to_string()))
    }
}
