//! Effective-value lookup.
//!
//! Resolution walks layer -> parent layer -> defaults. The base config has
//! no parent; an exception overlay has the base config as its parent.
//! A handful of keys then apply a rule on top of the plain chain
//! (kiosk mode forcing the header and sidebar), picked from a fixed
//! dispatch table.

use cch_schema::{DefaultTable, SettingKey, SettingValue};

use super::layer::ConfigLayer;
use crate::error::EditorResult;

/// Which tabs the header restricts, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabVisibility {
    /// Only these tabs are shown.
    Show(Vec<String>),
    /// These tabs are hidden.
    Hide(Vec<String>),
    /// No restriction.
    All,
}

/// A layer together with everything it falls back to.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    layer: &'a ConfigLayer,
    parent: Option<&'a ConfigLayer>,
    defaults: &'a DefaultTable,
}

type Rule = fn(&Scope<'_>, SettingKey) -> EditorResult<SettingValue>;

/// Dispatch table from key to the rule computing its effective value.
fn rule_for(key: SettingKey) -> Rule {
    match key {
        SettingKey::Header | SettingKey::SidebarSwipe => suppressed_by_kiosk,
        SettingKey::SidebarClosed => forced_by_kiosk,
        _ => plain,
    }
}

fn plain(scope: &Scope<'_>, key: SettingKey) -> EditorResult<SettingValue> {
    scope.stored(key).cloned()
}

fn suppressed_by_kiosk(scope: &Scope<'_>, key: SettingKey) -> EditorResult<SettingValue> {
    if scope.kiosk()? {
        return Ok(SettingValue::Flag(false));
    }
    plain(scope, key)
}

fn forced_by_kiosk(scope: &Scope<'_>, key: SettingKey) -> EditorResult<SettingValue> {
    if scope.kiosk()? {
        return Ok(SettingValue::Flag(true));
    }
    plain(scope, key)
}

impl<'a> Scope<'a> {
    /// Scope of the base config: base -> defaults.
    pub fn root(base: &'a ConfigLayer, defaults: &'a DefaultTable) -> Self {
        Self {
            layer: base,
            parent: None,
            defaults,
        }
    }

    /// Scope of an exception overlay: overlay -> base -> defaults.
    pub fn exception(
        overlay: &'a ConfigLayer,
        base: &'a ConfigLayer,
        defaults: &'a DefaultTable,
    ) -> Self {
        Self {
            layer: overlay,
            parent: Some(base),
            defaults,
        }
    }

    /// The layer edits in this scope apply to.
    pub fn layer(&self) -> &'a ConfigLayer {
        self.layer
    }

    pub fn defaults(&self) -> &'a DefaultTable {
        self.defaults
    }

    /// Plain three-step lookup, no special rules.
    pub fn stored(&self, key: SettingKey) -> EditorResult<&'a SettingValue> {
        if let Some(value) = self.layer.get(key) {
            return Ok(value);
        }
        if let Some(value) = self.parent.and_then(|p| p.get(key)) {
            return Ok(value);
        }
        Ok(self.defaults.get(key)?)
    }

    /// What `key` would resolve to if this layer did not set it.
    ///
    /// `None` only when the default table has no entry for the key.
    pub fn inherited(&self, key: SettingKey) -> Option<&'a SettingValue> {
        self.parent
            .and_then(|p| p.get(key))
            .or_else(|| self.defaults.get(key).ok())
    }

    /// Effective value of `key`.
    pub fn resolve(&self, key: SettingKey) -> EditorResult<SettingValue> {
        rule_for(key)(self, key)
    }

    /// Effective value of the setting called `name`.
    pub fn resolve_named(&self, name: &str) -> EditorResult<SettingValue> {
        let key: SettingKey = name.parse()?;
        self.resolve(key)
    }

    /// Whether the clock is shown in place of any button.
    pub fn clock(&self) -> EditorResult<bool> {
        for key in [
            SettingKey::Menu,
            SettingKey::Voice,
            SettingKey::Notifications,
            SettingKey::Options,
        ] {
            if self.resolve(key)?.as_text() == Some("clock") {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The authoritative tab restriction. `show_tabs` wins when both lists
    /// are set.
    pub fn tab_visibility(&self) -> EditorResult<TabVisibility> {
        let show = self.id_list(SettingKey::ShowTabs)?;
        if !show.is_empty() {
            return Ok(TabVisibility::Show(show));
        }
        let hide = self.id_list(SettingKey::HideTabs)?;
        if !hide.is_empty() {
            return Ok(TabVisibility::Hide(hide));
        }
        Ok(TabVisibility::All)
    }

    /// Effective value of every key the default table knows.
    pub fn snapshot(&self) -> EditorResult<Vec<(SettingKey, SettingValue)>> {
        SettingKey::ALL
            .iter()
            .filter(|key| self.defaults.contains(**key))
            .map(|key| self.resolve(*key).map(|value| (*key, value)))
            .collect()
    }

    /// Apply one field edit to this scope's layer. See
    /// [`ConfigLayer::with_field`].
    pub fn set_field(&self, key: SettingKey, value: SettingValue) -> ConfigLayer {
        self.layer.with_field(self.inherited(key), key, value)
    }

    fn kiosk(&self) -> EditorResult<bool> {
        Ok(self.stored(SettingKey::KioskMode)?.as_flag() == Some(true))
    }

    fn id_list(&self, key: SettingKey) -> EditorResult<Vec<String>> {
        Ok(self
            .stored(key)?
            .as_text()
            .map(parse_id_list)
            .unwrap_or_default())
    }
}

/// Split a comma-separated id list, dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
