//! Single-field edits with inheritance normalization.

use cch_schema::{SettingKey, SettingValue};
use tracing::debug;

use super::layer::ConfigLayer;

impl ConfigLayer {
    /// Apply one field edit and return the resulting layer.
    ///
    /// `inherited` is what `key` resolves to one step up the chain. The key
    /// is removed instead of stored when the new value is empty text or
    /// equals `inherited`, so a layer never holds a value it would inherit
    /// anyway. Equality is loose (`20` matches `"20"`). With nothing
    /// inherited the value is stored as given.
    pub fn with_field(
        &self,
        inherited: Option<&SettingValue>,
        key: SettingKey,
        value: SettingValue,
    ) -> ConfigLayer {
        if value.is_empty_text() {
            debug!(key = %key, "clearing field");
            return self.without(key);
        }

        if inherited.is_some_and(|i| i.loosely_eq(&value)) {
            debug!(key = %key, value = %value, "value matches inherited, clearing field");
            return self.without(key);
        }

        debug!(key = %key, value = %value, "setting field");
        self.with(key, value)
    }
}
