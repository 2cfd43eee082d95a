//! Pre-save pruning of the base layer.

use cch_schema::DefaultTable;
use tracing::debug;

use super::layer::ConfigLayer;

/// Drop every stored key whose value equals its default.
///
/// Comparison is loose (`15` matches `"15"`). Keys the table has no entry
/// for are kept, as are pass-through keys.
pub fn prune(layer: &ConfigLayer, defaults: &DefaultTable) -> ConfigLayer {
    layer.retain(|key, value| match defaults.get(key) {
        Ok(default) if value.loosely_eq(default) => {
            debug!(key = %key, "pruning value equal to default");
            false
        }
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scope;
    use cch_schema::{SettingKey, SettingValue};
    use serde_json::json;

    #[test]
    fn test_prune_removes_defaults() {
        let defaults = DefaultTable::builtin();
        let layer = ConfigLayer::new()
            .with(SettingKey::Header, SettingValue::Flag(true))
            .with(SettingKey::Menu, "clock".into())
            .with(SettingKey::SwipeAmount, SettingValue::Number(15.into()));

        let pruned = prune(&layer, &defaults);

        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.get(SettingKey::Menu), Some(&SettingValue::from("clock")));
        // input untouched
        assert_eq!(layer.len(), 3);
    }

    #[test]
    fn test_prune_keeps_keys_without_default() {
        let defaults = DefaultTable::from_entries([(SettingKey::Header, SettingValue::Flag(true))]);
        let layer = ConfigLayer::new()
            .with(SettingKey::Header, SettingValue::Flag(true))
            .with(SettingKey::Swipe, SettingValue::Flag(false));

        let pruned = prune(&layer, &defaults);

        assert!(!pruned.contains(SettingKey::Header));
        assert!(pruned.contains(SettingKey::Swipe));
    }

    #[test]
    fn test_prune_keeps_passthrough() {
        let layer: ConfigLayer =
            serde_json::from_value(json!({"header": true, "background": "red"})).unwrap();

        let pruned = prune(&layer, &DefaultTable::builtin());

        assert_eq!(serde_json::to_value(&pruned).unwrap(), json!({"background": "red"}));
    }

    #[test]
    fn test_prune_preserves_effective_values() {
        let defaults = DefaultTable::builtin();
        let layer = ConfigLayer::new()
            .with(SettingKey::KioskMode, SettingValue::Flag(true))
            .with(SettingKey::Header, SettingValue::Flag(true))
            .with(SettingKey::Voice, "show".into())
            .with(SettingKey::HideTabs, "1,2".into());

        let pruned = prune(&layer, &defaults);
        let before = Scope::root(&layer, &defaults).snapshot().unwrap();
        let after = Scope::root(&pruned, &defaults).snapshot().unwrap();

        assert_eq!(before, after);
        assert_eq!(pruned.len(), 2);
    }
}
