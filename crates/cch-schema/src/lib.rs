//! Setting schema for the compact custom header configuration.
//!
//! Defines the closed set of setting keys, the kind of value each one
//! accepts, and the table of default values every lookup falls back to.

mod defaults;
mod error;
mod key;
mod value;

pub use defaults::DefaultTable;
pub use error::SchemaError;
pub use key::{SettingKey, ValueKind};
pub use value::SettingValue;

/// Choices accepted by the header buttons (menu, notifications, voice).
pub const BUTTON_CHOICES: &[&str] = &["show", "hide", "clock", "overflow"];

/// Choices accepted by the options button, which cannot overflow into itself.
pub const OPTIONS_CHOICES: &[&str] = &["show", "hide", "clock"];

/// Clock formats.
pub const CLOCK_FORMATS: &[&str] = &["12", "24"];

/// Tab change animations.
pub const SWIPE_ANIMATIONS: &[&str] = &["none", "swipe", "fade", "flip"];
