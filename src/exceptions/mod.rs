//! Exceptions: conditional overlays on the base config.

mod conditions;
mod list;

pub use conditions::{ConditionKey, Conditions};
pub use list::{Exception, ExceptionHandle, ExceptionList, UNNAMED_EXCEPTION};
