//! Configuration layers
//!
//! Resolution order for any setting:
//! 1. The layer being looked at (base config or exception overlay)
//! 2. The base config, when looking at an overlay
//! 3. The default table

mod edit;
mod layer;
mod prune;
mod resolve;

pub use layer::ConfigLayer;
pub use prune::prune;
pub use resolve::{parse_id_list, Scope, TabVisibility};
