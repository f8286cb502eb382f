//! ar-core: shared types for managing Azure Monitor action rules.
//!
//! This crate is the foundational dependency for the codec and the CLI,
//! providing the unified error type, the parsed action rule identifier and
//! the serde model of the AlertsManagement REST body.

pub mod error;
pub mod ids;
pub mod model;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::{ActionRuleId, ResourceId, ACTION_RULES_SEGMENT, PROVIDER_NAMESPACE};
pub use model::*;
