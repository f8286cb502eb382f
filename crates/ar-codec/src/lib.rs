//! # ar-codec
//!
//! Translation between declared action rule blocks and the AlertsManagement
//! REST model.
//!
//! ## Overview
//!
//! - [`schema`] -- the declared configuration/state blocks.
//! - [`validate`] -- construction-time validation of a declared rule.
//! - [`weekday`] -- the fixed weekday name/index table.
//! - [`schedule`] -- RFC3339 split/join and the typed [`Recurrence`].
//! - [`scope`], [`condition`], [`suppression`] -- expand/flatten per block.
//! - [`rule`] -- expand/flatten of a whole rule.
//!
//! Every function here is pure: no I/O, no shared state.

pub mod condition;
pub mod rule;
pub mod schedule;
pub mod schema;
pub mod scope;
pub mod suppression;
pub mod validate;
pub mod weekday;

pub use condition::{expand_conditions, flatten_conditions};
pub use rule::{expand_action_rule, flatten_action_rule, normalize_action_rule};
pub use schedule::{join_timestamp, split_timestamp, Recurrence, Window};
pub use schema::{
    ActionRuleBlock, ConditionBlock, ConditionClause, RuleKindBlock, ScheduleBlock, ScopeBlock,
    SuppressionBlock,
};
pub use scope::{expand_scope, flatten_scope};
pub use suppression::{expand_suppression, flatten_suppression};
pub use validate::validate_action_rule;
