//! Declared action rule blocks.
//!
//! These types are both the configuration a user writes and the state the
//! codec flattens API responses into. Nested blocks are lists holding at most
//! one element: an absent block is an empty list, never a null, so two
//! flattened states compare deterministically.

use ar_core::{Operator, RecurrenceType, ScopeType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A declared action rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRuleBlock {
    pub name: String,

    pub resource_group_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub scope: Vec<ScopeBlock>,

    #[serde(default)]
    pub condition: Vec<ConditionBlock>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(flatten)]
    pub kind: RuleKindBlock,
}

fn default_enabled() -> bool {
    true
}

impl ActionRuleBlock {
    /// Key used to track the rule locally: `resource_group/name`.
    pub fn state_key(&self) -> String {
        format!("{}/{}", self.resource_group_name, self.name)
    }
}

/// Rule type plus its type-specific payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKindBlock {
    ActionGroup {
        action_group_id: String,
    },
    Suppression {
        #[serde(default)]
        suppression: Vec<SuppressionBlock>,
    },
    Diagnostics,
}

impl RuleKindBlock {
    /// The `properties.type` discriminator this kind expands to.
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleKindBlock::ActionGroup { .. } => "ActionGroup",
            RuleKindBlock::Suppression { .. } => "Suppression",
            RuleKindBlock::Diagnostics => "Diagnostics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeBlock {
    #[serde(rename = "type")]
    pub scope_type: ScopeType,

    #[serde(default)]
    pub resource_ids: BTreeSet<String>,
}

/// The seven optional alert filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionBlock {
    #[serde(default)]
    pub alert_context: Vec<ConditionClause>,

    #[serde(default)]
    pub alert_rule_id: Vec<ConditionClause>,

    #[serde(default)]
    pub description: Vec<ConditionClause>,

    #[serde(default)]
    pub monitor: Vec<ConditionClause>,

    #[serde(default)]
    pub monitor_service: Vec<ConditionClause>,

    #[serde(default)]
    pub severity: Vec<ConditionClause>,

    #[serde(default)]
    pub target_resource_type: Vec<ConditionClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionClause {
    pub operator: Operator,

    #[serde(default)]
    pub values: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionBlock {
    pub recurrence_type: RecurrenceType,

    #[serde(default)]
    pub schedule: Vec<ScheduleBlock>,
}

/// Suppression window. Timestamps are RFC3339.
///
/// Weekdays are kept in calendar order (Sunday first) rather than sorted by
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub start_date_utc: String,

    pub end_date_utc: String,

    #[serde(default)]
    pub recurrence_weekly: Vec<String>,

    #[serde(default)]
    pub recurrence_monthly: BTreeSet<i32>,
}
