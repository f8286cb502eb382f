//! Wire model of the `Microsoft.AlertsManagement/actionRules` REST resource.
//!
//! Field names follow the JSON body of API version `2019-05-05-preview`.
//! The `properties.type` discriminator is modelled as the tagged
//! [`ActionRuleKind`] enum so a body can only ever carry the payload that
//! matches its type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// API version spoken by the REST client.
pub const API_VERSION: &str = "2019-05-05-preview";

/// Action rules are global resources.
pub const ACTION_RULE_LOCATION: &str = "Global";

/// Top-level action rule resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// ARM resource type, `Microsoft.AlertsManagement/actionRules`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,

    pub properties: ActionRuleProperties,
}

/// Properties shared by every rule type plus the type-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRuleProperties {
    #[serde(flatten)]
    pub kind: ActionRuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionRuleStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

/// Discriminated payload of an action rule, tagged by `properties.type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionRuleKind {
    /// Routes matching alerts to an action group.
    ActionGroup {
        #[serde(
            rename = "actionGroupId",
            default,
            deserialize_with = "null_as_default"
        )]
        action_group_id: String,
    },
    /// Suppresses matching alerts according to a schedule.
    Suppression {
        #[serde(
            rename = "suppressionConfig",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        suppression_config: Option<SuppressionConfig>,
    },
    /// Enables diagnostics for matching alerts; no extra payload.
    Diagnostics,
}

impl ActionRuleKind {
    /// Discriminator value as sent on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionRuleKind::ActionGroup { .. } => "ActionGroup",
            ActionRuleKind::Suppression { .. } => "Suppression",
            ActionRuleKind::Diagnostics => "Diagnostics",
        }
    }
}

/// Whether the rule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionRuleStatus {
    Enabled,
    Disabled,
}

impl From<bool> for ActionRuleStatus {
    fn from(enabled: bool) -> Self {
        if enabled {
            ActionRuleStatus::Enabled
        } else {
            ActionRuleStatus::Disabled
        }
    }
}

/// Target resources of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub scope_type: ScopeType,

    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScopeType {
    ResourceGroup,
    Resource,
    Subscription,
}

impl ScopeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::ResourceGroup => "ResourceGroup",
            ScopeType::Resource => "Resource",
            ScopeType::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert filters; every present condition must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_service: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_condition: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_resource_type: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_rule_id: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_context: Option<Condition>,
}

/// A single `(operator, values)` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: Operator,

    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    DoesNotContain,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::NotEquals => "NotEquals",
            Operator::Contains => "Contains",
            Operator::DoesNotContain => "DoesNotContain",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suppression settings of a `Suppression` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionConfig {
    pub recurrence_type: RecurrenceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<SuppressionSchedule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecurrenceType {
    Always,
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Always => "Always",
            RecurrenceType::Once => "Once",
            RecurrenceType::Daily => "Daily",
            RecurrenceType::Weekly => "Weekly",
            RecurrenceType::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suppression window. Dates are `MM/DD/YYYY`, times `HH:MM:SS`, both UTC.
///
/// `recurrence_values` holds weekday indices (Sunday = 0) for weekly
/// recurrence and days of the month for monthly recurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressionSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub recurrence_values: Vec<i32>,
}

/// The API sends `null` for unset collections and ids; read it as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
