//! Condition block expand/flatten.
//!
//! Each of the seven filters maps independently; the declared `monitor`
//! filter is `monitorCondition` on the wire.

use ar_core::{Condition, Conditions};

use crate::schema::{ConditionBlock, ConditionClause};

pub fn expand_conditions(blocks: &[ConditionBlock]) -> Option<Conditions> {
    let block = blocks.first()?;
    Some(Conditions {
        alert_context: expand_condition(&block.alert_context),
        alert_rule_id: expand_condition(&block.alert_rule_id),
        description: expand_condition(&block.description),
        monitor_condition: expand_condition(&block.monitor),
        monitor_service: expand_condition(&block.monitor_service),
        severity: expand_condition(&block.severity),
        target_resource_type: expand_condition(&block.target_resource_type),
    })
}

fn expand_condition(clauses: &[ConditionClause]) -> Option<Condition> {
    clauses.first().map(|clause| Condition {
        operator: clause.operator,
        values: clause.values.iter().cloned().collect(),
    })
}

/// Flatten the remote conditions; `None` yields an empty list.
pub fn flatten_conditions(conditions: Option<&Conditions>) -> Vec<ConditionBlock> {
    let Some(conditions) = conditions else {
        return Vec::new();
    };

    vec![ConditionBlock {
        alert_context: flatten_condition(conditions.alert_context.as_ref()),
        alert_rule_id: flatten_condition(conditions.alert_rule_id.as_ref()),
        description: flatten_condition(conditions.description.as_ref()),
        monitor: flatten_condition(conditions.monitor_condition.as_ref()),
        monitor_service: flatten_condition(conditions.monitor_service.as_ref()),
        severity: flatten_condition(conditions.severity.as_ref()),
        target_resource_type: flatten_condition(conditions.target_resource_type.as_ref()),
    }]
}

fn flatten_condition(condition: Option<&Condition>) -> Vec<ConditionClause> {
    condition
        .map(|c| ConditionClause {
            operator: c.operator,
            values: c.values.iter().cloned().collect(),
        })
        .into_iter()
        .collect()
}
