//! Whole-rule expand/flatten.

use ar_core::{
    ActionRule, ActionRuleId, ActionRuleKind, ActionRuleProperties, ActionRuleStatus, Error,
    Result, ACTION_RULE_LOCATION,
};

use crate::condition::{expand_conditions, flatten_conditions};
use crate::schema::{ActionRuleBlock, RuleKindBlock};
use crate::scope::{expand_scope, flatten_scope};
use crate::suppression::{expand_suppression, flatten_suppression};

/// Build the request body for a create-or-update call.
pub fn expand_action_rule(block: &ActionRuleBlock) -> Result<ActionRule> {
    let kind = match &block.kind {
        RuleKindBlock::ActionGroup { action_group_id } => ActionRuleKind::ActionGroup {
            action_group_id: action_group_id.clone(),
        },
        RuleKindBlock::Suppression { suppression } => {
            let suppression = suppression.first().ok_or_else(|| {
                Error::Validation(format!(
                    "Action Rule {:?}: `suppression` block is required when `type` is suppression",
                    block.name
                ))
            })?;
            ActionRuleKind::Suppression {
                suppression_config: Some(expand_suppression(suppression)?),
            }
        }
        RuleKindBlock::Diagnostics => ActionRuleKind::Diagnostics,
    };

    Ok(ActionRule {
        id: None,
        name: None,
        resource_type: None,
        location: ACTION_RULE_LOCATION.to_string(),
        tags: Some(block.tags.clone()),
        properties: ActionRuleProperties {
            kind,
            scope: expand_scope(&block.scope),
            conditions: expand_conditions(&block.condition),
            description: Some(block.description.clone()),
            status: Some(ActionRuleStatus::from(block.enabled)),
            created_at: None,
            last_modified_at: None,
            created_by: None,
            last_modified_by: None,
        },
    })
}

/// Flatten an API response into declared-block state.
///
/// The resource group always comes from `id`; the name falls back to it when
/// the body carries none.
pub fn flatten_action_rule(rule: &ActionRule, id: &ActionRuleId) -> ActionRuleBlock {
    let props = &rule.properties;

    let kind = match &props.kind {
        ActionRuleKind::ActionGroup { action_group_id } => RuleKindBlock::ActionGroup {
            action_group_id: action_group_id.clone(),
        },
        ActionRuleKind::Suppression { suppression_config } => RuleKindBlock::Suppression {
            suppression: flatten_suppression(suppression_config.as_ref()),
        },
        ActionRuleKind::Diagnostics => RuleKindBlock::Diagnostics,
    };

    ActionRuleBlock {
        name: rule.name.clone().unwrap_or_else(|| id.name.clone()),
        resource_group_name: id.resource_group.clone(),
        description: props.description.clone().unwrap_or_default(),
        enabled: props.status == Some(ActionRuleStatus::Enabled),
        scope: flatten_scope(props.scope.as_ref()),
        condition: flatten_conditions(props.conditions.as_ref()),
        tags: rule.tags.clone().unwrap_or_default(),
        kind,
    }
}

/// The state a declared rule will have once the API has stored it.
///
/// Runs the declaration through expand and flatten, so schedule timestamps
/// come back in UTC and a schedule on an `Always` suppression is dropped.
pub fn normalize_action_rule(block: &ActionRuleBlock) -> Result<ActionRuleBlock> {
    let id = ActionRuleId::new("", &block.resource_group_name, &block.name);
    Ok(flatten_action_rule(&expand_action_rule(block)?, &id))
}
