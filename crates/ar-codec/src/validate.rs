//! Construction-time validation of declared action rules.
//!
//! [`validate_action_rule`] checks everything that can be checked without
//! talking to the API and reports every problem at once.

use ar_core::{Error, Operator, ResourceId, Result};
use regex::Regex;
use std::sync::LazyLock;

use crate::schema::{ActionRuleBlock, ConditionBlock, ConditionClause, RuleKindBlock, ScopeBlock, SuppressionBlock};
use crate::suppression::{recurrence_from_block, recurrence_list_problems};
use crate::weekday::weekday_index;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z\d][a-zA-Z\d_-]*$").expect("action rule name pattern is valid")
});

const MAX_RESOURCE_GROUP_NAME_LEN: usize = 90;

const ALL_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Contains,
    Operator::DoesNotContain,
];

const EQUALITY_OPERATORS: &[Operator] = &[Operator::Equals, Operator::NotEquals];

const MONITOR_VALUES: &[&str] = &["Fired", "Resolved"];

const SEVERITY_VALUES: &[&str] = &["Sev0", "Sev1", "Sev2", "Sev3", "Sev4"];

pub const MONITOR_SERVICE_VALUES: &[&str] = &[
    "ActivityLog Administrative",
    "ActivityLog Autoscale",
    "ActivityLog Policy",
    "ActivityLog Recommendation",
    "ActivityLog Security",
    "Application Insights",
    "Azure Backup",
    "Data Box Edge",
    "Data Box Gateway",
    "Health Platform",
    "Log Analytics",
    "Platform",
    "Resource Health",
];

/// Validate a declared rule, collecting every problem into one error.
pub fn validate_action_rule(block: &ActionRuleBlock) -> Result<()> {
    let mut problems = Vec::new();

    validate_name(&block.name, &mut problems);
    validate_resource_group_name(&block.resource_group_name, &mut problems);

    check_max_one("scope", block.scope.len(), &mut problems);
    if let Some(scope) = block.scope.first() {
        validate_scope(scope, &mut problems);
    }

    check_max_one("condition", block.condition.len(), &mut problems);
    if let Some(condition) = block.condition.first() {
        validate_conditions(condition, &mut problems);
    }

    match &block.kind {
        RuleKindBlock::ActionGroup { action_group_id } => {
            if let Err(e) = ResourceId::parse(action_group_id) {
                problems.push(format!("`action_group_id` is not a valid resource ID: {e}"));
            }
        }
        RuleKindBlock::Suppression { suppression } => match suppression.as_slice() {
            [] => problems.push("`suppression` block is required".to_string()),
            [only] => validate_suppression(only, &mut problems),
            _ => check_max_one("suppression", suppression.len(), &mut problems),
        },
        RuleKindBlock::Diagnostics => {}
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Action Rule {:?}: {}",
            block.name,
            problems.join("; ")
        )))
    }
}

fn check_max_one(block_name: &str, len: usize, problems: &mut Vec<String>) {
    if len > 1 {
        problems.push(format!(
            "at most one `{block_name}` block is allowed, found {len}"
        ));
    }
}

fn validate_name(name: &str, problems: &mut Vec<String>) {
    if !NAME_PATTERN.is_match(name) {
        problems.push(
            "`name` should begin with a letter or digit and only contain letters, digits, underscores and hyphens"
                .to_string(),
        );
    }
}

fn validate_resource_group_name(name: &str, problems: &mut Vec<String>) {
    if name.is_empty() {
        problems.push("`resource_group_name` cannot be empty".to_string());
        return;
    }
    if name.chars().count() > MAX_RESOURCE_GROUP_NAME_LEN {
        problems.push(format!(
            "`resource_group_name` may not exceed {MAX_RESOURCE_GROUP_NAME_LEN} characters"
        ));
    }
    if name.ends_with('.') {
        problems.push("`resource_group_name` cannot end with a period".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '(' | ')'))
    {
        problems.push(
            "`resource_group_name` can only contain letters, digits, underscores, parentheses, hyphens and periods"
                .to_string(),
        );
    }
}

fn validate_scope(scope: &ScopeBlock, problems: &mut Vec<String>) {
    if scope.resource_ids.is_empty() {
        problems.push("`scope.resource_ids` must contain at least one resource ID".to_string());
    }
    for id in &scope.resource_ids {
        if let Err(e) = ResourceId::parse(id) {
            problems.push(format!("`scope.resource_ids` entry {id:?} is invalid: {e}"));
        }
    }
    if !matches!(
        scope.scope_type,
        ar_core::ScopeType::ResourceGroup | ar_core::ScopeType::Resource
    ) {
        problems.push(format!(
            "`scope.type` must be ResourceGroup or Resource, got {}",
            scope.scope_type
        ));
    }
}

fn validate_conditions(block: &ConditionBlock, problems: &mut Vec<String>) {
    let filters: [(&str, &[ConditionClause], &[Operator], Option<&[&str]>); 7] = [
        ("alert_context", block.alert_context.as_slice(), ALL_OPERATORS, None),
        ("alert_rule_id", block.alert_rule_id.as_slice(), ALL_OPERATORS, None),
        ("description", block.description.as_slice(), ALL_OPERATORS, None),
        ("monitor", block.monitor.as_slice(), EQUALITY_OPERATORS, Some(MONITOR_VALUES)),
        (
            "monitor_service",
            block.monitor_service.as_slice(),
            EQUALITY_OPERATORS,
            Some(MONITOR_SERVICE_VALUES),
        ),
        ("severity", block.severity.as_slice(), EQUALITY_OPERATORS, Some(SEVERITY_VALUES)),
        (
            "target_resource_type",
            block.target_resource_type.as_slice(),
            EQUALITY_OPERATORS,
            None,
        ),
    ];

    for (field, clauses, operators, allowed) in filters {
        check_max_one(&format!("condition.{field}"), clauses.len(), problems);
        let Some(clause) = clauses.first() else {
            continue;
        };

        if !operators.contains(&clause.operator) {
            let names: Vec<&str> = operators.iter().map(Operator::as_str).collect();
            problems.push(format!(
                "`condition.{field}.operator` must be one of {}, got {}",
                names.join(", "),
                clause.operator
            ));
        }

        if clause.values.is_empty() {
            problems.push(format!(
                "`condition.{field}.values` must contain at least one value"
            ));
        }

        if let Some(allowed) = allowed {
            for value in &clause.values {
                if !allowed.contains(&value.as_str()) {
                    problems.push(format!(
                        "`condition.{field}.values` contains unsupported value {value:?}"
                    ));
                }
            }
        }
    }
}

fn validate_suppression(block: &SuppressionBlock, problems: &mut Vec<String>) {
    check_max_one("suppression.schedule", block.schedule.len(), problems);

    if let Some(schedule) = block.schedule.first() {
        problems.extend(recurrence_list_problems(block.recurrence_type, schedule));
        for name in &schedule.recurrence_weekly {
            if weekday_index(name).is_none() {
                problems.push(format!(
                    "`recurrence_weekly` value {name:?} is not a weekday name"
                ));
            }
        }
    }

    // Schedule presence, timestamps and day ranges are checked by the same
    // conversion the expand path uses.
    if let Err(Error::Validation(message)) = recurrence_from_block(block) {
        if !problems.contains(&message) {
            problems.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScheduleBlock;
    use ar_core::{RecurrenceType, ScopeType};
    use std::collections::{BTreeMap, BTreeSet};

    fn clause(operator: Operator, values: &[&str]) -> Vec<ConditionClause> {
        vec![ConditionClause {
            operator,
            values: values.iter().map(|v| v.to_string()).collect(),
        }]
    }

    fn valid_block() -> ActionRuleBlock {
        ActionRuleBlock {
            name: "nightly-maintenance_1".into(),
            resource_group_name: "monitoring(prod).eu".into(),
            description: String::new(),
            enabled: true,
            scope: vec![ScopeBlock {
                scope_type: ScopeType::ResourceGroup,
                resource_ids: BTreeSet::from(["/subscriptions/sub/resourceGroups/app".to_string()]),
            }],
            condition: vec![ConditionBlock {
                alert_context: clause(Operator::Contains, &["disk"]),
                monitor: clause(Operator::Equals, &["Fired"]),
                monitor_service: clause(Operator::NotEquals, &["Platform", "Azure Backup"]),
                severity: clause(Operator::Equals, &["Sev0", "Sev4"]),
                ..Default::default()
            }],
            tags: BTreeMap::new(),
            kind: RuleKindBlock::Suppression {
                suppression: vec![SuppressionBlock {
                    recurrence_type: RecurrenceType::Weekly,
                    schedule: vec![ScheduleBlock {
                        start_date_utc: "2019-01-01T01:02:03Z".into(),
                        end_date_utc: "2019-01-03T15:02:07Z".into(),
                        recurrence_weekly: vec!["Monday".into()],
                        recurrence_monthly: BTreeSet::new(),
                    }],
                }],
            },
        }
    }

    fn problems_of(block: &ActionRuleBlock) -> String {
        match validate_action_rule(block) {
            Err(Error::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_rule_passes() {
        validate_action_rule(&valid_block()).unwrap();
    }

    #[test]
    fn rejects_bad_name() {
        for name in ["", "-leading", "has space", "semi;colon"] {
            let mut block = valid_block();
            block.name = name.into();
            assert!(problems_of(&block).contains("`name`"), "{name:?}");
        }
    }

    #[test]
    fn rejects_bad_resource_group_name() {
        let mut block = valid_block();
        block.resource_group_name = "ends.".into();
        assert!(problems_of(&block).contains("period"));

        block.resource_group_name = "x".repeat(91);
        assert!(problems_of(&block).contains("90"));
    }

    #[test]
    fn rejects_invalid_scope_ids() {
        let mut block = valid_block();
        block.scope[0].resource_ids = BTreeSet::from(["not-an-id".to_string()]);
        assert!(problems_of(&block).contains("not-an-id"));

        block.scope[0].resource_ids.clear();
        assert!(problems_of(&block).contains("at least one resource ID"));
    }

    #[test]
    fn rejects_subscription_scope() {
        let mut block = valid_block();
        block.scope[0].scope_type = ScopeType::Subscription;
        assert!(problems_of(&block).contains("`scope.type`"));
    }

    #[test]
    fn rejects_contains_on_equality_only_filter() {
        let mut block = valid_block();
        block.condition[0].severity = clause(Operator::Contains, &["Sev0"]);
        assert!(problems_of(&block).contains("`condition.severity.operator`"));
    }

    #[test]
    fn rejects_unknown_condition_values() {
        let mut block = valid_block();
        block.condition[0].severity = clause(Operator::Equals, &["Sev9"]);
        block.condition[0].monitor = clause(Operator::Equals, &["Burning"]);
        let message = problems_of(&block);
        assert!(message.contains("Sev9"));
        assert!(message.contains("Burning"));
    }

    #[test]
    fn rejects_empty_condition_values() {
        let mut block = valid_block();
        block.condition[0].alert_rule_id = clause(Operator::Equals, &[]);
        assert!(problems_of(&block).contains("`condition.alert_rule_id.values`"));
    }

    #[test]
    fn rejects_more_than_one_block() {
        let mut block = valid_block();
        let scope = block.scope[0].clone();
        block.scope.push(scope);
        assert!(problems_of(&block).contains("at most one `scope` block"));
    }

    #[test]
    fn rejects_weekly_and_monthly_together() {
        let mut block = valid_block();
        if let RuleKindBlock::Suppression { suppression } = &mut block.kind {
            suppression[0].schedule[0].recurrence_monthly = BTreeSet::from([1]);
        }
        assert!(problems_of(&block).contains("cannot both be set"));
    }

    #[test]
    fn rejects_missing_schedule() {
        let mut block = valid_block();
        if let RuleKindBlock::Suppression { suppression } = &mut block.kind {
            suppression[0].schedule.clear();
        }
        assert!(problems_of(&block).contains("`schedule` block must be set"));
    }

    #[test]
    fn rejects_missing_suppression_block() {
        let mut block = valid_block();
        block.kind = RuleKindBlock::Suppression {
            suppression: Vec::new(),
        };
        assert!(problems_of(&block).contains("`suppression` block is required"));
    }

    #[test]
    fn rejects_bad_action_group_id() {
        let mut block = valid_block();
        block.kind = RuleKindBlock::ActionGroup {
            action_group_id: "ag".into(),
        };
        assert!(problems_of(&block).contains("`action_group_id`"));
    }

    #[test]
    fn reports_all_problems_at_once() {
        let mut block = valid_block();
        block.name = "-bad".into();
        block.resource_group_name = String::new();
        let message = problems_of(&block);
        assert!(message.contains("`name`"));
        assert!(message.contains("`resource_group_name`"));
    }

    #[test]
    fn always_recurrence_needs_no_schedule() {
        let mut block = valid_block();
        block.kind = RuleKindBlock::Suppression {
            suppression: vec![SuppressionBlock {
                recurrence_type: RecurrenceType::Always,
                schedule: Vec::new(),
            }],
        };
        validate_action_rule(&block).unwrap();
    }
}
