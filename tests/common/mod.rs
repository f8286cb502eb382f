//! Shared helpers for integration tests.
//!
//! [`provider_for`] points a client at a wiremock server; [`suppression_rule`]
//! and [`rule_body`] give a declared rule and the body the API would return
//! for it.

#![allow(dead_code)]

use actionrule::azure::AzureClient;
use actionrule::config::ProviderConfig;
use actionrule::resource::ActionRuleResource;
use ar_codec::{ActionRuleBlock, RuleKindBlock, ScheduleBlock, ScopeBlock, SuppressionBlock};
use ar_core::{RecurrenceType, ScopeType};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use wiremock::MockServer;

pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";
pub const TOKEN: &str = "test-token";
pub const RESOURCE_GROUP: &str = "monitoring";

pub fn rule_path(name: &str) -> String {
    format!(
        "/subscriptions/{SUBSCRIPTION}/resourceGroups/{RESOURCE_GROUP}/providers/Microsoft.AlertsManagement/actionRules/{name}"
    )
}

pub fn provider_for(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        endpoint: server.uri(),
        subscription_id: SUBSCRIPTION.to_string(),
        access_token: Some(TOKEN.to_string()),
        request_timeout_secs: 5,
        ..Default::default()
    }
}

pub fn resource_for(server: &MockServer) -> ActionRuleResource {
    let client = AzureClient::new(&provider_for(server)).unwrap();
    ActionRuleResource::new(Arc::new(client))
}

pub fn suppression_rule(name: &str) -> ActionRuleBlock {
    ActionRuleBlock {
        name: name.to_string(),
        resource_group_name: RESOURCE_GROUP.to_string(),
        description: "patch window".into(),
        enabled: true,
        scope: vec![ScopeBlock {
            scope_type: ScopeType::ResourceGroup,
            resource_ids: BTreeSet::from([format!(
                "/subscriptions/{SUBSCRIPTION}/resourceGroups/app"
            )]),
        }],
        condition: Vec::new(),
        tags: BTreeMap::from([("env".to_string(), "prod".to_string())]),
        kind: RuleKindBlock::Suppression {
            suppression: vec![SuppressionBlock {
                recurrence_type: RecurrenceType::Weekly,
                schedule: vec![ScheduleBlock {
                    start_date_utc: "2019-01-01T01:02:03Z".into(),
                    end_date_utc: "2019-01-03T15:02:07Z".into(),
                    recurrence_weekly: vec!["Sunday".into(), "Monday".into()],
                    recurrence_monthly: BTreeSet::new(),
                }],
            }],
        },
    }
}

/// Response body for [`suppression_rule`] as the API returns it.
pub fn rule_body(name: &str) -> Value {
    json!({
        "id": rule_path(name),
        "name": name,
        "type": "Microsoft.AlertsManagement/actionRules",
        "location": "Global",
        "tags": { "env": "prod" },
        "properties": {
            "type": "Suppression",
            "description": "patch window",
            "status": "Enabled",
            "scope": {
                "scopeType": "ResourceGroup",
                "values": [format!("/subscriptions/{SUBSCRIPTION}/resourceGroups/app")]
            },
            "suppressionConfig": {
                "recurrenceType": "Weekly",
                "schedule": {
                    "startDate": "01/01/2019",
                    "endDate": "01/03/2019",
                    "startTime": "01:02:03",
                    "endTime": "15:02:07",
                    "recurrenceValues": [0, 1]
                }
            },
            "createdAt": "2019-01-01T00:00:00Z",
            "lastModifiedAt": "2019-01-01T00:00:00Z",
            "createdBy": "someone@example.com",
            "lastModifiedBy": "someone@example.com"
        }
    })
}
