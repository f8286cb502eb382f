//! Create/read/update/delete/import handlers for one action rule.
//!
//! Handlers take and return declared-block state; every call goes through the
//! codec so remote bodies never leak past this module.

use crate::azure::ActionRulesClient;
use crate::state::TrackedRule;
use ar_codec::{expand_action_rule, flatten_action_rule, validate_action_rule, ActionRuleBlock};
use ar_core::{ActionRule, ActionRuleId, Error, Result};
use std::sync::Arc;

pub struct ActionRuleResource {
    client: Arc<dyn ActionRulesClient>,
}

impl ActionRuleResource {
    pub fn new(client: Arc<dyn ActionRulesClient>) -> Self {
        Self { client }
    }

    /// ID a declared rule will have once created.
    pub fn id_for(&self, block: &ActionRuleBlock) -> ActionRuleId {
        ActionRuleId::new(
            self.client.subscription_id(),
            &block.resource_group_name,
            &block.name,
        )
    }

    /// Create a rule that must not already exist remotely.
    pub async fn create(&self, block: &ActionRuleBlock) -> Result<TrackedRule> {
        validate_action_rule(block)?;
        let (resource_group, name) = (block.resource_group_name.as_str(), block.name.as_str());

        match self.client.get_by_name(resource_group, name).await {
            Ok(existing) => {
                if let Some(id) = existing.id.filter(|id| !id.is_empty()) {
                    return Err(Error::ImportConflict { id });
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(Error::Transport {
                status, message, ..
            }) => {
                return Err(Error::transport(
                    "checking for presence of existing",
                    name,
                    resource_group,
                    status,
                    message,
                ));
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            "Creating Action Rule {:?} (Resource Group {:?})",
            name,
            resource_group
        );
        self.put_and_read(block).await
    }

    /// Replace an existing rule with the declared one.
    pub async fn update(&self, block: &ActionRuleBlock) -> Result<TrackedRule> {
        validate_action_rule(block)?;
        tracing::info!(
            "Updating Action Rule {:?} (Resource Group {:?})",
            block.name,
            block.resource_group_name
        );
        self.put_and_read(block).await
    }

    async fn put_and_read(&self, block: &ActionRuleBlock) -> Result<TrackedRule> {
        let (resource_group, name) = (block.resource_group_name.as_str(), block.name.as_str());

        let body = expand_action_rule(block)?;
        self.client.create_update(resource_group, name, &body).await?;

        let rule = self.client.get_by_name(resource_group, name).await?;
        let id = rule.id.clone().filter(|id| !id.is_empty()).ok_or_else(|| {
            Error::transport("retrieving", name, resource_group, None, "empty or nil ID returned")
        })?;
        let parsed = ActionRuleId::parse(&id)?;

        Ok(tracked(&rule, &parsed, id))
    }

    /// Read a rule by ID. `Ok(None)` means it no longer exists.
    ///
    /// With `expected_type` set, a remote rule of another type is an error
    /// rather than silently replacing the tracked state.
    pub async fn read(&self, id: &str, expected_type: Option<&str>) -> Result<Option<TrackedRule>> {
        let parsed = ActionRuleId::parse(id)?;

        let rule = match self
            .client
            .get_by_name(&parsed.resource_group, &parsed.name)
            .await
        {
            Ok(rule) => rule,
            Err(e) if e.is_not_found() => {
                tracing::info!("Action Rule {:?} does not exist - removing from state", id);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let actual = rule.properties.kind.type_name();
        if let Some(expected) = expected_type {
            if expected != actual {
                return Err(Error::TypeMismatch {
                    id: id.to_string(),
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let remote_id = rule
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| parsed.to_string());

        Ok(Some(tracked(&rule, &parsed, remote_id)))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let parsed = ActionRuleId::parse(id)?;
        tracing::info!(
            "Deleting Action Rule {:?} (Resource Group {:?})",
            parsed.name,
            parsed.resource_group
        );
        self.client
            .delete(&parsed.resource_group, &parsed.name)
            .await
    }

    /// Read an existing rule so it can be tracked; absence is an error.
    pub async fn import(&self, id: &str) -> Result<TrackedRule> {
        let parsed = ActionRuleId::parse(id)?;
        match self.read(id, None).await? {
            Some(tracked) => Ok(tracked),
            None => Err(Error::not_found(parsed.name, parsed.resource_group)),
        }
    }
}

fn tracked(rule: &ActionRule, id: &ActionRuleId, remote_id: String) -> TrackedRule {
    TrackedRule {
        id: remote_id,
        rule: flatten_action_rule(rule, id),
    }
}
