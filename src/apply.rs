//! Drive the lifecycle handlers over a whole configuration.
//!
//! State is saved after every successful remote change, so a failure part
//! way through leaves the state file describing what actually exists.

use crate::config::Config;
use crate::plan::{plan, Change};
use crate::resource::ActionRuleResource;
use crate::state::StateFile;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub forgotten: Vec<String>,
}

/// Create untracked rules, update drifted ones, and forget undeclared ones.
pub async fn apply(
    config: &Config,
    state: &mut StateFile,
    resource: &ActionRuleResource,
) -> Result<ApplySummary> {
    let plan = plan(config, state)?;
    let mut summary = ApplySummary::default();

    for planned in plan.changes {
        let key = planned.key;
        match (planned.change, planned.rule) {
            (Change::Create, Some(rule)) => {
                let tracked = resource
                    .create(&rule)
                    .await
                    .with_context(|| format!("Failed to create {}", key))?;
                state.upsert(tracked);
                state.save()?;
                summary.created.push(key);
            }
            (Change::Update, Some(rule)) => {
                let tracked = resource
                    .update(&rule)
                    .await
                    .with_context(|| format!("Failed to update {}", key))?;
                state.upsert(tracked);
                state.save()?;
                summary.updated.push(key);
            }
            (Change::Forget, _) => {
                tracing::info!("{} is no longer declared, dropping it from state", key);
                state.remove(&key);
                state.save()?;
                summary.forgotten.push(key);
            }
            _ => summary.unchanged.push(key),
        }
    }

    Ok(summary)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: Vec<String>,
    pub removed: Vec<String>,
}

/// Re-read every tracked rule; rules gone remotely leave the state.
pub async fn refresh(state: &mut StateFile, resource: &ActionRuleResource) -> Result<RefreshSummary> {
    let mut summary = RefreshSummary::default();

    for key in state.keys() {
        let Some(tracked) = state.get(&key).cloned() else {
            continue;
        };

        let expected = tracked.rule.kind.type_name();
        match resource
            .read(&tracked.id, Some(expected))
            .await
            .with_context(|| format!("Failed to refresh {}", key))?
        {
            Some(current) => {
                state.remove(&key);
                state.upsert(current);
                state.save()?;
                summary.refreshed.push(key);
            }
            None => {
                state.remove(&key);
                state.save()?;
                summary.removed.push(key);
            }
        }
    }

    Ok(summary)
}

/// Delete tracked rules, all of them or only those named `name`.
///
/// `name` matches either a bare rule name or a `resource_group/name` key.
pub async fn destroy(
    state: &mut StateFile,
    resource: &ActionRuleResource,
    name: Option<&str>,
) -> Result<Vec<String>> {
    let targets: Vec<(String, String)> = state
        .iter()
        .filter(|(key, tracked)| name.map_or(true, |n| tracked.rule.name == n || key.as_str() == n))
        .map(|(key, tracked)| (key.clone(), tracked.id.clone()))
        .collect();

    if let Some(name) = name {
        if targets.is_empty() {
            anyhow::bail!("No tracked Action Rule matches {:?}", name);
        }
    }

    let mut destroyed = Vec::new();
    for (key, id) in targets {
        resource
            .delete(&id)
            .await
            .with_context(|| format!("Failed to delete {}", key))?;
        state.remove(&key);
        state.save()?;
        destroyed.push(key);
    }

    Ok(destroyed)
}
