//! Diff between declared rules and tracked state.

use crate::config::Config;
use crate::state::StateFile;
use ar_codec::{normalize_action_rule, ActionRuleBlock};
use ar_core::Result;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Declared but not tracked.
    Create,
    /// Tracked, and the declaration no longer matches the stored state.
    Update,
    Unchanged,
    /// Tracked but no longer declared; only the state entry is dropped.
    Forget,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Change::Create => "+ create",
            Change::Update => "~ update",
            Change::Unchanged => "  unchanged",
            Change::Forget => "- forget",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub key: String,
    pub change: Change,
    /// Declared rule for create/update/unchanged entries.
    pub rule: Option<ActionRuleBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub changes: Vec<PlannedChange>,
}

impl Plan {
    pub fn count(&self, change: Change) -> usize {
        self.changes.iter().filter(|c| c.change == change).count()
    }

    /// True when applying would neither call the API nor touch state.
    pub fn is_empty(&self) -> bool {
        self.changes.iter().all(|c| c.change == Change::Unchanged)
    }
}

/// Compare every declared rule with its tracked state.
///
/// Declarations are normalized through the codec first, so a rule whose
/// timestamps differ only in offset does not show up as an update.
pub fn plan(config: &Config, state: &StateFile) -> Result<Plan> {
    let mut changes = Vec::new();
    let mut declared = HashSet::new();

    for block in &config.action_rules {
        let key = block.state_key();
        declared.insert(key.clone());

        let change = match state.get(&key) {
            None => Change::Create,
            Some(tracked) if tracked.rule == normalize_action_rule(block)? => Change::Unchanged,
            Some(_) => Change::Update,
        };

        tracing::debug!("{}: {:?}", key, change);
        changes.push(PlannedChange {
            key,
            change,
            rule: Some(block.clone()),
        });
    }

    for (key, _) in state.iter().filter(|(key, _)| !declared.contains(*key)) {
        tracing::debug!("{}: {:?}", key, Change::Forget);
        changes.push(PlannedChange {
            key: key.clone(),
            change: Change::Forget,
            rule: None,
        });
    }

    Ok(Plan { changes })
}
