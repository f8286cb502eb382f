//! Local record of the action rules this tool manages.
//!
//! The state file maps `resource_group/name` to the rule's remote ID and the
//! last state flattened from the API. It is plain JSON so it can be inspected
//! and diffed by hand.

use anyhow::{Context, Result};
use ar_codec::ActionRuleBlock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default file name, placed next to the declaration file.
pub const STATE_FILE_NAME: &str = "actionrule-state.json";

const STATE_VERSION: u32 = 1;

/// A rule known to exist remotely, with its last flattened state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedRule {
    pub id: String,
    pub rule: ActionRuleBlock,
}

impl TrackedRule {
    pub fn key(&self) -> String {
        self.rule.state_key()
    }
}

#[derive(Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    #[serde(default)]
    rules: BTreeMap<String, TrackedRule>,
}

#[derive(Debug, Default)]
pub struct StateFile {
    path: Option<PathBuf>,
    rules: BTreeMap<String, TrackedRule>,
}

impl StateFile {
    /// State that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load state from `path`; a missing file is empty state bound to that path.
    pub fn load(path: &Path) -> Result<Self> {
        let mut state = Self {
            path: Some(path.to_path_buf()),
            rules: BTreeMap::new(),
        };

        if !path.exists() {
            tracing::debug!("No state file at {:?}, starting empty", path);
            return Ok(state);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {:?}", path))?;
        let persisted: PersistedState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {:?}", path))?;

        if persisted.version != STATE_VERSION {
            anyhow::bail!(
                "State file {:?} has version {}, expected {}",
                path,
                persisted.version,
                STATE_VERSION
            );
        }

        state.rules = persisted.rules;
        tracing::debug!("Loaded {} tracked rule(s) from {:?}", state.rules.len(), path);
        Ok(state)
    }

    /// Write state back to its file. In-memory state is a no-op.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let persisted = PersistedState {
            version: STATE_VERSION,
            rules: self.rules.clone(),
        };
        let json = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write state file: {:?}", path))?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&TrackedRule> {
        self.rules.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.rules.contains_key(key)
    }

    /// Insert or replace the entry for the rule's key.
    pub fn upsert(&mut self, tracked: TrackedRule) {
        self.rules.insert(tracked.key(), tracked);
    }

    pub fn remove(&mut self, key: &str) -> Option<TrackedRule> {
        self.rules.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TrackedRule)> {
        self.rules.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Default state path: next to the config file, else the working directory.
pub fn default_state_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .and_then(|p| p.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}
