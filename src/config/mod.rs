mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable overriding `provider.subscription_id`
pub const SUBSCRIPTION_ID_ENV: &str = "ARM_SUBSCRIPTION_ID";

/// Environment variable overriding `provider.access_token`
pub const ACCESS_TOKEN_ENV: &str = "ARM_ACCESS_TOKEN";

const DEFAULT_PATHS: [&str; 3] = [
    "./actionrule.toml",
    "~/.config/actionrule/config.toml",
    "/etc/actionrule/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config.provider);
    validate_config(&config)?;

    tracing::debug!(
        "Loaded {} action rule(s) from {:?}",
        config.action_rules.len(),
        path
    );

    Ok(config)
}

/// Parse configuration text without touching the environment.
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    if let Some(path) = find_default_config() {
        return load_config(&path);
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config.provider);
    Ok(config)
}

/// First existing file among the default search paths.
pub fn find_default_config() -> Option<PathBuf> {
    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = PathBuf::from(shellexpand::tilde(path_str).as_ref());
        path.exists().then_some(path)
    })
}

/// Overlay credentials from the environment on top of the file values.
pub fn apply_env_overrides(provider: &mut ProviderConfig) {
    if let Some(subscription_id) = non_empty_env(SUBSCRIPTION_ID_ENV) {
        tracing::debug!("Using subscription id from {}", SUBSCRIPTION_ID_ENV);
        provider.subscription_id = subscription_id;
    }
    if let Some(token) = non_empty_env(ACCESS_TOKEN_ENV) {
        tracing::debug!("Using access token from {}", ACCESS_TOKEN_ENV);
        provider.access_token = Some(token);
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let provider = &config.provider;

    if provider.request_timeout_secs == 0 {
        anyhow::bail!("provider.request_timeout_secs cannot be 0");
    }

    if !provider.endpoint.starts_with("http://") && !provider.endpoint.starts_with("https://") {
        anyhow::bail!(
            "provider.endpoint must be an http(s) URL, got {:?}",
            provider.endpoint
        );
    }

    if provider.api_version.trim().is_empty() {
        anyhow::bail!("provider.api_version cannot be empty");
    }

    let mut seen = HashSet::new();
    for rule in &config.action_rules {
        ar_codec::validate_action_rule(rule)?;

        if !seen.insert(rule.state_key()) {
            anyhow::bail!(
                "Action Rule {:?} (Resource Group {:?}) is declared more than once",
                rule.name,
                rule.resource_group_name
            );
        }
    }

    Ok(())
}

/// Subscription id and token, failing when either is missing.
pub fn require_credentials(provider: &ProviderConfig) -> Result<(String, String)> {
    if provider.subscription_id.trim().is_empty() {
        anyhow::bail!(
            "No subscription id configured; set provider.subscription_id or {}",
            SUBSCRIPTION_ID_ENV
        );
    }

    let token = provider
        .access_token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .with_context(|| {
            format!(
                "No access token configured; set provider.access_token or {}",
                ACCESS_TOKEN_ENV
            )
        })?;

    Ok((provider.subscription_id.clone(), token.to_string()))
}
