use ar_codec::ActionRuleBlock;
use ar_core::API_VERSION;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Declared `[[action_rule]]` tables, in file order.
    #[serde(default, rename = "action_rule")]
    pub action_rules: Vec<ActionRuleBlock>,
}

impl Config {
    /// Find a declared rule by name, optionally narrowed to one resource group.
    pub fn find_rule(&self, name: &str, resource_group: Option<&str>) -> Option<&ActionRuleBlock> {
        self.action_rules.iter().find(|rule| {
            rule.name == name
                && resource_group.map_or(true, |rg| rule.resource_group_name == rg)
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Resource Manager endpoint, without a trailing slash
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub subscription_id: String,

    /// Bearer token for the Resource Manager API. Prefer `ARM_ACCESS_TOKEN`
    /// over writing it into the file.
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            subscription_id: String::new(),
            access_token: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_request_timeout() -> u64 {
    60
}
