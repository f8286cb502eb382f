//! Azure resource identifiers.
//!
//! [`ResourceId`] is the generic `/subscriptions/{sub}/resourceGroups/{rg}/
//! providers/{ns}/{type}/{name}` path split into key/value segments.
//! [`ActionRuleId`] is the typed identifier of an action rule, recovered from
//! such a path with no segments left over.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Resource provider namespace of action rules.
pub const PROVIDER_NAMESPACE: &str = "Microsoft.AlertsManagement";

/// Path segment key that holds the action rule name.
pub const ACTION_RULES_SEGMENT: &str = "actionRules";

/// A parsed Azure resource ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    pub provider: Option<String>,
    /// Remaining key/value segments in path order.
    pub path: Vec<(String, String)>,
}

impl ResourceId {
    /// Parse an absolute resource ID path.
    pub fn parse(input: &str) -> Result<Self> {
        if !input.starts_with('/') {
            return Err(Error::Parse(format!(
                "cannot parse Azure ID {input:?}: expected an absolute path"
            )));
        }

        let trimmed = input.trim_start_matches('/').trim_end_matches('/');
        let components: Vec<&str> = trimmed.split('/').collect();

        if components.len() % 2 != 0 {
            return Err(Error::Parse(format!(
                "the number of path segments is not divisible by 2 in {trimmed:?}"
            )));
        }

        let mut subscription_id: Option<String> = None;
        let mut resource_group = None;
        let mut provider = None;
        let mut path = Vec::with_capacity(components.len() / 2);

        for pair in components.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if key.is_empty() || value.is_empty() {
                return Err(Error::Parse(format!(
                    "key/value cannot be empty strings. Key: {key:?}, Value: {value:?}"
                )));
            }

            // Only the first "subscriptions" segment is the subscription; later
            // ones belong to nested resource types.
            match key {
                "subscriptions" if subscription_id.is_none() => {
                    subscription_id = Some(value.to_string())
                }
                "resourceGroups" | "resourcegroups" if resource_group.is_none() => {
                    resource_group = Some(value.to_string())
                }
                "providers" if provider.is_none() => provider = Some(value.to_string()),
                _ => path.push((key.to_string(), value.to_string())),
            }
        }

        let subscription_id = subscription_id
            .ok_or_else(|| Error::Parse(format!("no subscription ID found in {trimmed:?}")))?;

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            path,
        })
    }

    /// Remove and return the value of the segment named `key`.
    pub fn pop_segment(&mut self, key: &str) -> Result<String> {
        let pos = self
            .path
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| Error::Parse(format!("ID was missing the `{key}` element")))?;
        Ok(self.path.remove(pos).1)
    }

    /// Fail if any segment has not been consumed.
    pub fn validate_no_empty_segments(&self, input: &str) -> Result<()> {
        if self.path.is_empty() {
            return Ok(());
        }
        Err(Error::Parse(format!(
            "ID contained more segments than required: {input:?}, {:?}",
            self.path
        )))
    }
}

/// Identifier of an action rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionRuleId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl ActionRuleId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            name: name.into(),
        }
    }

    /// Parse a fully-qualified action rule ID.
    pub fn parse(input: &str) -> Result<Self> {
        let mut id = ResourceId::parse(input)
            .map_err(|e| Error::Parse(format!("parsing action rule ID {input:?}: {e}")))?;

        let resource_group = id.resource_group.clone().ok_or_else(|| {
            Error::Parse(format!("action rule ID {input:?} has no resource group"))
        })?;
        let name = id.pop_segment(ACTION_RULES_SEGMENT)?;
        id.validate_no_empty_segments(input)?;

        Ok(Self {
            subscription_id: id.subscription_id,
            resource_group,
            name,
        })
    }

    /// Key used to track the rule locally: `resource_group/name`.
    pub fn state_key(&self) -> String {
        format!("{}/{}", self.resource_group, self.name)
    }
}

impl fmt::Display for ActionRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription_id,
            self.resource_group,
            PROVIDER_NAMESPACE,
            ACTION_RULES_SEGMENT,
            self.name
        )
    }
}

impl FromStr for ActionRuleId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/monitoring/providers/Microsoft.AlertsManagement/actionRules/nightly";

    #[test]
    fn parses_action_rule_id() {
        let id = ActionRuleId::parse(RULE_ID).unwrap();
        assert_eq!(id.subscription_id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(id.resource_group, "monitoring");
        assert_eq!(id.name, "nightly");
    }

    #[test]
    fn display_round_trips() {
        let id = ActionRuleId::parse(RULE_ID).unwrap();
        assert_eq!(id.to_string(), RULE_ID);
        assert_eq!(RULE_ID.parse::<ActionRuleId>().unwrap(), id);
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let id = ActionRuleId::parse(&format!("{RULE_ID}/")).unwrap();
        assert_eq!(id.name, "nightly");
    }

    #[test]
    fn lowercase_resource_groups_key_is_accepted() {
        let id = ActionRuleId::parse(
            "/subscriptions/sub/resourcegroups/rg/providers/Microsoft.AlertsManagement/actionRules/r",
        )
        .unwrap();
        assert_eq!(id.resource_group, "rg");
    }

    #[test]
    fn rejects_missing_action_rules_segment() {
        let err = ActionRuleId::parse(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Insights/actionGroups/g",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn rejects_extra_segments() {
        let err = ActionRuleId::parse(&format!("{RULE_ID}/extra/segment")).unwrap_err();
        assert!(err.to_string().contains("more segments"));
    }

    #[test]
    fn rejects_odd_segment_count() {
        assert!(ActionRuleId::parse("/subscriptions/sub/resourceGroups").is_err());
    }

    #[test]
    fn rejects_relative_path() {
        assert!(ActionRuleId::parse("subscriptions/sub/resourceGroups/rg").is_err());
    }

    #[test]
    fn rejects_missing_subscription() {
        let err = ResourceId::parse("/resourceGroups/rg/providers/Microsoft.Web/sites/app")
            .unwrap_err();
        assert!(err.to_string().contains("no subscription ID"));
    }

    #[test]
    fn rejects_empty_segment() {
        assert!(ResourceId::parse("/subscriptions//resourceGroups/rg").is_err());
    }

    #[test]
    fn generic_resource_id_keeps_path_order() {
        let id = ResourceId::parse(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm/extensions/ext",
        )
        .unwrap();
        assert_eq!(id.provider.as_deref(), Some("Microsoft.Compute"));
        assert_eq!(
            id.path,
            vec![
                ("virtualMachines".to_string(), "vm".to_string()),
                ("extensions".to_string(), "ext".to_string()),
            ]
        );
    }

    #[test]
    fn resource_group_only_id_is_valid() {
        let id = ResourceId::parse("/subscriptions/sub/resourceGroups/rg").unwrap();
        assert_eq!(id.resource_group.as_deref(), Some("rg"));
        assert!(id.provider.is_none());
        assert!(id.path.is_empty());
    }
}
