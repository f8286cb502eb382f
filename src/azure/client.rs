use crate::config::{require_credentials, ProviderConfig};
use ar_core::{ActionRule, Error, Result, ACTION_RULES_SEGMENT, PROVIDER_NAMESPACE};
use anyhow::Context;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;

/// Operations the lifecycle handlers need from the action rules API
#[async_trait::async_trait]
pub trait ActionRulesClient: Send + Sync {
    /// Subscription every request is scoped to
    fn subscription_id(&self) -> &str;

    /// Fetch one rule; a missing rule is [`Error::NotFound`]
    async fn get_by_name(&self, resource_group: &str, name: &str) -> Result<ActionRule>;

    /// Create or replace a rule, returning the body the API echoed back
    async fn create_update(
        &self,
        resource_group: &str,
        name: &str,
        rule: &ActionRule,
    ) -> Result<ActionRule>;

    /// Delete a rule; deleting a rule that is already gone succeeds
    async fn delete(&self, resource_group: &str, name: &str) -> Result<()>;
}

/// reqwest-backed client for the Resource Manager endpoint.
pub struct AzureClient {
    client: Client,
    base_url: Url,
    subscription_id: String,
    access_token: String,
    api_version: String,
}

impl AzureClient {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let (subscription_id, access_token) = require_credentials(config)?;

        let base_url = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid endpoint {:?}", config.endpoint))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Endpoint {:?} cannot carry a request path", config.endpoint);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Ok(Self {
            client,
            base_url,
            subscription_id,
            access_token,
            api_version: config.api_version.clone(),
        })
    }

    /// Each ID part is pushed as one percent-encoded path segment.
    fn url(&self, resource_group: &str, name: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "subscriptions",
                self.subscription_id.as_str(),
                "resourceGroups",
                resource_group,
                "providers",
                PROVIDER_NAMESPACE,
                ACTION_RULES_SEGMENT,
                name,
            ]);
        }
        url
    }

    fn request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .query(&[("api-version", self.api_version.as_str())])
            .bearer_auth(&self.access_token)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        operation: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<Response> {
        self.request(request)
            .send()
            .await
            .map_err(|e| Error::transport(operation, name, resource_group, None, e.to_string()))
    }
}

/// Turn a non-success response into a transport error carrying its body.
async fn unexpected_status(
    response: Response,
    operation: &str,
    resource_group: &str,
    name: &str,
) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::transport(
        operation,
        name,
        resource_group,
        Some(status.as_u16()),
        format!("unexpected status {}: {}", status, body),
    )
}

async fn decode(
    response: Response,
    operation: &str,
    resource_group: &str,
    name: &str,
) -> Result<ActionRule> {
    let status = response.status().as_u16();
    response.json::<ActionRule>().await.map_err(|e| {
        Error::transport(
            operation,
            name,
            resource_group,
            Some(status),
            format!("decoding response: {}", e),
        )
    })
}

#[async_trait::async_trait]
impl ActionRulesClient for AzureClient {
    fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    async fn get_by_name(&self, resource_group: &str, name: &str) -> Result<ActionRule> {
        const OPERATION: &str = "retrieving";
        tracing::debug!("GET Action Rule {}/{}", resource_group, name);

        let response = self
            .send(
                self.client.get(self.url(resource_group, name)),
                OPERATION,
                resource_group,
                name,
            )
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::not_found(name, resource_group)),
            s if s.is_success() => decode(response, OPERATION, resource_group, name).await,
            _ => Err(unexpected_status(response, OPERATION, resource_group, name).await),
        }
    }

    async fn create_update(
        &self,
        resource_group: &str,
        name: &str,
        rule: &ActionRule,
    ) -> Result<ActionRule> {
        const OPERATION: &str = "creating/updating";
        tracing::debug!("PUT Action Rule {}/{}", resource_group, name);

        let response = self
            .send(
                self.client.put(self.url(resource_group, name)).json(rule),
                OPERATION,
                resource_group,
                name,
            )
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response, OPERATION, resource_group, name).await);
        }
        decode(response, OPERATION, resource_group, name).await
    }

    async fn delete(&self, resource_group: &str, name: &str) -> Result<()> {
        const OPERATION: &str = "deleting";
        tracing::debug!("DELETE Action Rule {}/{}", resource_group, name);

        let response = self
            .send(
                self.client.delete(self.url(resource_group, name)),
                OPERATION,
                resource_group,
                name,
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => {
                tracing::debug!(
                    "Action Rule {}/{} was already deleted",
                    resource_group,
                    name
                );
                Ok(())
            }
            _ => Err(unexpected_status(response, OPERATION, resource_group, name).await),
        }
    }
}
