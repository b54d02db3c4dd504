//! ARM Client
//!
//! Main client for talking to Azure Resource Manager and Azure Resource
//! Graph, combining URL construction and HTTP plumbing. The caller's
//! bearer token is passed per call; the client holds no credentials.

use super::http::{ArmError, ArmHttpClient};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default management API origin (public Azure cloud).
pub const DEFAULT_ARM_BASE_URL: &str = "https://management.azure.com";

/// Resource Graph query endpoint api-version.
pub const RESOURCE_GRAPH_API_VERSION: &str = "2021-03-01";

/// Main ARM client
#[derive(Clone)]
pub struct ArmClient {
    pub http: ArmHttpClient,
    base: Url,
}

impl ArmClient {
    /// Create a new ARM client against the given base origin.
    ///
    /// The base is configurable for sovereign clouds and for tests, which
    /// point it at a mock server.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ArmError> {
        let base = Url::parse(base_url)?;
        let http = ArmHttpClient::new(timeout)?;
        Ok(Self { http, base })
    }

    /// Build a fully-qualified URL for a resource path plus api-version.
    pub fn resource_url(&self, resource_path: &str, api_version: &str) -> Result<String, ArmError> {
        let mut url = self.base.join(resource_path)?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url.into())
    }

    /// Resource Graph query endpoint URL.
    pub fn graph_url(&self) -> Result<String, ArmError> {
        self.resource_url(
            "/providers/Microsoft.ResourceGraph/resources",
            RESOURCE_GRAPH_API_VERSION,
        )
    }

    /// Subscription listing URL.
    pub fn subscriptions_url(&self, api_version: &str) -> Result<String, ArmError> {
        self.resource_url("/subscriptions", api_version)
    }

    /// Per-subscription resource listing URL.
    pub fn subscription_resources_url(
        &self,
        subscription_id: &str,
        api_version: &str,
    ) -> Result<String, ArmError> {
        self.resource_url(
            &format!("/subscriptions/{}/resources", subscription_id),
            api_version,
        )
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, token: &str) -> Result<Value, ArmError> {
        let (_, body) = self.http.request(Method::GET, url, token, None).await?;
        Ok(body)
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, token: &str, body: &Value) -> Result<Value, ArmError> {
        let (_, body) = self
            .http
            .request(Method::POST, url, token, Some(body))
            .await?;
        Ok(body)
    }

    /// Make a PUT request
    pub async fn put(&self, url: &str, token: &str, body: &Value) -> Result<Value, ArmError> {
        let (_, body) = self
            .http
            .request(Method::PUT, url, token, Some(body))
            .await?;
        Ok(body)
    }

    /// Make a PATCH request
    pub async fn patch(&self, url: &str, token: &str, body: &Value) -> Result<Value, ArmError> {
        let (_, body) = self
            .http
            .request(Method::PATCH, url, token, Some(body))
            .await?;
        Ok(body)
    }

    /// Make a DELETE request, returning the remote status alongside the body.
    ///
    /// Deletion is asynchronous on the ARM side; callers distinguish 200
    /// from 202 themselves.
    pub async fn delete(&self, url: &str, token: &str) -> Result<(u16, Value), ArmError> {
        self.http.request(Method::DELETE, url, token, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArmClient {
        ArmClient::new(DEFAULT_ARM_BASE_URL, Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn resource_url_appends_api_version() {
        let url = client()
            .resource_url(
                "/subscriptions/s1/resourceGroups/g1/providers/Microsoft.Compute/virtualMachines/vm1",
                "2021-04-01",
            )
            .unwrap();
        assert_eq!(
            url,
            "https://management.azure.com/subscriptions/s1/resourceGroups/g1/providers/Microsoft.Compute/virtualMachines/vm1?api-version=2021-04-01"
        );
    }

    #[test]
    fn graph_url_targets_resource_graph_provider() {
        let url = client().graph_url().unwrap();
        assert!(url.starts_with(
            "https://management.azure.com/providers/Microsoft.ResourceGraph/resources"
        ));
        assert!(url.ends_with("api-version=2021-03-01"));
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(ArmClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
