//! Orphaned resource listing
//!
//! Enumerates every subscription the caller's token can see, then lists
//! each subscription's resources with bounded concurrent fan-out. Any
//! subscription-level failure fails the whole listing; the remote status
//! is passed through to the caller.

use crate::arm::{ArmClient, ArmError};
use futures::stream::{self, StreamExt};
use serde_json::Value;

const SUBSCRIPTIONS_API_VERSION: &str = "2020-01-01";
const RESOURCES_API_VERSION: &str = "2021-04-01";

/// List all resources across the caller's subscriptions.
pub async fn list_all_resources(
    client: &ArmClient,
    token: &str,
    limit: usize,
) -> Result<Vec<Value>, ArmError> {
    let url = client.subscriptions_url(SUBSCRIPTIONS_API_VERSION)?;
    let response = client.get(&url, token).await?;

    let subscription_ids: Vec<String> = response
        .get("value")
        .and_then(|v| v.as_array())
        .map(|subs| {
            subs.iter()
                .filter_map(|sub| sub.get("subscriptionId").and_then(|v| v.as_str()))
                .map(|id| id.to_string())
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(count = subscription_ids.len(), "listing resources per subscription");

    let listings: Vec<Result<Vec<Value>, ArmError>> = stream::iter(subscription_ids)
        .map(|subscription_id| async move {
            let url = client.subscription_resources_url(&subscription_id, RESOURCES_API_VERSION)?;
            let response = client.get(&url, token).await?;
            Ok(response
                .get("value")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default())
        })
        .buffered(limit.max(1))
        .collect()
        .await;

    let mut all_resources = Vec::new();
    for listing in listings {
        all_resources.extend(listing?);
    }

    Ok(all_resources)
}
