//! Resource deletion
//!
//! Deletes a single resource through ARM. Deletion is asynchronous on the
//! remote side; 200 and 202 both count as "deletion initiated".

use crate::arm::{ArmClient, ResourceId};
use anyhow::Result;
use serde_json::{json, Value};

const DELETE_API_VERSION: &str = "2021-04-01";

/// Issue a DELETE for one resource and report the initiation detail.
pub async fn delete_resource(
    client: &ArmClient,
    token: &str,
    id: &ResourceId,
) -> Result<Value> {
    let url = client.resource_url(id.as_str(), DELETE_API_VERSION)?;
    let (status, _) = client.delete(&url, token).await?;

    anyhow::ensure!(
        status == 200 || status == 202,
        "unexpected status {status} from resource deletion"
    );

    tracing::info!(resource = %id, "resource deletion initiated");
    Ok(json!("Resource deletion initiated"))
}
