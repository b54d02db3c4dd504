//! Unattached disk discovery
//!
//! A single fixed Resource Graph query; the graph response body is
//! returned to the caller verbatim.

use crate::arm::{ArmClient, ArmError};
use serde_json::{json, Value};

/// Resource Graph query for disks no workload is attached to.
pub const UNATTACHED_DISKS_QUERY: &str = "Resources \
| where type =~ 'Microsoft.Compute/disks' \
| where properties.diskState == 'Unattached'";

/// Run the unattached-disk query and return the raw graph response.
pub async fn unattached_disks(client: &ArmClient, token: &str) -> Result<Value, ArmError> {
    let url = client.graph_url()?;
    client
        .post(&url, token, &json!({ "query": UNATTACHED_DISKS_QUERY }))
        .await
}
