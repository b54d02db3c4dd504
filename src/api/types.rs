//! Request and response shapes
//!
//! These mirror the JSON contract the frontend already speaks: camelCase
//! keys, `summary.successful`/`summary.failed` tallies, and per-item
//! `results` entries whose status is the operation's verb (`Deleted`,
//! `Upgraded`) or `Failed`.

use crate::batch::{BatchOutcome, BatchResult, BatchStatus};
use crate::ops::upgrade::UpgradeItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeleteRequest {
    pub resource_ids: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpgradeRequest {
    pub resources: Option<Vec<UpgradeItem>>,
}

/// Optional scan narrowing; empty strings mean "no filter".
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanParams {
    pub resource_type: Option<String>,
    pub subscription_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrphanedResponse {
    pub data: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub resource_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub status: &'static str,
    pub summary: BatchSummary,
    pub results: Vec<ResultEntry>,
}

impl BatchResponse {
    /// Shape a batch result for the wire, labeling successes with the
    /// operation's verb.
    pub fn from_result(result: BatchResult, success_label: &str) -> Self {
        let results = result
            .outcomes
            .into_iter()
            .map(|outcome| ResultEntry::from_outcome(outcome, success_label))
            .collect();

        Self {
            status: "Completed",
            summary: BatchSummary {
                successful: result.succeeded,
                failed: result.failed,
            },
            results,
        }
    }
}

impl ResultEntry {
    fn from_outcome(outcome: BatchOutcome, success_label: &str) -> Self {
        let status = match outcome.status {
            BatchStatus::Succeeded => success_label.to_string(),
            BatchStatus::Failed => "Failed".to_string(),
        };
        Self {
            resource_id: outcome.resource_id,
            status,
            details: outcome.detail,
            error: outcome.error,
        }
    }
}
