//! Deprecated resource scanning
//!
//! Fetches candidate resources from Azure Resource Graph, runs the local
//! classification rule table over each record, and assembles the bucketed
//! scan report. The graph query only narrows by type (plus the caller's
//! optional filters); all deprecation logic stays in [`crate::classify`]
//! where it is testable without HTTP plumbing.

use crate::arm::{ArmClient, ArmError};
use crate::classify::{self, CategorizedResources, ClassifierConfig, ScanSummary};
use chrono::Utc;
use serde_json::{json, Value};

/// Resource types the deprecation rules know about. The graph query is
/// restricted to these so scans stay cheap on large tenants.
const CANDIDATE_TYPES: &[&str] = &[
    "microsoft.compute/virtualmachines",
    "microsoft.classicstorage/storageaccounts",
    "microsoft.classiccompute/virtualmachines",
    "microsoft.apimanagement/service",
    "microsoft.web/serverfarms",
    "microsoft.sql/servers/databases",
    "microsoft.storage/storageaccounts",
    "microsoft.web/sites",
];

/// Optional scan narrowing from query parameters.
#[derive(Debug, Default, Clone)]
pub struct ScanFilters {
    pub resource_type: Option<String>,
    pub subscription_id: Option<String>,
}

/// Filter values are embedded into the graph query string, so only a
/// conservative character set is allowed through.
pub fn valid_filter(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-' | '_'))
}

/// Build the Resource Graph query for one scan.
pub fn build_scan_query(filters: &ScanFilters) -> String {
    let type_list = CANDIDATE_TYPES
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = format!("Resources\n| where type in~ ({type_list})");

    if let Some(subscription_id) = &filters.subscription_id {
        query.push_str(&format!("\n| where subscriptionId == \"{subscription_id}\""));
    }
    if let Some(resource_type) = &filters.resource_type {
        query.push_str(&format!("\n| where type =~ \"{resource_type}\""));
    }

    query.push_str(
        "\n| project id, name, type, kind, resourceGroup, subscriptionId, location, properties, tags",
    );
    query
}

/// A complete scan report, ready for serialization.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub status: &'static str,
    pub summary: ScanSummary,
    pub resources: CategorizedResources,
    pub raw_data: Vec<Value>,
}

/// Run a scan: query, classify, bucket, summarize.
pub async fn scan_deprecated_resources(
    client: &ArmClient,
    token: &str,
    filters: &ScanFilters,
    config: &ClassifierConfig,
    tenant: Option<String>,
) -> Result<ScanReport, ArmError> {
    let query = build_scan_query(filters);
    tracing::debug!(%query, "executing Resource Graph query");

    let url = client.graph_url()?;
    let response = client.post(&url, token, &json!({ "query": query })).await?;

    let candidates = response
        .get("data")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut deprecated = classify_candidates(candidates, config);

    // Deterministic ordering regardless of what the graph returned
    deprecated.sort_by(|a, b| {
        let key = |r: &Value| {
            (
                r.get("type").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                r.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
            )
        };
        key(a).cmp(&key(b))
    });

    tracing::info!(found = deprecated.len(), "deprecation scan completed");

    let mut buckets = CategorizedResources::default();
    for resource in &deprecated {
        let resource_type = resource.get("type").and_then(|v| v.as_str()).unwrap_or("");
        let reason = resource
            .get("deprecationReason")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        buckets.push(classify::categorize(resource_type, reason), resource.clone());
    }

    let summary = ScanSummary {
        total_found: deprecated.len(),
        by_category: buckets.counts(),
        scan_date: Utc::now().to_rfc3339(),
        tenant,
    };

    Ok(ScanReport {
        status: "Success",
        summary,
        resources: buckets,
        raw_data: deprecated,
    })
}

/// Classify each candidate and keep the deprecated ones, annotated with
/// their verdict fields.
fn classify_candidates(candidates: Vec<Value>, config: &ClassifierConfig) -> Vec<Value> {
    candidates
        .into_iter()
        .filter_map(|mut resource| {
            let verdict = classify::classify(&resource, config);
            if !verdict.is_deprecated {
                return None;
            }
            if let Some(obj) = resource.as_object_mut() {
                obj.insert("isDeprecated".to_string(), json!(true));
                obj.insert("deprecationReason".to_string(), json!(verdict.reason));
                obj.insert(
                    "recommendedAction".to_string(),
                    json!(verdict.recommended_action),
                );
            }
            Some(resource)
        })
        .collect()
}
