//! Request handlers
//!
//! Each handler validates the forwarded credential, checks its body or
//! query parameters, delegates to an op, and shapes the response. All
//! remote work happens with the caller's own token.

use super::error::ApiError;
use super::state::AppState;
use super::types::{
    BatchResponse, DeleteRequest, OrphanedResponse, ScanParams, UpgradeRequest,
};
use crate::arm::{ForwardedToken, TokenProvider};
use crate::batch::run_batch;
use crate::ops;
use crate::ops::scan::{self, ScanFilters};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;

/// `GET /api/getOrphanedResources`
pub async fn get_orphaned_resources(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrphanedResponse>, ApiError> {
    tracing::info!("getOrphanedResources invoked");
    let provider = ForwardedToken::from_headers(&headers)?;
    let token = provider.bearer_token().await?;

    let data =
        ops::orphaned::list_all_resources(&state.client, &token, state.config.max_concurrency)
            .await?;

    Ok(Json(OrphanedResponse { data }))
}

/// `GET /api/unattachedDisks`
pub async fn get_unattached_disks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    tracing::info!("unattachedDisks invoked");
    let provider = ForwardedToken::from_headers(&headers)?;
    let token = provider.bearer_token().await?;

    let body = ops::disks::unattached_disks(&state.client, &token).await?;
    Ok(Json(body))
}

/// `GET /api/scanDeprecatedResources?resourceType=&subscriptionId=`
pub async fn scan_deprecated_resources(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ScanParams>,
) -> Result<Json<scan::ScanReport>, ApiError> {
    tracing::info!("scanDeprecatedResources invoked");
    let provider = ForwardedToken::from_headers(&headers)?;

    let filters = ScanFilters {
        resource_type: checked_filter(params.resource_type, "resourceType")?,
        subscription_id: checked_filter(params.subscription_id, "subscriptionId")?,
    };

    let tenant = provider.tenant().map(|t| t.to_string());
    let token = provider.bearer_token().await?;

    let report = scan::scan_deprecated_resources(
        &state.client,
        &token,
        &filters,
        &state.config.classifier,
        tenant,
    )
    .await?;

    Ok(Json(report))
}

/// `POST /api/deleteResources`
pub async fn delete_resources(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<BatchResponse>, ApiError> {
    tracing::info!("deleteResources triggered");
    let provider = ForwardedToken::from_headers(&headers)?;
    if state.readonly {
        return Err(ApiError::ReadOnly);
    }

    // A body of the wrong shape is the caller's 400, same as a missing one
    let request: DeleteRequest = serde_json::from_value(body).unwrap_or_default();
    let resource_ids = request.resource_ids.unwrap_or_default();
    if resource_ids.is_empty() {
        return Err(ApiError::MalformedBody(
            "Invalid or missing resourceIds. Expected array of resource IDs.".to_string(),
        ));
    }

    tracing::info!(count = resource_ids.len(), "processing deletion request");
    let token = provider.bearer_token().await?;
    let client = &state.client;
    let token = token.as_str();

    let result = run_batch(
        resource_ids,
        state.config.max_concurrency,
        state.operation_timeout(),
        |parsed, _| async move { ops::delete::delete_resource(client, token, &parsed).await },
    )
    .await;

    Ok(Json(BatchResponse::from_result(result, "Deleted")))
}

/// `POST /api/upgradeResources`
pub async fn upgrade_resources(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<BatchResponse>, ApiError> {
    tracing::info!("upgradeResources triggered");
    let provider = ForwardedToken::from_headers(&headers)?;
    if state.readonly {
        return Err(ApiError::ReadOnly);
    }

    let request: UpgradeRequest = serde_json::from_value(body).unwrap_or_default();
    let resources = request.resources.unwrap_or_default();
    if resources.is_empty() {
        return Err(ApiError::MalformedBody(
            "Invalid or missing resources. Expected array of resource objects with id and type."
                .to_string(),
        ));
    }

    tracing::info!(count = resources.len(), "processing upgrade request");
    let token = provider.bearer_token().await?;
    let client = &state.client;
    let token = token.as_str();

    let result = run_batch(
        resources,
        state.config.max_concurrency,
        state.operation_timeout(),
        |parsed, item| async move {
            ops::upgrade::upgrade_resource(client, token, &parsed, &item).await
        },
    )
    .await;

    Ok(Json(BatchResponse::from_result(result, "Upgraded")))
}

/// Treat empty filter values as absent; anything else must survive the
/// conservative character check before it is embedded in a query.
fn checked_filter(value: Option<String>, name: &str) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(v) if v.is_empty() => Ok(None),
        Some(v) if scan::valid_filter(&v) => Ok(Some(v)),
        Some(_) => Err(ApiError::MalformedBody(format!("Invalid {name} filter"))),
    }
}
