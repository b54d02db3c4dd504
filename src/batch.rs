//! Batch Fan-Out Executor
//!
//! Runs one remote operation per target resource with bounded concurrency.
//! Items are independent: a failing item becomes a `Failed` outcome and
//! never cancels its siblings. The executor joins every in-flight
//! operation before returning, and outcomes are restored to the order the
//! items were submitted in, regardless of completion order.
//!
//! Resource ids are validated against the structured ARM path shape before
//! any network call is made; a malformed id fails its item immediately.

use crate::arm::resource_id::ResourceId;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

/// Terminal state of a single batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Succeeded,
    Failed,
}

/// Outcome of one batch item. Created once, never mutated.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub resource_id: String,
    pub status: BatchStatus,
    pub detail: Option<Value>,
    pub error: Option<String>,
}

impl BatchOutcome {
    fn success(resource_id: String, detail: Value) -> Self {
        Self {
            resource_id,
            status: BatchStatus::Succeeded,
            detail: Some(detail),
            error: None,
        }
    }

    fn failure(resource_id: String, error: String) -> Self {
        Self {
            resource_id,
            status: BatchStatus::Failed,
            detail: None,
            error: Some(error),
        }
    }
}

/// Aggregated result of a batch run, in input order.
#[derive(Debug)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<BatchOutcome>,
}

/// A batch item that names the resource it targets.
pub trait BatchTarget {
    fn resource_id(&self) -> &str;
}

impl BatchTarget for String {
    fn resource_id(&self) -> &str {
        self
    }
}

/// Execute `op` once per item with at most `limit` operations in flight.
///
/// Each operation runs under `op_timeout`; an elapsed timer fails only
/// that item. `succeeded + failed` always equals the number of items, and
/// `outcomes[i]` corresponds to `items[i]`.
pub async fn run_batch<T, F, Fut>(
    items: Vec<T>,
    limit: usize,
    op_timeout: Duration,
    op: F,
) -> BatchResult
where
    T: BatchTarget,
    F: Fn(ResourceId, T) -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    let batch_id = Uuid::new_v4();
    let total = items.len();
    tracing::info!(%batch_id, total, "starting batch");

    let op = &op;
    let mut indexed: Vec<(usize, BatchOutcome)> = stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| async move {
            let raw_id = item.resource_id().to_string();
            let outcome = match ResourceId::parse(&raw_id) {
                Err(err) => BatchOutcome::failure(raw_id, err.to_string()),
                Ok(parsed) => match tokio::time::timeout(op_timeout, op(parsed, item)).await {
                    Err(_) => BatchOutcome::failure(
                        raw_id,
                        format!("operation timed out after {}s", op_timeout.as_secs()),
                    ),
                    Ok(Err(err)) => BatchOutcome::failure(raw_id, format!("{err:#}")),
                    Ok(Ok(detail)) => BatchOutcome::success(raw_id, detail),
                },
            };
            (index, outcome)
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    // Completion order is arbitrary; restore submission order
    indexed.sort_unstable_by_key(|(index, _)| *index);

    let outcomes: Vec<BatchOutcome> = indexed.into_iter().map(|(_, outcome)| outcome).collect();
    let succeeded = outcomes
        .iter()
        .filter(|o| o.status == BatchStatus::Succeeded)
        .count();
    let failed = outcomes.len() - succeeded;

    tracing::info!(%batch_id, succeeded, failed, "batch completed");

    BatchResult {
        succeeded,
        failed,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn valid_id(n: usize) -> String {
        format!(
            "/subscriptions/s1/resourceGroups/g1/providers/Microsoft.Compute/virtualMachines/vm{n}"
        )
    }

    #[tokio::test]
    async fn one_outcome_per_item_in_input_order() {
        let ids: Vec<String> = (0..10).map(valid_id).collect();
        let result = run_batch(ids.clone(), 3, Duration::from_secs(5), |parsed, _| async move {
            // Shuffle completion order
            let delay = if parsed.name().ends_with('2') { 50 } else { 1 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(json!("ok"))
        })
        .await;

        assert_eq!(result.outcomes.len(), 10);
        assert_eq!(result.succeeded, 10);
        assert_eq!(result.failed, 0);
        for (i, outcome) in result.outcomes.iter().enumerate() {
            assert_eq!(outcome.resource_id, ids[i]);
        }
    }

    #[tokio::test]
    async fn malformed_id_fails_without_invoking_op() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let items = vec!["bad-id".to_string(), valid_id(1)];

        let result = run_batch(items, 4, Duration::from_secs(5), move |_, _| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!("ok"))
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.succeeded, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.outcomes[0].status, BatchStatus::Failed);
        assert!(result.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("Invalid resource ID format"));
        assert_eq!(result.outcomes[1].status, BatchStatus::Succeeded);
    }

    #[tokio::test]
    async fn failures_are_isolated() {
        let items: Vec<String> = (0..5).map(valid_id).collect();
        let result = run_batch(items, 2, Duration::from_secs(5), |parsed, _| async move {
            if parsed.name() == "vm2" {
                anyhow::bail!("boom");
            }
            Ok(json!("ok"))
        })
        .await;

        assert_eq!(result.succeeded, 4);
        assert_eq!(result.failed, 1);
        assert_eq!(result.outcomes[2].status, BatchStatus::Failed);
        assert_eq!(result.outcomes[2].error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn concurrency_stays_within_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));
        let items: Vec<String> = (0..20).map(valid_id).collect();

        let (inf, hw) = (in_flight.clone(), high_water.clone());
        run_batch(items, 3, Duration::from_secs(5), move |_, _| {
            let (inf, hw) = (inf.clone(), hw.clone());
            async move {
                let now = inf.fetch_add(1, Ordering::SeqCst) + 1;
                hw.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inf.fetch_sub(1, Ordering::SeqCst);
                Ok(json!("ok"))
            }
        })
        .await;

        assert!(high_water.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn slow_operations_time_out_individually() {
        let items = vec![valid_id(1), valid_id(2)];
        let result = run_batch(items, 2, Duration::from_millis(20), |parsed, _| async move {
            if parsed.name() == "vm1" {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            Ok(json!("ok"))
        })
        .await;

        assert_eq!(result.failed, 1);
        assert_eq!(result.succeeded, 1);
        assert!(result.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_result() {
        let result = run_batch(
            Vec::<String>::new(),
            4,
            Duration::from_secs(1),
            |_, _| async move { Ok(json!("ok")) },
        )
        .await;
        assert_eq!(result.succeeded + result.failed, 0);
        assert!(result.outcomes.is_empty());
    }
}
