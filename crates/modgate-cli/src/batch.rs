//! Batch moderation: fan bundles out as independent tasks and reassemble
//! the verdicts by input position.

use std::sync::Arc;
use std::time::Instant;

use anyhow::ensure;
use chrono::Utc;
use modgate_core::{Decision, ModerationVerdict, SignalBundle};
use modgate_engine::ModerationEngine;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Outcome for one bundle, tagged with its position in the input.
#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ModerationVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItem>,
    pub total: usize,
    pub processed: usize,
    pub approved: usize,
    pub review_required: usize,
    pub rejected: usize,
    pub elapsed_ms: f64,
    /// RFC 3339 timestamp of report creation.
    pub timestamp: String,
}

/// Default cap on bundles per batch.
pub const DEFAULT_MAX_BATCH: usize = 10;

/// Evaluate every entry on its own task.
///
/// Entries are raw JSON so that one that fails to decode is reported at its
/// index without dropping its neighbours. Tasks may finish in any order;
/// each result is slotted back by index so `results[i]` always belongs to
/// `entries[i]`. Batches larger than `max_batch` are refused outright.
pub async fn run_batch(
    engine: Arc<ModerationEngine>,
    entries: Vec<Value>,
    max_batch: usize,
) -> anyhow::Result<BatchReport> {
    let total = entries.len();
    ensure!(
        total <= max_batch,
        "batch of {total} bundles exceeds the limit of {max_batch}"
    );
    let start = Instant::now();

    let mut tasks = JoinSet::new();
    for (index, entry) in entries.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move { evaluate_entry(&engine, index, entry) });
    }

    let mut slots: Vec<Option<BatchItem>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let item = joined?;
        let index = item.index;
        slots[index] = Some(item);
    }

    let results: Vec<BatchItem> = slots.into_iter().flatten().collect();
    let report = summarise(results, start.elapsed().as_secs_f64() * 1000.0);
    info!(
        total = report.total,
        processed = report.processed,
        rejected = report.rejected,
        "batch complete"
    );
    Ok(report)
}

fn evaluate_entry(engine: &ModerationEngine, index: usize, entry: Value) -> BatchItem {
    let failed = |error: String| BatchItem {
        index,
        verdict: None,
        error: Some(error),
    };

    let bundle: SignalBundle = match serde_json::from_value(entry) {
        Ok(bundle) => bundle,
        Err(e) => {
            warn!(index, error = %e, "bundle failed to decode");
            return failed(format!("invalid bundle: {e}"));
        }
    };

    match engine.evaluate(&bundle) {
        Ok(verdict) => BatchItem {
            index,
            verdict: Some(verdict),
            error: None,
        },
        Err(e) => {
            warn!(index, field = e.field(), error = %e, "bundle rejected by validation");
            failed(e.to_string())
        }
    }
}

fn summarise(results: Vec<BatchItem>, elapsed_ms: f64) -> BatchReport {
    let count = |d: Decision| {
        results
            .iter()
            .filter(|r| r.verdict.as_ref().is_some_and(|v| v.decision == d))
            .count()
    };
    let approved = count(Decision::Approved);
    let review_required = count(Decision::ReviewRequired);
    let rejected = count(Decision::Rejected);

    BatchReport {
        total: results.len(),
        processed: approved + review_required + rejected,
        approved,
        review_required,
        rejected,
        elapsed_ms: (elapsed_ms * 100.0).round() / 100.0,
        timestamp: Utc::now().to_rfc3339(),
        results,
    }
}
