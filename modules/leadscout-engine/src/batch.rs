//! Single-batch execution: one bounded upstream request, response
//! parsing, and the per-batch retry policy.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use gemini_client::util::{first_json_array, strip_code_blocks};
use leadscout_common::{RawBusiness, SearchQuery};

use crate::plan::Batch;
use crate::progress::ProgressReporter;
use crate::traits::{LeadSource, SourceError};

/// Retry behavior of one batch. Rate limits get their own generous
/// budget; everything else is retried once and then abandoned.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after a transient failure.
    pub transient_retries: u32,
    /// Delay before a transient retry.
    pub transient_delay: Duration,
    /// Fixed pause after an upstream rate-limit signal.
    pub rate_limit_backoff: Duration,
    /// How many rate-limit pauses a batch tolerates before giving up.
    /// The upstream is quota-starved rather than broken, so the default
    /// is generous but bounded.
    pub rate_limit_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            transient_retries: 1,
            transient_delay: Duration::from_secs(1),
            rate_limit_backoff: Duration::from_secs(10),
            rate_limit_attempts: 20,
        }
    }
}

/// Run one batch to completion. Infallible by contract: any way this
/// can go wrong degrades to an empty candidate list, and the run as a
/// whole carries on.
pub(crate) async fn execute_batch(
    source: &dyn LeadSource,
    query: &SearchQuery,
    batch: Batch,
    policy: &RetryPolicy,
    reporter: &ProgressReporter<'_>,
) -> Vec<RawBusiness> {
    let mut transient_attempts = 0u32;
    let mut rate_limit_pauses = 0u32;

    loop {
        match source
            .fetch_batch(query, batch.index, batch.target_count)
            .await
        {
            Ok(text) => return parse_candidates(&text, batch.index),
            Err(SourceError::RateLimited) => {
                rate_limit_pauses += 1;
                if rate_limit_pauses > policy.rate_limit_attempts {
                    warn!(
                        batch = batch.index,
                        pauses = rate_limit_pauses - 1,
                        "Rate-limit budget exhausted, giving up on batch"
                    );
                    return Vec::new();
                }
                let seconds = policy.rate_limit_backoff.as_secs();
                reporter.report(
                    reporter.current(),
                    format!("Upstream quota reached, pausing {seconds} seconds before retrying..."),
                );
                sleep(policy.rate_limit_backoff).await;
            }
            Err(SourceError::Failed(reason)) => {
                transient_attempts += 1;
                if transient_attempts > policy.transient_retries {
                    warn!(
                        batch = batch.index,
                        error = %reason,
                        "Batch failed after retries, contributing no records"
                    );
                    return Vec::new();
                }
                debug!(batch = batch.index, error = %reason, "Batch attempt failed, retrying");
                sleep(policy.transient_delay).await;
            }
        }
    }
}

/// Decode candidates from free-form model text. Malformed output,
/// including the model apologizing in prose, is a zero-record batch,
/// never an error.
pub(crate) fn parse_candidates(text: &str, batch_index: usize) -> Vec<RawBusiness> {
    let cleaned = strip_code_blocks(text);
    let Some(span) = first_json_array(cleaned) else {
        warn!(
            batch = batch_index,
            "No JSON array in upstream response, treating batch as empty"
        );
        return Vec::new();
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(span) {
        Ok(values) => values,
        Err(e) => {
            warn!(batch = batch_index, error = %e, "Candidate array failed to decode");
            return Vec::new();
        }
    };

    // Element-wise conversion: one mangled candidate must not sink the
    // rest of the batch.
    values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawBusiness>(value).ok())
        .collect()
}
