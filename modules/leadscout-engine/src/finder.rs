//! The extraction orchestrator: plans batches, runs them concurrently,
//! funnels every candidate through one deduplicating admission loop,
//! and streams progress and partial results to the caller.

use futures::stream::{self, StreamExt};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use leadscout_common::{Business, LeadscoutError, LocationSuggestion, SearchQuery};

use crate::batch::{execute_batch, RetryPolicy};
use crate::cooldown::CooldownGate;
use crate::dedup::Admitter;
use crate::plan::plan_batches;
use crate::progress::ProgressReporter;
use crate::traits::{LeadSource, SearchObserver};

/// Stagger between batch starts so launching a whole plan does not hit
/// the upstream as one burst. Scheduling nicety only; correctness
/// never depends on it.
const STAGGER: Duration = Duration::from_millis(150);

/// Autocomplete inputs shorter than this never reach the upstream.
const MIN_SUGGESTION_PREFIX: usize = 2;

pub struct LeadFinder {
    source: Box<dyn LeadSource>,
    gate: CooldownGate,
    policy: RetryPolicy,
}

impl LeadFinder {
    pub fn new(source: Box<dyn LeadSource>) -> Self {
        Self {
            source,
            gate: CooldownGate::new(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_gate(mut self, gate: CooldownGate) -> Self {
        self.gate = gate;
        self
    }

    /// Run one extraction. Returns at most `query.limit` unique leads;
    /// individual batch failures degrade to fewer results rather than
    /// failing the run. The cooldown gate is restamped whichever way
    /// the run ends.
    pub async fn run(
        &self,
        query: &SearchQuery,
        observer: &dyn SearchObserver,
    ) -> Result<Vec<Business>, LeadscoutError> {
        query.validate()?;
        let _slot = self.gate.acquire(observer).await;
        self.run_inner(query, observer).await
    }

    async fn run_inner(
        &self,
        query: &SearchQuery,
        observer: &dyn SearchObserver,
    ) -> Result<Vec<Business>, LeadscoutError> {
        let plan = plan_batches(query.limit);
        let total_batches = plan.len();
        info!(
            location = %query.location,
            niche = %query.niche,
            limit = query.limit,
            batches = total_batches,
            source = self.source.name(),
            "Starting extraction run"
        );

        let reporter = ProgressReporter::new(observer);
        reporter.report(5, "Starting real-time extraction...");

        // All batches run concurrently; completions arrive in whatever
        // order the upstream answers. Admission happens only in the
        // consuming loop below, so the dedup check-then-insert never
        // crosses an await.
        let mut completions = stream::iter(plan.into_iter().map(|batch| {
            let reporter = &reporter;
            let source = self.source.as_ref();
            let policy = &self.policy;
            async move {
                sleep(STAGGER * batch.index as u32).await;
                let candidates = execute_batch(source, query, batch, policy, reporter).await;
                (batch.index, candidates)
            }
        }))
        .buffer_unordered(total_batches.max(1));

        let mut admitter = Admitter::new();
        let mut leads: Vec<Business> = Vec::new();
        let mut completed_batches = 0usize;

        while let Some((batch_index, candidates)) = completions.next().await {
            completed_batches += 1;

            let mut fresh = Vec::new();
            for (item_index, raw) in candidates.into_iter().enumerate() {
                if leads.len() + fresh.len() >= query.limit {
                    break;
                }
                if let Some(business) = admitter.admit(raw, batch_index, item_index) {
                    fresh.push(business);
                }
            }

            if !fresh.is_empty() {
                observer.on_partial_results(&fresh);
                leads.extend(fresh);
            }

            let percentage =
                (10.0 + (completed_batches as f64 / total_batches as f64) * 85.0).round() as u8;
            reporter.report(
                percentage,
                format!("Extracted {} leads so far...", leads.len()),
            );
        }

        info!(leads = leads.len(), "Extraction run complete");
        reporter.report(
            100,
            format!("Extraction complete. Found {} unique leads.", leads.len()),
        );
        Ok(leads)
    }

    /// Best-effort location autocomplete. Never fails: short inputs and
    /// upstream errors both yield an empty list.
    pub async fn suggest_locations(&self, input: &str) -> Vec<LocationSuggestion> {
        let trimmed = input.trim();
        if trimmed.chars().count() < MIN_SUGGESTION_PREFIX {
            return Vec::new();
        }
        match self.source.suggest_locations(trimmed).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, "Location suggestion lookup failed");
                Vec::new()
            }
        }
    }

    /// Best-effort niche autocomplete. Same contract as
    /// [`suggest_locations`](Self::suggest_locations).
    pub async fn suggest_niches(&self, input: &str) -> Vec<String> {
        let trimmed = input.trim();
        if trimmed.chars().count() < MIN_SUGGESTION_PREFIX {
            return Vec::new();
        }
        match self.source.suggest_niches(trimmed).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(error = %e, "Niche suggestion lookup failed");
                Vec::new()
            }
        }
    }
}
