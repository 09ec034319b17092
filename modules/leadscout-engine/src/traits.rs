use async_trait::async_trait;
use thiserror::Error;

use leadscout_common::{Business, LocationSuggestion, SearchProgress, SearchQuery};

pub type SourceResult<T> = Result<T, SourceError>;

/// How a single upstream call failed. Rate limits are classified apart
/// from everything else because the batch executor treats them with a
/// separate (much more patient) retry budget.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream rate limit hit")]
    RateLimited,

    #[error("{0}")]
    Failed(String),
}

// --- LeadSource trait ---

/// The upstream boundary: one grounded extraction call per batch, plus
/// the two best-effort autocomplete lookups.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// One bounded extraction request for `target_count` businesses.
    /// Returns the raw response text, which is expected (not
    /// guaranteed) to contain a JSON array of candidates.
    async fn fetch_batch(
        &self,
        query: &SearchQuery,
        batch_index: usize,
        target_count: usize,
    ) -> SourceResult<String>;

    async fn suggest_locations(&self, input: &str) -> SourceResult<Vec<LocationSuggestion>>;

    async fn suggest_niches(&self, input: &str) -> SourceResult<Vec<String>>;

    fn name(&self) -> &str;
}

// --- SearchObserver trait ---

/// Callbacks surfaced to the caller over the lifetime of one run.
pub trait SearchObserver: Send + Sync {
    fn on_progress(&self, progress: &SearchProgress);

    /// Newly admitted records of one completed batch, in admission
    /// order. Never called with an empty slice.
    fn on_partial_results(&self, _records: &[Business]) {}
}
