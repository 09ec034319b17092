//! Batched lead-extraction engine.
//!
//! A search is decomposed into bounded batches that run concurrently
//! against a rate-limited generative upstream. Every candidate funnels
//! through one deduplicating admission loop; progress and partial
//! results stream to the caller as batches complete; batch failures
//! degrade to fewer results instead of failing the run.

pub mod batch;
pub mod cooldown;
pub mod dedup;
pub mod finder;
pub mod plan;
mod progress;
pub mod source;
pub mod traits;

pub use batch::RetryPolicy;
pub use cooldown::{CooldownGate, COOLDOWN};
pub use dedup::Admitter;
pub use finder::LeadFinder;
pub use plan::{plan_batches, Batch, BATCH_SIZE};
pub use source::GeminiLeadSource;
pub use traits::{LeadSource, SearchObserver, SourceError, SourceResult};
