//! Enforced idle time between extraction runs.

use std::sync::Mutex;

use tokio::time::{sleep, Duration, Instant};
use tracing::info;

use leadscout_common::SearchProgress;

use crate::traits::SearchObserver;

/// Minimum idle interval between whole extraction runs. Protects the
/// free-tier upstream quota.
pub const COOLDOWN: Duration = Duration::from_secs(5);

/// Gate that spaces out extraction runs. Holds the instant the previous
/// run ended; `acquire` sleeps out whatever is left of the cooldown.
///
/// The timestamp is written by dropping the returned [`CooldownSlot`],
/// so it is updated exactly once per run no matter how the run ends.
pub struct CooldownGate {
    last_run_end: Mutex<Option<Instant>>,
    cooldown: Duration,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::with_cooldown(COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            last_run_end: Mutex::new(None),
            cooldown,
        }
    }

    /// Wait until the cooldown since the previous run has elapsed, then
    /// claim a slot for a new run. Callers that have to wait get a
    /// progress message naming the remaining seconds.
    pub async fn acquire(&self, observer: &dyn SearchObserver) -> CooldownSlot<'_> {
        let wait = {
            let last = self.last_run_end.lock().expect("cooldown gate lock poisoned");
            match *last {
                Some(end) => self.cooldown.saturating_sub(end.elapsed()),
                None => Duration::ZERO,
            }
        };

        if !wait.is_zero() {
            let seconds = wait.as_secs_f64().ceil() as u64;
            info!(wait_secs = seconds, "Cooldown active, delaying run");
            observer.on_progress(&SearchProgress {
                percentage: 0,
                message: format!(
                    "To stay within the free usage quota, please wait {seconds} seconds before starting a new search."
                ),
            });
            sleep(wait).await;
        }

        CooldownSlot { gate: self }
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII marker for a running extraction. Dropping it stamps the gate
/// with the run-end instant, on success and failure paths alike.
pub struct CooldownSlot<'a> {
    gate: &'a CooldownGate,
}

impl Drop for CooldownSlot<'_> {
    fn drop(&mut self) {
        let mut last = self
            .gate
            .last_run_end
            .lock()
            .expect("cooldown gate lock poisoned");
        *last = Some(Instant::now());
    }
}
