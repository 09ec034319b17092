use std::sync::atomic::{AtomicU8, Ordering};

use leadscout_common::SearchProgress;

use crate::traits::SearchObserver;

/// Funnels progress to the observer while clamping percentages, so the
/// sequence a caller sees never decreases no matter what order batches
/// finish (or pause) in.
pub(crate) struct ProgressReporter<'a> {
    observer: &'a dyn SearchObserver,
    last: AtomicU8,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(observer: &'a dyn SearchObserver) -> Self {
        Self {
            observer,
            last: AtomicU8::new(0),
        }
    }

    pub fn report(&self, percentage: u8, message: impl Into<String>) {
        let capped = percentage.min(100);
        let previous = self.last.fetch_max(capped, Ordering::SeqCst);
        self.observer.on_progress(&SearchProgress {
            percentage: previous.max(capped),
            message: message.into(),
        });
    }

    /// Last percentage emitted; used to re-report status messages
    /// (e.g. rate-limit pauses) without moving the needle.
    pub fn current(&self) -> u8 {
        self.last.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recorder(Mutex<Vec<u8>>);

    impl SearchObserver for Recorder {
        fn on_progress(&self, progress: &SearchProgress) {
            self.0.lock().unwrap().push(progress.percentage);
        }
    }

    #[test]
    fn percentages_never_decrease() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        let reporter = ProgressReporter::new(&recorder);
        reporter.report(5, "a");
        reporter.report(53, "b");
        reporter.report(10, "late batch message");
        reporter.report(100, "d");
        assert_eq!(*recorder.0.lock().unwrap(), vec![5, 53, 53, 100]);
    }

    #[test]
    fn values_above_100_are_capped() {
        let recorder = Recorder(Mutex::new(Vec::new()));
        let reporter = ProgressReporter::new(&recorder);
        reporter.report(150, "overshoot");
        assert_eq!(*recorder.0.lock().unwrap(), vec![100]);
    }
}
