use std::time::{Duration, Instant};

/// Quiescence window before a settled viewport is acted on
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

/// Coalesces bursts of events into the last one, once things go quiet
///
/// Time is passed in by the caller; the debouncer owns no timer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Debouncer {
            window,
            pending: None,
        }
    }

    /// Records `value`, replacing anything still pending and restarting the window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Returns the pending value once `window` has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.window => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops any pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_QUIESCENCE)
    }
}
