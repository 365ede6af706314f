use std::time::{Duration, Instant};

/// Decides when a page's network has gone quiet, from successive counts of its resource timing
/// entries.
///
/// The network is quiet once the count has not changed for the whole window.
#[derive(Debug)]
pub(crate) struct QuietTracker {
    window: Duration,
    last_count: Option<u64>,
    stable_since: Instant,
}

impl QuietTracker {
    pub(crate) fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            last_count: None,
            stable_since: now,
        }
    }

    /// Record a count observed at `now`. Returns true once the network is quiet.
    pub(crate) fn observe(&mut self, count: u64, now: Instant) -> bool {
        if self.last_count != Some(count) {
            self.last_count = Some(count);
            self.stable_since = now;
            return false;
        }

        now.duration_since(self.stable_since) >= self.window
    }
}
