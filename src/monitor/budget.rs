use std::time::Duration;

use tokio::time::Instant;

/// Processing time allowance per fixed window.
///
/// Pure: callers pass the clock in. A window opens on the first check after
/// the previous one ran out.
#[derive(Debug, Clone)]
pub struct RateBudget {
    limit: Duration,
    window: Duration,
    window_start: Option<Instant>,
    spent: Duration,
}

impl RateBudget {
    pub fn new(limit: Duration, window: Duration) -> Self {
        Self {
            limit,
            window,
            window_start: None,
            spent: Duration::ZERO,
        }
    }

    fn roll(&mut self, now: Instant) {
        let expired = self
            .window_start
            .is_none_or(|start| now.saturating_duration_since(start) >= self.window);
        if expired {
            self.window_start = Some(now);
            self.spent = Duration::ZERO;
        }
    }

    /// Whether the current window has nothing left.
    pub fn is_exhausted(&mut self, now: Instant) -> bool {
        self.roll(now);
        self.spent >= self.limit
    }

    /// Record `elapsed` of processing finished at `now`.
    pub fn charge(&mut self, now: Instant, elapsed: Duration) {
        self.roll(now);
        self.spent = self.spent.saturating_add(elapsed);
    }

    pub fn spent(&self) -> Duration {
        self.spent
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.spent)
    }
}
