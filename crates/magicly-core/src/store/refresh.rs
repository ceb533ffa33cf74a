// ── Refresh scheduling state ──
//
// Pure decision logic for the background worker. Every method takes `now`
// so the state machine is testable without a clock.

use std::time::Duration;

use tokio::time::Instant;

/// Scheduler bookkeeping, owned by the adapter behind a mutex.
#[derive(Debug, Clone)]
pub struct RefreshState {
    next_eligible_fetch_at: Instant,
    fetch_in_flight: bool,
    device_stats_paused: bool,
    stats_valid_until: Instant,
    cooldown: Duration,
    inactivity_timeout: Duration,
}

impl RefreshState {
    /// Fresh state: a fetch is due immediately and the host counts as live.
    pub fn new(now: Instant, cooldown: Duration, inactivity_timeout: Duration) -> Self {
        Self {
            next_eligible_fetch_at: now,
            fetch_in_flight: false,
            device_stats_paused: false,
            stats_valid_until: now + inactivity_timeout,
            cooldown,
            inactivity_timeout,
        }
    }

    /// A host poll happened: extend the liveness window and lift any pause.
    pub fn record_poll(&mut self, now: Instant) {
        self.stats_valid_until = now + self.inactivity_timeout;
        self.device_stats_paused = false;
    }

    /// Decide whether to start a bulk fetch now; marks it in flight if so.
    pub fn decide(&mut self, now: Instant, has_targets: bool) -> bool {
        self.device_stats_paused = now > self.stats_valid_until;
        if self.device_stats_paused
            || self.fetch_in_flight
            || !has_targets
            || now < self.next_eligible_fetch_at
        {
            return false;
        }
        self.fetch_in_flight = true;
        true
    }

    /// A fetch ended (either way); start the cool-down.
    pub fn finish_fetch(&mut self, now: Instant) {
        self.fetch_in_flight = false;
        self.next_eligible_fetch_at = now + self.cooldown;
    }

    pub fn is_paused(&self) -> bool {
        self.device_stats_paused
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_in_flight
    }

    pub fn next_eligible_fetch_at(&self) -> Instant {
        self.next_eligible_fetch_at
    }
}
