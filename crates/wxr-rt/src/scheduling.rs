//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Runtime helpers supporting the playback engine."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};

/// Fixed-period async ticker. The first tick completes immediately; a late
/// tick pushes the following ones back instead of bursting to catch up.
#[derive(Debug)]
pub struct RateLimiter {
    period: Duration,
    interval: tokio::time::Interval,
}

impl RateLimiter {
    /// Panics if `period` is zero, as `tokio::time::interval` does.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { period, interval }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_is_immediate_then_periodic() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(Duration::from_secs(5));
        let first = limiter.tick().await;
        assert_eq!(first.duration_since(start), Duration::ZERO);
        let second = limiter.tick().await;
        assert_eq!(second.duration_since(first), Duration::from_secs(5));
        assert_eq!(limiter.period(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn late_ticks_are_delayed_not_bursted() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.tick().await;
        tokio::time::advance(Duration::from_millis(3500)).await;
        limiter.tick().await;
        let resumed_at = Instant::now();
        let next = limiter.tick().await;
        assert_eq!(next.duration_since(resumed_at), Duration::from_secs(1));
    }
}
