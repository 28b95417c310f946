//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the replay runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;

use crate::time::duration_to_micros;

/// Absolute deviations of observed tick periods from the target period.
#[derive(Debug, Default)]
pub struct JitterHistogram {
    samples_us: Mutex<Vec<u64>>,
}

impl JitterHistogram {
    pub fn record(&self, jitter: Duration) {
        self.samples_us.lock().push(duration_to_micros(jitter));
    }

    pub fn summary(&self) -> Option<JitterSummary> {
        let samples = self.samples_us.lock();
        if samples.is_empty() {
            return None;
        }
        let count = samples.len() as f64;
        let mean = samples.iter().map(|v| *v as f64).sum::<f64>() / count;
        Some(JitterSummary {
            mean_us: mean,
            max_us: samples.iter().copied().max().unwrap_or_default(),
            min_us: samples.iter().copied().min().unwrap_or_default(),
            samples: samples.len() as u64,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JitterSummary {
    pub mean_us: f64,
    pub max_us: u64,
    pub min_us: u64,
    pub samples: u64,
}

/// Measures the spacing of consecutive ticks against the configured interval.
#[derive(Debug)]
pub struct TickJitterReporter {
    target_interval: Duration,
    last_tick: Mutex<Option<Instant>>,
    histogram: JitterHistogram,
}

impl TickJitterReporter {
    pub fn new(target_interval: Duration) -> Self {
        Self {
            target_interval,
            last_tick: Mutex::new(None),
            histogram: JitterHistogram::default(),
        }
    }

    /// Record a tick fired at `at`. The first tick only seeds the reference point.
    pub fn record_tick(&self, at: Instant) {
        let mut last_tick = self.last_tick.lock();
        if let Some(previous) = *last_tick {
            let actual = at.saturating_duration_since(previous);
            let jitter = if actual > self.target_interval {
                actual - self.target_interval
            } else {
                self.target_interval - actual
            };
            self.histogram.record(jitter);
        }
        *last_tick = Some(at);
    }

    pub fn summary(&self) -> Option<JitterSummary> {
        self.histogram.summary()
    }
}
