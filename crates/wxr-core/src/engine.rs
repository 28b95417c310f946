//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Tick-by-tick playback of a merged weather timeline."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wxr_common::config::PlaybackConfig;
use wxr_common::TimeOfDay;
use wxr_rt::{Clock, FixedClock, SystemClock};

use crate::aggregate::RunningAggregate;
use crate::error::{ReplayError, Result};
use crate::series::{Series, WeatherDataset};
use crate::timeline::Timeline;
use crate::units::{power_to_energy_per_tick, temperature_to_celsius};

/// Lifecycle of one playback engine. `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Idle,
    Running,
    Finished,
}

/// Record published once per tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedRecord {
    pub time: TimeOfDay,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Energy delivered during this tick, kWh.
    pub power: Option<f64>,
    pub average_temperature: Option<f64>,
    /// Total energy since playback started, kWh.
    pub cumulative_energy: f64,
}

/// Replays a [`WeatherDataset`] one timeline entry per tick.
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    timeline: Timeline,
    temperature: Series,
    power: Series,
    tick_interval: Duration,
    cursor: usize,
    aggregate: RunningAggregate,
    state: PlaybackState,
}

impl PlaybackEngine {
    /// Build the timeline and place the cursor at the entry aligned to `clock`.
    pub fn new(dataset: WeatherDataset, tick_interval: Duration, clock: &dyn Clock) -> Result<Self> {
        if tick_interval.is_zero() {
            return Err(ReplayError::InvalidTickInterval);
        }
        let WeatherDataset { temperature, power } = dataset;
        let timeline = Timeline::merge([&temperature, &power]);
        let now = clock.time_of_day();
        let cursor = timeline.start_index(now);
        info!(
            timeline_len = timeline.len(),
            first = ?timeline.first(),
            last = ?timeline.last(),
            aligned_to = %now,
            cursor,
            tick_interval_ms = tick_interval.as_millis() as u64,
            "playback engine initialised"
        );
        Ok(Self {
            timeline,
            temperature,
            power,
            tick_interval,
            cursor,
            aggregate: RunningAggregate::new(),
            state: PlaybackState::Idle,
        })
    }

    /// Build an engine from configuration, aligning to `start_at` when set and
    /// to the local wall clock otherwise.
    pub fn from_config(dataset: WeatherDataset, config: &PlaybackConfig) -> Result<Self> {
        match config.start_at {
            Some(start_at) => Self::new(dataset, config.tick_interval, &FixedClock(start_at)),
            None => Self::new(dataset, config.tick_interval, &SystemClock),
        }
    }

    /// Advance playback by one tick.
    ///
    /// Returns `None` once the timeline is exhausted; the engine is then
    /// `Finished` and stays so.
    pub fn tick(&mut self) -> Option<EmittedRecord> {
        if self.state == PlaybackState::Finished {
            return None;
        }
        let Some(time) = self.timeline.get(self.cursor) else {
            self.state = PlaybackState::Finished;
            info!(
                cursor = self.cursor,
                average_temperature = ?self.aggregate.average_temperature(),
                cumulative_energy = self.aggregate.cumulative_energy(),
                "playback finished"
            );
            return None;
        };
        if self.state == PlaybackState::Idle {
            debug!(cursor = self.cursor, "playback running");
            self.state = PlaybackState::Running;
        }

        let temperature = self.temperature.value_at(&time).map(temperature_to_celsius);
        let power = self
            .power
            .value_at(&time)
            .map(|mw| power_to_energy_per_tick(mw, self.tick_interval));
        self.aggregate.record(temperature, power);

        let record = EmittedRecord {
            time,
            temperature,
            power,
            average_temperature: self.aggregate.average_temperature(),
            cumulative_energy: self.aggregate.cumulative_energy(),
        };
        self.cursor += 1;
        debug!(
            %time,
            cursor = self.cursor,
            temperature = ?record.temperature,
            power = ?record.power,
            cumulative_energy = record.cumulative_energy,
            "playback tick"
        );
        Some(record)
    }

    /// Stop playback early. The engine becomes `Finished` and emits nothing further.
    pub fn halt(&mut self) {
        if self.state != PlaybackState::Finished {
            debug!(cursor = self.cursor, "playback halted");
            self.state = PlaybackState::Finished;
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn aggregate(&self) -> &RunningAggregate {
        &self.aggregate
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Number of records still to be emitted.
    pub fn remaining(&self) -> usize {
        self.timeline.len().saturating_sub(self.cursor)
    }
}
