//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Replay engine module exports and shared types."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Replay of recorded temperature and power series as a simulated live feed.
//!
//! The two series are merged into one [`Timeline`], a start position is chosen
//! from the wall clock, and a [`PlaybackSession`] emits one unit-converted,
//! aggregated [`EmittedRecord`] per tick until the timeline is exhausted.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod series;
pub mod session;
pub mod source;
pub mod timeline;
pub mod units;

pub use aggregate::RunningAggregate;
pub use engine::{EmittedRecord, PlaybackEngine, PlaybackState};
pub use error::{ReplayError, Result};
pub use series::{RawSample, RawValue, Series, WeatherDataset};
pub use session::{PlaybackHandle, PlaybackSession, PlaybackStatus, SessionOutcome, SessionSummary};
pub use source::{load_path, WeatherDocument};
pub use timeline::Timeline;
pub use units::{power_to_energy_per_tick, temperature_to_celsius};
