//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the replay runtime."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the weather replay workspace.
//! This crate exposes configuration loading, logging, time-of-day handling and
//! tick timing utilities consumed across the workspace.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod time;

pub use config::{AppConfig, LoadedAppConfig, LoggingConfig, PlaybackConfig, SourceConfig};
pub use logging::{init_tracing, LogFormat};
pub use metrics::{JitterSummary, TickJitterReporter};
pub use time::{TimeOfDay, TimeOfDayParseError};
