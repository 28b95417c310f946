//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Runtime helpers supporting the playback engine."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Tick scheduling and wall-clock helpers for the replay runtime.

pub mod clock;
pub mod scheduling;

pub use clock::{Clock, FixedClock, SystemClock};
pub use scheduling::RateLimiter;
