//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Runtime helpers supporting the playback engine."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use wxr_common::TimeOfDay;

/// Source of the wall-clock time used to align playback start.
pub trait Clock: Send + Sync {
    fn time_of_day(&self) -> TimeOfDay;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::now_local()
    }
}

/// Always reports the same instant. Used for start-time overrides and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeOfDay);

impl Clock for FixedClock {
    fn time_of_day(&self) -> TimeOfDay {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn time_of_day(&self) -> TimeOfDay {
        (**self).time_of_day()
    }
}
