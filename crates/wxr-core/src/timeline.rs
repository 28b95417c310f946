//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Merged playback timeline and start index resolution."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::collections::BTreeSet;

use wxr_common::TimeOfDay;

use crate::series::Series;

/// Strictly increasing union of the timestamps of every replayed series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    times: Vec<TimeOfDay>,
}

impl Timeline {
    /// Merge the timestamps of `series`, deduplicated and in chronological order.
    pub fn merge<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = &'a Series>,
    {
        let times: BTreeSet<TimeOfDay> = series
            .into_iter()
            .flat_map(|s| s.times().copied())
            .collect();
        Self {
            times: times.into_iter().collect(),
        }
    }

    /// Index of the first timestamp at or after `now`, compared at whole-second
    /// resolution so a sample stamped with the current second is not skipped.
    ///
    /// When `now` is past every timestamp the last index is returned so playback
    /// resumes at the final sample; an empty timeline yields `0`.
    pub fn start_index(&self, now: TimeOfDay) -> usize {
        let now = now.truncate_to_second();
        let index = self.times.partition_point(|time| *time < now);
        if index < self.times.len() {
            index
        } else {
            self.times.len().saturating_sub(1)
        }
    }

    pub fn get(&self, index: usize) -> Option<TimeOfDay> {
        self.times.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> Option<TimeOfDay> {
        self.times.first().copied()
    }

    pub fn last(&self) -> Option<TimeOfDay> {
        self.times.last().copied()
    }

    pub fn as_slice(&self) -> &[TimeOfDay] {
        &self.times
    }
}
