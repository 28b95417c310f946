//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Running statistics maintained across playback ticks."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use serde::Serialize;

use crate::units::round_to;

/// Mean temperature and cumulative energy over one playback session.
///
/// Values are accumulated at full precision and rounded only when read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunningAggregate {
    sum_temperature: f64,
    count_temperature: u64,
    cumulative_energy: f64,
}

impl RunningAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick into the aggregate.
    ///
    /// Non-finite temperatures are skipped. Negative energy increments are not
    /// accumulated so the cumulative total never decreases.
    pub fn record(&mut self, temperature_c: Option<f64>, energy_kwh: Option<f64>) {
        if let Some(temperature) = temperature_c.filter(|t| t.is_finite()) {
            self.sum_temperature += temperature;
            self.count_temperature += 1;
        }
        if let Some(energy) = energy_kwh.filter(|e| e.is_finite() && *e > 0.0) {
            self.cumulative_energy += energy;
        }
    }

    /// Mean of the recorded temperatures, two decimals.
    pub fn average_temperature(&self) -> Option<f64> {
        (self.count_temperature > 0)
            .then(|| round_to(self.sum_temperature / self.count_temperature as f64, 2))
    }

    /// Cumulative energy in kWh, three decimals.
    pub fn cumulative_energy(&self) -> f64 {
        round_to(self.cumulative_energy, 3)
    }

    pub fn cumulative_energy_exact(&self) -> f64 {
        self.cumulative_energy
    }

    pub fn temperature_count(&self) -> u64 {
        self.count_temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_aggregate_has_no_average() {
        let aggregate = RunningAggregate::new();
        assert_eq!(aggregate.average_temperature(), None);
        assert_eq!(aggregate.cumulative_energy(), 0.0);
    }

    #[test]
    fn average_only_counts_present_temperatures() {
        let mut aggregate = RunningAggregate::new();
        aggregate.record(Some(25.0), None);
        aggregate.record(None, Some(1.0));
        aggregate.record(Some(25.1), None);
        aggregate.record(Some(f64::NAN), None);
        assert_eq!(aggregate.temperature_count(), 2);
        let average = aggregate.average_temperature().unwrap();
        assert!((average - 25.05).abs() < 1e-9);
    }

    #[test]
    fn energy_is_rounded_only_on_read() {
        let mut aggregate = RunningAggregate::new();
        for _ in 0..3 {
            aggregate.record(None, Some(0.0004));
        }
        assert!((aggregate.cumulative_energy_exact() - 0.0012).abs() < 1e-12);
        assert!((aggregate.cumulative_energy() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn negative_energy_does_not_decrease_total() {
        let mut aggregate = RunningAggregate::new();
        aggregate.record(None, Some(2.0));
        aggregate.record(None, Some(-5.0));
        assert_eq!(aggregate.cumulative_energy(), 2.0);
    }

    #[test]
    fn totals_are_monotonic_over_mixed_ticks() {
        let ticks = [
            (Some(10.0), Some(1.5)),
            (None, Some(0.25)),
            (Some(-3.0), None),
            (None, None),
            (Some(7.5), Some(-1.0)),
            (Some(f64::INFINITY), Some(f64::NAN)),
        ];
        let mut aggregate = RunningAggregate::new();
        let mut last_energy = aggregate.cumulative_energy_exact();
        let mut last_count = aggregate.temperature_count();
        for (temperature, energy) in ticks {
            aggregate.record(temperature, energy);
            assert!(aggregate.cumulative_energy_exact() >= last_energy);
            assert!(aggregate.temperature_count() >= last_count);
            last_energy = aggregate.cumulative_energy_exact();
            last_count = aggregate.temperature_count();
        }
        assert_eq!(aggregate.temperature_count(), 3);
    }
}
