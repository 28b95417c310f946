//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Unit conversions for replayed weather samples."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Conversions from the encoded source units to the published ones.
//!
//! Temperatures arrive in deci-Kelvin and are published in degrees Celsius.
//! Power arrives in megawatts and is published as the energy, in kilowatt-hours,
//! delivered over one tick with the sample held constant for the whole tick.

use std::time::Duration;

pub const KELVIN_OFFSET: f64 = 273.15;
const DECI_KELVIN_PER_KELVIN: f64 = 10.0;
const KW_PER_MW: f64 = 1000.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Round half away from zero to `decimals` places. Values too large to scale
/// pass through unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Deci-Kelvin to degrees Celsius, two decimals.
pub fn temperature_to_celsius(raw: f64) -> f64 {
    round_to(raw / DECI_KELVIN_PER_KELVIN - KELVIN_OFFSET, 2)
}

/// Megawatts held for `tick` to kilowatt-hours, six decimals.
pub fn power_to_energy_per_tick(power_mw: f64, tick: Duration) -> f64 {
    let hours = tick.as_secs_f64() / SECONDS_PER_HOUR;
    round_to(power_mw * KW_PER_MW * hours, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn deci_kelvin_to_celsius() {
        assert!(close(temperature_to_celsius(2981.5), 25.0));
        assert!(close(temperature_to_celsius(2982.5), 25.1));
        assert!(close(temperature_to_celsius(2731.5), 0.0));
        assert!(close(temperature_to_celsius(0.0), -273.15));
    }

    #[test]
    fn celsius_is_rounded_to_two_decimals() {
        assert!(close(temperature_to_celsius(2981.57), 25.01));
    }

    #[test]
    fn one_megawatt_over_five_seconds() {
        let energy = power_to_energy_per_tick(1.0, Duration::from_secs(5));
        assert!(close(energy, 1.388889));
    }

    #[test]
    fn energy_scales_with_tick_interval() {
        assert!(close(
            power_to_energy_per_tick(72.0, Duration::from_secs(5)),
            100.0
        ));
        assert!(close(
            power_to_energy_per_tick(72.0, Duration::from_millis(2500)),
            50.0
        ));
        assert!(close(
            power_to_energy_per_tick(3.6, Duration::from_secs(1)),
            1.0
        ));
    }

    #[test]
    fn zero_power_gives_zero_energy() {
        assert_eq!(power_to_energy_per_tick(0.0, Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn round_to_handles_negative_values() {
        assert!(close(round_to(-1.005_1, 2), -1.01));
        assert!(close(round_to(41.666_667, 3), 41.667));
    }

    #[test]
    fn huge_values_are_not_rounded_to_infinity() {
        assert_eq!(round_to(1e303, 6), 1e303);
        let energy = power_to_energy_per_tick(1e303, Duration::from_secs(5));
        assert!(energy.is_finite());
        assert!(close(energy / 1e303, 5000.0 / 3600.0));
    }
}
