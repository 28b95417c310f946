//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Weather source loading integration tests."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use tempfile::Builder;
use wxr_common::TimeOfDay;
use wxr_core::{load_path, PlaybackEngine, ReplayError};
use wxr_rt::FixedClock;

fn at(text: &str) -> TimeOfDay {
    text.parse().expect("valid time")
}

fn write_fixture(suffix: &str, contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn yaml_fixture_replays_merged_timeline() -> Result<()> {
    let file = write_fixture(
        ".yml",
        r#"
temperature:
  unit: dK
  values:
    - time: "10:00:05"
      value: 2982.5
    - time: "10:00:00"
      value: 2981.5
power:
  unit: MW
  values:
    - time: "10:00:10"
      value: 36
"#,
    )?;
    let dataset = load_path(file.path())?;
    let mut engine =
        PlaybackEngine::new(dataset, Duration::from_secs(5), &FixedClock(at("00:00:00")))?;
    assert_eq!(
        engine.timeline().as_slice(),
        &[at("10:00:00"), at("10:00:05"), at("10:00:10")]
    );

    let mut records = Vec::new();
    while let Some(record) = engine.tick() {
        records.push(record);
    }
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].temperature, None);
    assert!((records[2].power.unwrap_or_default() - 50.0).abs() < 1e-9);
    assert!((records[2].cumulative_energy - 50.0).abs() < 1e-9);
    assert!((records[2].average_temperature.unwrap_or_default() - 25.05).abs() < 1e-9);
    Ok(())
}

#[test]
fn json_fixture_loads() -> Result<()> {
    let file = write_fixture(
        ".json",
        r#"{"temperature": {"values": [{"time": "07:00:00", "value": 2731.5}]}}"#,
    )?;
    let dataset = load_path(file.path())?;
    assert_eq!(dataset.temperature.value_at(&at("07:00:00")), Some(2731.5));
    assert!(dataset.power.is_empty());
    Ok(())
}

#[test]
fn csv_fixture_loads() -> Result<()> {
    let file = write_fixture(".csv", "time,temperature,power\n07:00:00,2731.5,\n07:00:05,,1\n")?;
    let dataset = load_path(file.path())?;
    assert_eq!(dataset.temperature.len(), 1);
    assert_eq!(dataset.power.value_at(&at("07:00:05")), Some(1.0));
    Ok(())
}

#[test]
fn missing_file_reports_its_path() {
    let err = load_path(std::path::Path::new("does/not/exist.yaml")).unwrap_err();
    assert!(matches!(err, ReplayError::Read { .. }));
    assert!(err.to_string().contains("does/not/exist.yaml"));
}

#[test]
fn malformed_yaml_is_an_error() -> Result<()> {
    let file = write_fixture(".yaml", "temperature: [unclosed")?;
    assert!(matches!(load_path(file.path()), Err(ReplayError::Yaml(_))));
    Ok(())
}

#[test]
fn bundled_sample_asset_loads() -> Result<()> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/data/data.yml");
    let dataset = load_path(&path)?;
    assert_eq!(dataset.temperature.len(), 288);
    assert_eq!(dataset.power.len(), 144);
    assert_eq!(dataset.temperature.unit(), Some("dK"));
    let engine = PlaybackEngine::new(dataset, Duration::from_secs(5), &FixedClock(at("12:02:30")))?;
    assert_eq!(engine.timeline().len(), 288);
    assert_eq!(engine.timeline().get(engine.cursor()), Some(at("12:05:00")));
    Ok(())
}
