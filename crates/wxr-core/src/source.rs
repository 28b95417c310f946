//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Loading of recorded weather documents."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ReplayError, Result};
use crate::series::{RawSample, RawValue, Series, WeatherDataset};

/// One named series inside a weather document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesDocument {
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub values: Vec<RawSample>,
}

/// Weather document with optional temperature (deci-Kelvin) and power (MW) series.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherDocument {
    #[serde(default)]
    pub temperature: Option<SeriesDocument>,
    #[serde(default)]
    pub power: Option<SeriesDocument>,
}

impl WeatherDocument {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty YAML file is an empty document, not an error.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Wide CSV with a `time` column and optional `temperature` and `power`
    /// columns. An empty cell means no sample for that series.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut temperature = Vec::new();
        let mut power = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            if let Some(value) = row.temperature {
                temperature.push(RawSample {
                    time: row.time.clone(),
                    value: Some(RawValue::Text(value)),
                });
            }
            if let Some(value) = row.power {
                power.push(RawSample {
                    time: row.time,
                    value: Some(RawValue::Text(value)),
                });
            }
        }
        Ok(Self {
            temperature: Some(SeriesDocument {
                unit: None,
                values: temperature,
            }),
            power: Some(SeriesDocument {
                unit: None,
                values: power,
            }),
        })
    }

    /// Coerce the raw records into lookup series.
    pub fn into_dataset(self) -> WeatherDataset {
        WeatherDataset::new(
            build_series("temperature", self.temperature),
            build_series("power", self.power),
        )
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    time: String,
    #[serde(default)]
    temperature: Option<String>,
    #[serde(default)]
    power: Option<String>,
}

fn build_series(name: &str, document: Option<SeriesDocument>) -> Series {
    let document = document.unwrap_or_default();
    Series::from_raw(name, document.values).with_unit(document.unit)
}

/// Load a weather document, choosing the format from the file extension.
pub fn load_path(path: &Path) -> Result<WeatherDataset> {
    let read = |path: &Path| {
        fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.display().to_string(),
            source,
        })
    };
    let document = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml") | Some("yaml") => WeatherDocument::from_yaml_str(&read(path)?)?,
        Some("json") => WeatherDocument::from_json_str(&read(path)?)?,
        Some("csv") => {
            let file = fs::File::open(path).map_err(|source| ReplayError::Read {
                path: path.display().to_string(),
                source,
            })?;
            WeatherDocument::from_csv_reader(file)?
        }
        _ => return Err(ReplayError::UnsupportedFormat(path.display().to_string())),
    };
    let dataset = document.into_dataset();
    info!(
        path = %path.display(),
        temperature_samples = dataset.temperature.len(),
        temperature_unit = dataset.temperature.unit().unwrap_or("unspecified"),
        power_samples = dataset.power.len(),
        power_unit = dataset.power.unit().unwrap_or("unspecified"),
        "weather source loaded"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxr_common::TimeOfDay;

    fn at(text: &str) -> TimeOfDay {
        text.parse().unwrap()
    }

    #[test]
    fn yaml_document_with_both_series() {
        let dataset = WeatherDocument::from_yaml_str(
            r#"
temperature:
  unit: dK
  values:
    - time: "10:00:00"
      value: 2981.5
    - time: "10:00:05"
      value: "2982.5"
power:
  unit: MW
  values:
    - time: "10:00:00"
      value: 10
"#,
        )
        .unwrap()
        .into_dataset();
        assert_eq!(dataset.temperature.unit(), Some("dK"));
        assert_eq!(dataset.temperature.value_at(&at("10:00:05")), Some(2982.5));
        assert_eq!(dataset.power.value_at(&at("10:00:00")), Some(10.0));
    }

    #[test]
    fn missing_power_series_is_empty() {
        let dataset = WeatherDocument::from_yaml_str(
            "temperature:\n  values:\n    - { time: \"10:00:00\", value: 2981.5 }\n",
        )
        .unwrap()
        .into_dataset();
        assert_eq!(dataset.temperature.len(), 1);
        assert!(dataset.power.is_empty());
    }

    #[test]
    fn empty_yaml_is_empty_dataset() {
        let dataset = WeatherDocument::from_yaml_str("  \n").unwrap().into_dataset();
        assert!(dataset.temperature.is_empty());
        assert!(dataset.power.is_empty());
    }

    #[test]
    fn json_document() {
        let dataset = WeatherDocument::from_json_str(
            r#"{"power": {"unit": "MW", "values": [{"time": "9:00:00", "value": "n/a"}]}}"#,
        )
        .unwrap()
        .into_dataset();
        assert_eq!(dataset.power.len(), 1);
        assert_eq!(dataset.power.value_at(&at("09:00:00")), None);
        assert!(dataset.temperature.is_empty());
    }

    #[test]
    fn csv_empty_cells_are_absent_samples() {
        let csv = "time,temperature,power\n10:00:00,2981.5,10\n10:00:05,,20\n10:00:10,2983,\n";
        let dataset = WeatherDocument::from_csv_reader(csv.as_bytes())
            .unwrap()
            .into_dataset();
        assert_eq!(dataset.temperature.len(), 2);
        assert_eq!(dataset.power.len(), 2);
        assert_eq!(dataset.temperature.value_at(&at("10:00:05")), None);
        assert_eq!(dataset.power.value_at(&at("10:00:05")), Some(20.0));
    }

    #[test]
    fn csv_without_power_column() {
        let csv = "time,temperature\n10:00:00,2981.5\n";
        let dataset = WeatherDocument::from_csv_reader(csv.as_bytes())
            .unwrap()
            .into_dataset();
        assert_eq!(dataset.temperature.len(), 1);
        assert!(dataset.power.is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_path(Path::new("weather.xml")).unwrap_err();
        assert!(matches!(err, ReplayError::UnsupportedFormat(_)));
    }
}
