//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Recorded sample series keyed by time of day."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::{debug, warn};
use wxr_common::TimeOfDay;

/// A sample value as it appears in a source document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Unsupported(IgnoredAny),
}

impl RawValue {
    /// Numeric value, or `None` when the input is not a finite number.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            RawValue::Unsupported(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

/// One `{time, value}` record from a source document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    pub time: String,
    #[serde(default)]
    pub value: Option<RawValue>,
}

impl RawSample {
    pub fn new(time: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            time: time.into(),
            value: Some(value.into()),
        }
    }
}

/// Samples of one physical quantity indexed by time of day.
///
/// A timestamp whose value failed to coerce is still part of the series (it
/// contributes to the timeline) but has no value. When a timestamp repeats,
/// the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct Series {
    name: String,
    unit: Option<String>,
    samples: IndexMap<TimeOfDay, Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            samples: IndexMap::new(),
        }
    }

    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit;
        self
    }

    /// Build a series from raw records. Records with an unreadable time are dropped.
    pub fn from_raw<I>(name: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = RawSample>,
    {
        let mut series = Self::new(name);
        for record in records {
            let Ok(time) = record.time.parse::<TimeOfDay>() else {
                warn!(series = %series.name, time = %record.time, "dropping sample with invalid time");
                continue;
            };
            let value = record.value.as_ref().and_then(RawValue::as_finite);
            if value.is_none() {
                debug!(series = %series.name, %time, raw = ?record.value, "sample value is not numeric; treating as absent");
            }
            series.insert(time, value);
        }
        series
    }

    /// Insert a sample unless the timestamp is already present.
    pub fn insert(&mut self, time: TimeOfDay, value: Option<f64>) {
        self.samples.entry(time).or_insert(value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Exact-match lookup; `None` when absent or not numeric.
    pub fn value_at(&self, time: &TimeOfDay) -> Option<f64> {
        self.samples.get(time).copied().flatten()
    }

    pub fn times(&self) -> impl Iterator<Item = &TimeOfDay> + '_ {
        self.samples.keys()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The two series replayed together.
#[derive(Debug, Clone)]
pub struct WeatherDataset {
    pub temperature: Series,
    pub power: Series,
}

impl WeatherDataset {
    pub fn new(temperature: Series, power: Series) -> Self {
        Self { temperature, power }
    }
}

impl Default for WeatherDataset {
    fn default() -> Self {
        Self {
            temperature: Series::new("temperature"),
            power: Series::new("power"),
        }
    }
}
