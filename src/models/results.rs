use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::utils::constants::END_DATE_NOT_PROVIDED;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationReading {
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureReading {
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
}

/// Min/avg/max temperature over a date range. The three aggregates are
/// either all present or all absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub start_date: NaiveDate,

    #[serde(serialize_with = "serialize_end_date")]
    pub end_date: Option<NaiveDate>,

    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl TemperatureStats {
    pub fn empty(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
            min_temp: None,
            avg_temp: None,
            max_temp: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_temp.is_none()
    }

    pub fn summary(&self) -> String {
        let end = self
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| END_DATE_NOT_PROVIDED.to_string());

        match (self.min_temp, self.avg_temp, self.max_temp) {
            (Some(min), Some(avg), Some(max)) => format!(
                "{} to {}: min={:.1}, avg={:.1}, max={:.1}",
                self.start_date, end, min, avg, max
            ),
            _ => format!("{} to {}: no temperature observations", self.start_date, end),
        }
    }
}

/// Overview of the loaded dataset, as reported by the `info` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub stations: usize,
    pub observations: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub trailing_window_start: Option<NaiveDate>,
    pub most_active_station: Option<String>,
    pub most_active_observations: Option<usize>,
}

fn serialize_end_date<S>(end_date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match end_date {
        Some(date) => serializer.collect_str(date),
        None => serializer.serialize_str(END_DATE_NOT_PROVIDED),
    }
}
