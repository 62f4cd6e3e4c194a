use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One station-day reading. At most one exists per `(station_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    #[validate(length(min = 1))]
    pub station_id: String,

    pub date: NaiveDate,

    #[validate(range(min = 0.0))]
    pub precipitation: Option<f64>,

    pub temperature: Option<f64>,
}

impl Observation {
    pub fn new(
        station_id: impl Into<String>,
        date: NaiveDate,
        precipitation: Option<f64>,
        temperature: Option<f64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            date,
            precipitation,
            temperature,
        }
    }

    pub fn has_precipitation(&self) -> bool {
        self.precipitation.is_some()
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }

    /// Store ordering key: chronological first, then by station.
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.date, self.station_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_observation_validation() {
        let obs = Observation::new("USC00519397", date(2017, 8, 23), Some(0.08), Some(81.0));
        assert!(obs.validate().is_ok());
        assert!(obs.has_precipitation());
        assert!(obs.has_temperature());
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let obs = Observation::new("USC00519397", date(2017, 8, 23), Some(-0.1), Some(81.0));
        assert!(obs.validate().is_err());
    }

    #[test]
    fn test_missing_readings_are_valid() {
        let obs = Observation::new("USC00519397", date(2017, 8, 23), None, None);
        assert!(obs.validate().is_ok());
        assert!(!obs.has_precipitation());
        assert!(!obs.has_temperature());
    }

    #[test]
    fn test_sort_key_orders_by_date_then_station() {
        let a = Observation::new("B", date(2017, 1, 1), None, None);
        let b = Observation::new("A", date(2017, 1, 2), None, None);
        let c = Observation::new("A", date(2017, 1, 1), None, None);
        assert!(a.sort_key() < b.sort_key());
        assert!(c.sort_key() < a.sort_key());
    }
}
