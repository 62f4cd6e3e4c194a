use crate::models::{Observation, Station};
use crate::store::InMemoryStore;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use validator::Validate;

#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub total_stations: usize,
    pub total_observations: usize,
    pub missing_precipitation: usize,
    pub missing_temperature: usize,
    pub observations_per_station: HashMap<String, usize>,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub station_id: String,
    pub date: Option<NaiveDate>,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    InvalidStation,
    DuplicateStation,
    InvalidObservation,
    UnknownStation,
}

/// Reports data problems without rejecting the dataset; queries pass
/// readings through as stored.
pub struct IntegrityChecker {
    max_listed: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self { max_listed: 10 }
    }

    pub fn with_max_listed(max_listed: usize) -> Self {
        Self { max_listed }
    }

    pub fn check_store(&self, store: &InMemoryStore) -> IntegrityReport {
        self.check(store.stations(), store.observations())
    }

    pub fn check(&self, stations: &[Station], observations: &[Observation]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_stations: stations.len(),
            total_observations: observations.len(),
            ..Default::default()
        };

        let mut known = HashSet::with_capacity(stations.len());
        for station in stations {
            if let Err(e) = station.validate() {
                report.violations.push(Violation {
                    station_id: station.station_id.clone(),
                    date: None,
                    violation_type: ViolationType::InvalidStation,
                    details: e.to_string(),
                });
            }

            if !known.insert(station.station_id.as_str()) {
                report.violations.push(Violation {
                    station_id: station.station_id.clone(),
                    date: None,
                    violation_type: ViolationType::DuplicateStation,
                    details: "station listed more than once".to_string(),
                });
            }
        }

        for obs in observations {
            *report
                .observations_per_station
                .entry(obs.station_id.clone())
                .or_insert(0) += 1;

            if !obs.has_precipitation() {
                report.missing_precipitation += 1;
            }
            if !obs.has_temperature() {
                report.missing_temperature += 1;
            }

            if let Err(e) = obs.validate() {
                report.violations.push(Violation {
                    station_id: obs.station_id.clone(),
                    date: Some(obs.date),
                    violation_type: ViolationType::InvalidObservation,
                    details: e.to_string(),
                });
            }
        }

        // Observations whose station has no metadata row, reported once each.
        let mut unknown: Vec<_> = report
            .observations_per_station
            .iter()
            .filter(|(id, _)| !known.contains(id.as_str()))
            .collect();
        unknown.sort();
        for (station_id, count) in unknown {
            report.violations.push(Violation {
                station_id: station_id.clone(),
                date: None,
                violation_type: ViolationType::UnknownStation,
                details: format!("{} observations reference an unknown station", count),
            });
        }

        report
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let percent = |n: usize| {
            if report.total_observations == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_observations as f64
            }
        };

        let mut summary = String::new();
        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Stations: {}\n", report.total_stations));
        summary.push_str(&format!("Observations: {}\n", report.total_observations));
        summary.push_str(&format!(
            "Missing Precipitation: {} ({:.1}%)\n",
            report.missing_precipitation,
            percent(report.missing_precipitation)
        ));
        summary.push_str(&format!(
            "Missing Temperature: {} ({:.1}%)\n",
            report.missing_temperature,
            percent(report.missing_temperature)
        ));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str(&format!("\nFirst {} Violations:\n", self.max_listed));
            for (i, violation) in report.violations.iter().take(self.max_listed).enumerate() {
                let when = violation
                    .date
                    .map(|d| format!(" on {}", d))
                    .unwrap_or_default();
                summary.push_str(&format!(
                    "  {}. Station {}{}: {:?} - {}\n",
                    i + 1,
                    violation.station_id,
                    when,
                    violation.violation_type,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
