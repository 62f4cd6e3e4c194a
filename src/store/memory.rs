use crate::error::{QueryError, Result};
use crate::models::{Observation, Station};
use crate::store::ObservationStore;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Immutable snapshot of both tables, loaded once at startup.
///
/// Observations are kept sorted by `(date, station_id)` so range queries are
/// two binary searches. The snapshot is never mutated after construction and
/// is shared behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    stations: Vec<Station>,
    observations: Vec<Observation>,
}

impl InMemoryStore {
    pub fn new(stations: Vec<Station>, mut observations: Vec<Observation>) -> Result<Self> {
        observations.par_sort_unstable_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        if let Some(pair) = observations
            .windows(2)
            .find(|pair| pair[0].sort_key() == pair[1].sort_key())
        {
            return Err(QueryError::DuplicateObservation {
                station_id: pair[1].station_id.clone(),
                date: pair[1].date,
            });
        }

        debug!(
            stations = stations.len(),
            observations = observations.len(),
            "Built in-memory observation store"
        );

        Ok(Self {
            stations,
            observations,
        })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    fn range_slice(&self, start: NaiveDate, end: Option<NaiveDate>) -> &[Observation] {
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = match end {
            Some(end) => self.observations.partition_point(|o| o.date <= end),
            None => self.observations.len(),
        };

        if hi <= lo {
            &[]
        } else {
            &self.observations[lo..hi]
        }
    }
}

impl ObservationStore for InMemoryStore {
    fn all_observations(&self) -> Result<Vec<Observation>> {
        Ok(self.observations.clone())
    }

    fn observations_in_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>> {
        Ok(self.range_slice(start, end).to_vec())
    }

    fn all_stations(&self) -> Result<Vec<Station>> {
        Ok(self.stations.clone())
    }

    fn observation_counts_by_station(&self) -> Result<HashMap<String, usize>> {
        let counts = self
            .observations
            .par_iter()
            .fold(HashMap::new, |mut acc: HashMap<String, usize>, obs| {
                *acc.entry(obs.station_id.clone()).or_insert(0) += 1;
                acc
            })
            .reduce(HashMap::new, |mut merged, partial| {
                for (station_id, count) in partial {
                    *merged.entry(station_id).or_insert(0) += count;
                }
                merged
            });

        Ok(counts)
    }

    fn latest_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.observations.last().map(|o| o.date))
    }
}
