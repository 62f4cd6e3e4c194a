use crate::error::{QueryError, Result};
use crate::models::{PrecipitationReading, TemperatureReading, TemperatureStats};
use crate::query::dates::{parse_compact_date, trailing_window_start};
use crate::store::ObservationStore;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Aggregate queries over a read-only observation store.
///
/// The engine keeps no per-call state. Every operation re-reads the store, so
/// one instance can be shared (or cheaply cloned) across concurrent callers.
pub struct WeatherQueryEngine<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for WeatherQueryEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ObservationStore + ?Sized> WeatherQueryEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Latest observation date in the dataset. Trailing windows are anchored
    /// here rather than on the wall clock.
    pub fn most_recent_date(&self) -> Result<NaiveDate> {
        self.store.latest_date()?.ok_or(QueryError::EmptyDataset)
    }

    /// `(start, end)` of the inclusive trailing window.
    pub fn trailing_window(&self) -> Result<(NaiveDate, NaiveDate)> {
        let end = self.most_recent_date()?;
        let start = trailing_window_start(end)?;
        Ok((start, end))
    }

    /// Precipitation for every observation in the trailing window, ascending
    /// by date. Unmeasured days stay in the series as `None`.
    pub fn trailing_precipitation(&self) -> Result<Vec<PrecipitationReading>> {
        let (start, end) = self.trailing_window()?;

        let mut observations = self.store.observations_in_range(start, Some(end))?;
        observations.sort_by_key(|o| o.date);

        debug!(%start, %end, rows = observations.len(), "Trailing precipitation");

        Ok(observations
            .into_iter()
            .map(|o| PrecipitationReading {
                date: o.date,
                precipitation: o.precipitation,
            })
            .collect())
    }

    /// Station identifiers in store order, duplicates removed.
    pub fn list_stations(&self) -> Result<Vec<String>> {
        let stations = self.store.all_stations()?;
        let mut seen = HashSet::with_capacity(stations.len());

        Ok(stations
            .into_iter()
            .filter_map(|s| seen.insert(s.station_id.clone()).then_some(s.station_id))
            .collect())
    }

    /// Station with the most observation rows, with its row count. Ties go to
    /// the lexicographically smallest station id.
    pub fn most_active_station(&self) -> Result<(String, usize)> {
        let counts = self.store.observation_counts_by_station()?;

        counts
            .into_iter()
            .max_by(|(a_id, a_count), (b_id, b_count)| {
                a_count.cmp(b_count).then_with(|| b_id.cmp(a_id))
            })
            .ok_or(QueryError::EmptyDataset)
    }

    /// Temperatures recorded by the most active station from the start of the
    /// trailing window onwards, ascending by date.
    ///
    /// Only the lower bound is applied. With the window anchored on the latest
    /// observation this selects the same rows as a closed window.
    pub fn trailing_temperatures_for_most_active_station(
        &self,
    ) -> Result<Vec<TemperatureReading>> {
        let (station_id, count) = self.most_active_station()?;
        let start = trailing_window_start(self.most_recent_date()?)?;

        let mut observations: Vec<_> = self
            .store
            .observations_in_range(start, None)?
            .into_iter()
            .filter(|o| o.station_id == station_id)
            .collect();
        observations.sort_by_key(|o| o.date);

        debug!(
            station = %station_id,
            total_observations = count,
            %start,
            rows = observations.len(),
            "Most active station temperatures"
        );

        Ok(observations
            .into_iter()
            .map(|o| TemperatureReading {
                date: o.date,
                temperature: o.temperature,
            })
            .collect())
    }

    /// Min/avg/max temperature over `start..=end` (or everything from `start`
    /// when `end` is `None`). Missing temperatures are skipped; an empty
    /// selection, including `end < start`, yields all-`None` aggregates.
    pub fn temperature_stats(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<TemperatureStats> {
        let observations = self.store.observations_in_range(start, end)?;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;

        for temp in observations.iter().filter_map(|o| o.temperature) {
            min = min.min(temp);
            max = max.max(temp);
            sum += temp;
            count += 1;
        }

        debug!(%start, end = ?end, rows = observations.len(), temperatures = count, "Temperature stats");

        if count == 0 {
            return Ok(TemperatureStats::empty(start, end));
        }

        // Summation rounding can nudge the mean just past an extreme.
        let avg = (sum / count as f64).clamp(min, max);

        Ok(TemperatureStats {
            start_date: start,
            end_date: end,
            min_temp: Some(min),
            avg_temp: Some(avg),
            max_temp: Some(max),
        })
    }

    /// [`Self::temperature_stats`] for compact `YYYYMMDD` inputs. Both dates
    /// are parsed before the store is touched.
    pub fn temperature_stats_from_strings(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats> {
        let start = parse_compact_date(start)?;
        let end = end.map(parse_compact_date).transpose()?;
        self.temperature_stats(start, end)
    }
}
