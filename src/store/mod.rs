//! Read-only access to the observation and station tables.

pub mod memory;

pub use memory::InMemoryStore;

use crate::error::Result;
use crate::models::{Observation, Station};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Query interface the engine depends on. Implementations are shared across
/// concurrent callers, so every method takes `&self` and any per-call
/// resource (connection, cursor) must be acquired and released inside the call.
pub trait ObservationStore: Send + Sync {
    fn all_observations(&self) -> Result<Vec<Observation>>;

    /// Observations with `start <= date`, and `date <= end` when an end is
    /// given, ordered ascending by date.
    fn observations_in_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<Vec<Observation>>;

    fn all_stations(&self) -> Result<Vec<Station>>;

    fn observation_counts_by_station(&self) -> Result<HashMap<String, usize>>;

    /// Latest observation date, `None` when there are no observations.
    fn latest_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.all_observations()?.iter().map(|o| o.date).max())
    }
}
