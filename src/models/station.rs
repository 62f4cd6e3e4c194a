use serde::{Deserialize, Serialize};
use validator::Validate;

/// Observing location. Only `station_id` is interpreted by the query engine;
/// the descriptive fields are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[validate(length(min = 1))]
    pub station_id: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: Option<f64>,
}

impl Station {
    pub fn new(
        station_id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation: Option<f64>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }
}
