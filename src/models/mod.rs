pub mod observation;
pub mod results;
pub mod station;

pub use observation::Observation;
pub use results::{DatasetSummary, PrecipitationReading, TemperatureReading, TemperatureStats};
pub use station::Station;
