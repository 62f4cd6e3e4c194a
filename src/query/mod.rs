pub mod dates;
pub mod engine;

pub use dates::{format_compact_date, format_iso_date, parse_compact_date, parse_iso_date};
pub use engine::WeatherQueryEngine;
