pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod processors;
pub mod query;
pub mod readers;
pub mod store;
pub mod utils;
pub mod writers;

pub use error::{QueryError, Result};
pub use query::WeatherQueryEngine;
pub use store::{InMemoryStore, ObservationStore};
