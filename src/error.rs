use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Invalid date format: '{input}' (expected YYYYMMDD)")]
    InvalidDateFormat { input: String },

    #[error("Dataset contains no observations")]
    EmptyDataset,

    #[error("Duplicate observation for station {station_id} on {date}")]
    DuplicateObservation { station_id: String, date: NaiveDate },

    #[error("Date arithmetic out of range: {0}")]
    DateOutOfRange(NaiveDate),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl QueryError {
    /// Errors caused by caller input rather than by the dataset or the host.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::InvalidDateFormat { .. })
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_client_error() {
            2
        } else {
            1
        }
    }
}
