/// Trailing window length, in calendar days, ending at the latest observation
pub const TRAILING_WINDOW_DAYS: u64 = 365;

/// Date formats
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const COMPACT_DATE_LEN: usize = 8;

/// Rendered in place of a missing stats end date
pub const END_DATE_NOT_PROVIDED: &str = "N/A";

/// Default dataset locations
pub const DEFAULT_MEASUREMENTS_FILE: &str = "Resources/hawaii_measurements.csv";
pub const DEFAULT_STATIONS_FILE: &str = "Resources/hawaii_stations.csv";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "WEATHER_QUERY";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_READ_BATCH_SIZE: usize = 8192;
pub const DEFAULT_STATIONS_DELIMITER: char = ',';

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

/// File extension selecting the Parquet observation reader
pub const PARQUET_EXTENSION: &str = "parquet";
