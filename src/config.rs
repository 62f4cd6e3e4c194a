use crate::error::{QueryError, Result};
use crate::utils::constants::{
    DEFAULT_MEASUREMENTS_FILE, DEFAULT_READ_BATCH_SIZE, DEFAULT_STATIONS_DELIMITER,
    DEFAULT_STATIONS_FILE, ENV_PREFIX,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    pub measurements_path: PathBuf,
    pub stations_path: PathBuf,
    /// Row conversion threads; defaults to the number of CPUs
    pub max_workers: Option<usize>,
    pub use_mmap: bool,
    /// Single ASCII character separating station CSV fields
    pub stations_delimiter: char,
    /// Rows per record batch when measurements are a Parquet file
    pub read_batch_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Defaults, then the optional settings file, then `WEATHER_QUERY__*`
    /// environment variables (e.g. `WEATHER_QUERY__DATA__STATIONS_PATH`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// As [`Settings::load`], reading environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("data.measurements_path", DEFAULT_MEASUREMENTS_FILE)?
            .set_default("data.stations_path", DEFAULT_STATIONS_FILE)?
            .set_default("data.use_mmap", false)?
            .set_default("data.stations_delimiter", DEFAULT_STATIONS_DELIMITER.to_string())?
            .set_default("data.read_batch_size", DEFAULT_READ_BATCH_SIZE as u64)?
            .set_default("logging.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn max_workers(&self) -> usize {
        self.data.max_workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn stations_delimiter(&self) -> Result<u8> {
        let delimiter = self.data.stations_delimiter;
        u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                QueryError::Config(format!(
                    "Stations delimiter must be a single ASCII character, got '{}'",
                    delimiter
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() -> Result<()> {
        let settings = Settings::load_with_env(None, Some(HashMap::new()))?;

        assert_eq!(settings.data.measurements_path, PathBuf::from(DEFAULT_MEASUREMENTS_FILE));
        assert_eq!(settings.data.stations_path, PathBuf::from(DEFAULT_STATIONS_FILE));
        assert_eq!(settings.data.max_workers, None);
        assert!(!settings.data.use_mmap);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.log_file.is_none());
        assert!(settings.max_workers() >= 1);
        assert_eq!(settings.stations_delimiter()?, b',');
        assert_eq!(settings.data.read_batch_size, DEFAULT_READ_BATCH_SIZE);
        Ok(())
    }

    #[test]
    fn test_reader_options_from_env() -> Result<()> {
        let env = HashMap::from([
            ("WEATHER_QUERY__DATA__STATIONS_DELIMITER".to_string(), ";".to_string()),
            ("WEATHER_QUERY__DATA__READ_BATCH_SIZE".to_string(), "256".to_string()),
        ]);
        let settings = Settings::load_with_env(None, Some(env))?;

        assert_eq!(settings.stations_delimiter()?, b';');
        assert_eq!(settings.data.read_batch_size, 256);
        Ok(())
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() -> Result<()> {
        let mut settings = Settings::load_with_env(None, Some(HashMap::new()))?;
        settings.data.stations_delimiter = '§';

        assert!(matches!(settings.stations_delimiter(), Err(QueryError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_file_then_env_precedence() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            "[data]\nmeasurements_path = \"data/obs.parquet\"\nmax_workers = 3\n\n[logging]\nlevel = \"warn\""
        )?;
        file.flush()?;

        let env = HashMap::from([(
            "WEATHER_QUERY__LOGGING__LEVEL".to_string(),
            "debug".to_string(),
        )]);
        let settings = Settings::load_with_env(Some(file.path()), Some(env))?;

        assert_eq!(settings.data.measurements_path, PathBuf::from("data/obs.parquet"));
        assert_eq!(settings.data.stations_path, PathBuf::from(DEFAULT_STATIONS_FILE));
        assert_eq!(settings.max_workers(), 3);
        assert_eq!(settings.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn test_missing_settings_file() {
        let result = Settings::load_with_env(Some(Path::new("no/such/settings.toml")), Some(HashMap::new()));
        assert!(result.is_err());
    }
}
