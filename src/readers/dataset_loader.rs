use crate::error::Result;
use crate::models::Observation;
use crate::readers::{ObservationReader, ParquetObservationReader, StationReader};
use crate::store::InMemoryStore;
use crate::utils::constants::{DEFAULT_READ_BATCH_SIZE, PARQUET_EXTENSION};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Loads the station and observation tables concurrently and freezes them
/// into an [`InMemoryStore`].
pub struct DatasetLoader {
    measurements_path: PathBuf,
    stations_path: PathBuf,
    max_workers: usize,
    use_mmap: bool,
    stations_delimiter: u8,
    read_batch_size: usize,
}

impl DatasetLoader {
    pub fn new(measurements_path: impl Into<PathBuf>, stations_path: impl Into<PathBuf>) -> Self {
        Self {
            measurements_path: measurements_path.into(),
            stations_path: stations_path.into(),
            max_workers: num_cpus::get(),
            use_mmap: false,
            stations_delimiter: b',',
            read_batch_size: DEFAULT_READ_BATCH_SIZE,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_stations_delimiter(mut self, delimiter: u8) -> Self {
        self.stations_delimiter = delimiter;
        self
    }

    /// Record batch size used when the measurements file is Parquet
    pub fn with_read_batch_size(mut self, batch_size: usize) -> Self {
        self.read_batch_size = batch_size;
        self
    }

    pub fn measurements_path(&self) -> &Path {
        &self.measurements_path
    }

    pub fn stations_path(&self) -> &Path {
        &self.stations_path
    }

    pub async fn load(&self) -> Result<InMemoryStore> {
        let started = Instant::now();

        let stations_path = self.stations_path.clone();
        let delimiter = self.stations_delimiter;
        let stations_handle = tokio::task::spawn_blocking(move || {
            StationReader::with_delimiter(delimiter).read_stations(&stations_path)
        });

        let measurements_path = self.measurements_path.clone();
        let max_workers = self.max_workers;
        let use_mmap = self.use_mmap;
        let batch_size = self.read_batch_size;
        let observations_handle = tokio::task::spawn_blocking(move || {
            read_observations(&measurements_path, max_workers, use_mmap, batch_size)
        });

        let (stations, observations) = tokio::try_join!(stations_handle, observations_handle)?;
        let store = InMemoryStore::new(stations?, observations?)?;

        info!(
            stations = store.station_count(),
            observations = store.observation_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset loaded"
        );

        Ok(store)
    }
}

fn read_observations(
    path: &Path,
    max_workers: usize,
    use_mmap: bool,
    batch_size: usize,
) -> Result<Vec<Observation>> {
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PARQUET_EXTENSION));

    if is_parquet {
        ParquetObservationReader::new()
            .with_batch_size(batch_size)
            .read_observations(path)
    } else {
        ObservationReader::new()
            .with_max_workers(max_workers)
            .with_mmap(use_mmap)
            .read_observations(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::writers::ParquetWriter;
    use tempfile::TempDir;

    const STATIONS: &str = "station,name,latitude,longitude,elevation\n\
        USC00519397,WAIKIKI,21.2716,-157.8168,3.0\n\
        USC00513117,KANEOHE,21.4234,-157.8015,14.6\n";

    const MEASUREMENTS: &str = "station,date,prcp,tobs\n\
        USC00519397,2017-08-22,0.0,82\n\
        USC00519397,2017-08-23,0.08,81\n\
        USC00513117,2017-08-23,,76\n";

    fn write_fixture(dir: &TempDir) -> Result<(PathBuf, PathBuf)> {
        let stations = dir.path().join("stations.csv");
        let measurements = dir.path().join("measurements.csv");
        std::fs::write(&stations, STATIONS)?;
        std::fs::write(&measurements, MEASUREMENTS)?;
        Ok((measurements, stations))
    }

    #[tokio::test]
    async fn test_load_csv_dataset() -> Result<()> {
        let dir = TempDir::new()?;
        let (measurements, stations) = write_fixture(&dir)?;

        let store = DatasetLoader::new(&measurements, &stations)
            .with_max_workers(2)
            .load()
            .await?;

        assert_eq!(store.station_count(), 2);
        assert_eq!(store.observation_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_parquet_measurements() -> Result<()> {
        let dir = TempDir::new()?;
        let (measurements, stations) = write_fixture(&dir)?;
        let csv_store = DatasetLoader::new(&measurements, &stations).load().await?;

        let parquet_path = dir.path().join("measurements.PARQUET");
        ParquetWriter::new().write_observations(csv_store.observations(), &parquet_path)?;

        let parquet_store = DatasetLoader::new(&parquet_path, &stations).load().await?;
        assert_eq!(parquet_store.observations(), csv_store.observations());
        Ok(())
    }

    #[tokio::test]
    async fn test_reader_options_applied() -> Result<()> {
        let dir = TempDir::new()?;
        let (measurements, stations) = write_fixture(&dir)?;
        let csv_store = DatasetLoader::new(&measurements, &stations).load().await?;

        let semicolon_stations = dir.path().join("stations_semicolon.csv");
        std::fs::write(&semicolon_stations, STATIONS.replace(',', ";"))?;
        let parquet_path = dir.path().join("measurements.parquet");
        ParquetWriter::new().write_observations(csv_store.observations(), &parquet_path)?;

        let store = DatasetLoader::new(&parquet_path, &semicolon_stations)
            .with_stations_delimiter(b';')
            .with_read_batch_size(1)
            .load()
            .await?;

        assert_eq!(store.stations(), csv_store.stations());
        assert_eq!(store.observations(), csv_store.observations());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_fails() -> Result<()> {
        let dir = TempDir::new()?;
        let (_, stations) = write_fixture(&dir)?;

        let result = DatasetLoader::new(dir.path().join("absent.csv"), &stations)
            .load()
            .await;
        assert!(matches!(result, Err(QueryError::Io(_))));
        Ok(())
    }
}
