pub mod dataset_loader;
pub mod observation_reader;
pub mod parquet_reader;
pub mod station_reader;

pub use dataset_loader::DatasetLoader;
pub use observation_reader::ObservationReader;
pub use parquet_reader::ParquetObservationReader;
pub use station_reader::StationReader;
