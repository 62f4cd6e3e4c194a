pub mod json_writer;
pub mod parquet_writer;

pub use json_writer::JsonWriter;
pub use parquet_writer::{observation_schema, ParquetFileInfo, ParquetWriter};
