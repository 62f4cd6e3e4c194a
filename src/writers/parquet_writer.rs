use crate::error::{QueryError, Result};
use crate::models::Observation;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_CHUNK_SIZE, DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Arrow schema of the exported observations table. Readings are nullable.
pub fn observation_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("station", DataType::Utf8, false),
        Field::new("date", DataType::Date32, false),
        Field::new("prcp", DataType::Float64, true),
        Field::new("tobs", DataType::Float64, true),
    ]))
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
    batch_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            batch_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(QueryError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Write observations to a Parquet file in record batches. An empty
    /// slice still produces a valid file with the schema and no rows.
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        let schema = observation_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in observations.chunks(self.batch_size) {
            let batch = Self::observations_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;

        info!(
            rows = observations.len(),
            path = %path.display(),
            "Wrote observations to Parquet"
        );
        Ok(())
    }

    fn observations_to_batch(
        observations: &[Observation],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let stations: StringArray = observations
            .iter()
            .map(|o| Some(o.station_id.as_str()))
            .collect();
        let dates: Date32Array = observations
            .iter()
            .map(|o| Some(Date32Type::from_naive_date(o.date)))
            .collect();
        let precipitation: Float64Array = observations.iter().map(|o| o.precipitation).collect();
        let temperature: Float64Array = observations.iter().map(|o| o.temperature).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(stations),
            Arc::new(dates),
            Arc::new(precipitation),
            Arc::new(temperature),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups,
            row_group_sizes,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.row_groups as f64
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows
        )
    }
}
