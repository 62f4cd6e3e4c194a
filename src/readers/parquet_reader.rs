use crate::error::{QueryError, Result};
use crate::models::Observation;
use crate::utils::constants::DEFAULT_READ_BATCH_SIZE;
use arrow::array::{Array, Date32Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Reads observations exported by [`crate::writers::ParquetWriter`].
/// Columns are looked up by name so column order does not matter.
pub struct ParquetObservationReader {
    batch_size: usize,
}

impl ParquetObservationReader {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_READ_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.batch_size)
            .build()?;

        let mut observations = Vec::new();
        for batch in reader {
            Self::append_batch(&batch?, &mut observations)?;
        }

        debug!(rows = observations.len(), path = %path.display(), "Read Parquet observations");
        Ok(observations)
    }

    fn append_batch(batch: &RecordBatch, out: &mut Vec<Observation>) -> Result<()> {
        let stations = column::<StringArray>(batch, "station")?;
        let dates = column::<Date32Array>(batch, "date")?;
        let precipitation = column::<Float64Array>(batch, "prcp")?;
        let temperature = column::<Float64Array>(batch, "tobs")?;

        out.reserve(batch.num_rows());
        for row in 0..batch.num_rows() {
            if stations.is_null(row) || dates.is_null(row) {
                return Err(QueryError::InvalidFormat(format!(
                    "Parquet row {} is missing station or date",
                    out.len()
                )));
            }

            let date = dates.value_as_date(row).ok_or_else(|| {
                QueryError::InvalidFormat(format!("Parquet row {} has an invalid date", out.len()))
            })?;

            out.push(Observation::new(
                stations.value(row),
                date,
                optional(precipitation, row),
                optional(temperature, row),
            ));
        }

        Ok(())
    }
}

impl Default for ParquetObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| QueryError::InvalidFormat(format!("Missing column '{}'", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| QueryError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn optional(array: &Float64Array, row: usize) -> Option<f64> {
    array.is_valid(row).then(|| array.value(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::ParquetWriter;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_back_exported_observations() -> Result<()> {
        let observations = vec![
            Observation::new(
                "USC00519397",
                NaiveDate::from_ymd_opt(2016, 2, 29).unwrap(),
                Some(0.08),
                None,
            ),
            Observation::new(
                "USC00513117",
                NaiveDate::from_ymd_opt(2017, 8, 23).unwrap(),
                None,
                Some(81.0),
            ),
        ];

        let temp_file = NamedTempFile::new()?;
        ParquetWriter::new().write_observations(&observations, temp_file.path())?;

        let read = ParquetObservationReader::new()
            .with_batch_size(1)
            .read_observations(temp_file.path())?;
        assert_eq!(read, observations);
        Ok(())
    }

    #[test]
    fn test_not_a_parquet_file() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        std::fs::write(temp_file.path(), b"station,date,prcp,tobs\n")?;

        let result = ParquetObservationReader::new().read_observations(temp_file.path());
        assert!(matches!(result, Err(QueryError::Parquet(_))));
        Ok(())
    }
}
