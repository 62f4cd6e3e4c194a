use crate::error::{QueryError, Result};
use crate::models::Observation;
use crate::query::dates::parse_iso_date;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Row of `hawaii_measurements.csv`: `station,date,prcp,tobs`, dates as
/// `YYYY-MM-DD`. Empty numeric cells are unmeasured readings.
#[derive(Debug, Deserialize)]
struct ObservationRow {
    station: String,
    date: String,
    prcp: Option<f64>,
    tobs: Option<f64>,
}

pub struct ObservationReader {
    use_mmap: bool,
    max_workers: usize,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            use_mmap: false,
            max_workers: num_cpus::get(),
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Read every observation row from a CSV file with a header row
    pub fn read_observations(&self, path: &Path) -> Result<Vec<Observation>> {
        let file = File::open(path)?;

        if self.use_mmap {
            // The dataset files are treated as immutable while the process runs.
            let mmap = unsafe { Mmap::map(&file)? };
            self.read_observations_from(&mmap[..])
        } else {
            self.read_observations_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
        }
    }

    pub fn read_observations_from<R: Read>(&self, reader: R) -> Result<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        // CSV decoding is sequential; typed conversion fans out below.
        let mut rows = Vec::new();
        for result in csv_reader.deserialize::<ObservationRow>() {
            rows.push(result.map_err(Self::row_error)?);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| QueryError::Config(e.to_string()))?;

        let observations = pool.install(|| {
            rows.into_par_iter()
                .enumerate()
                .map(|(index, row)| Self::convert_row(index + 2, row))
                .collect::<Result<Vec<_>>>()
        })?;

        debug!(
            rows = observations.len(),
            workers = self.max_workers,
            "Read observations"
        );

        Ok(observations)
    }

    /// Unparseable cells (e.g. a `T` trace marker in `prcp`) become
    /// `InvalidFormat` naming the line; I/O and framing errors stay `Csv`.
    fn row_error(err: csv::Error) -> QueryError {
        match err.kind() {
            csv::ErrorKind::Deserialize { pos, err: cause } => {
                let line = pos.as_ref().map_or(0, |p| p.line());
                QueryError::InvalidFormat(format!("line {}: {}", line, cause))
            }
            _ => QueryError::Csv(err),
        }
    }

    /// `line` is the 1-based file line, counting the header.
    fn convert_row(line: usize, row: ObservationRow) -> Result<Observation> {
        if row.station.is_empty() {
            return Err(QueryError::InvalidFormat(format!(
                "line {}: empty station id",
                line
            )));
        }

        let date = parse_iso_date(&row.date).map_err(|_| {
            QueryError::InvalidFormat(format!("line {}: invalid date '{}'", line, row.date))
        })?;

        for (column, value) in [("prcp", row.prcp), ("tobs", row.tobs)] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(QueryError::InvalidFormat(format!(
                    "line {}: non-finite {} value",
                    line, column
                )));
            }
        }

        Ok(Observation::new(row.station, date, row.prcp, row.tobs))
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}
