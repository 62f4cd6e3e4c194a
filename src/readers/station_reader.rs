use crate::error::{QueryError, Result};
use crate::models::Station;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Row of `hawaii_stations.csv`: `station,name,latitude,longitude,elevation`.
/// Extra columns such as a leading `id` are ignored.
#[derive(Debug, Deserialize)]
struct StationRow {
    station: String,
    name: String,
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
}

pub struct StationReader {
    delimiter: u8,
}

impl StationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read station metadata from a CSV file with a header row
    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let file = File::open(path)?;
        self.read_stations_from(file)
    }

    pub fn read_stations_from<R: Read>(&self, reader: R) -> Result<Vec<Station>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut stations = Vec::new();
        for row in csv_reader.deserialize::<StationRow>() {
            let row = row?;

            if row.station.is_empty() {
                return Err(QueryError::InvalidFormat(format!(
                    "Station row {} has an empty station id",
                    stations.len() + 1
                )));
            }

            stations.push(Station::new(
                row.station,
                row.name,
                row.latitude,
                row.longitude,
                row.elevation,
            ));
        }

        Ok(stations)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "station,name,latitude,longitude,elevation")?;
        writeln!(
            temp_file,
            "USC00519397,\"WAIKIKI 717.2, HI US\",21.2716,-157.8168,3.0"
        )?;
        writeln!(
            temp_file,
            "USC00513117,\"KANEOHE 838.1, HI US\",21.4234,-157.8015,14.6"
        )?;
        writeln!(temp_file, "USC00517948,\"PEARL CITY, HI US\",21.3934,-157.9751,")?;

        let reader = StationReader::new();
        let stations = reader.read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].station_id, "USC00519397");
        assert_eq!(stations[0].name, "WAIKIKI 717.2, HI US");
        assert!((stations[0].latitude - 21.2716).abs() < 1e-9);
        assert_eq!(stations[1].elevation, Some(14.6));
        assert_eq!(stations[2].elevation, None);

        Ok(())
    }

    #[test]
    fn test_extra_columns_ignored() -> Result<()> {
        let data = "id,station,name,latitude,longitude,elevation\n\
                    1,USC00519397,WAIKIKI,21.2716,-157.8168,3.0\n";

        let stations = StationReader::new().read_stations_from(data.as_bytes())?;
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].station_id, "USC00519397");
        Ok(())
    }

    #[test]
    fn test_custom_delimiter() -> Result<()> {
        let data = "station;name;latitude;longitude;elevation\n\
                    USC00519397;WAIKIKI, HI US;21.2716;-157.8168;3.0\n";

        let stations = StationReader::with_delimiter(b';').read_stations_from(data.as_bytes())?;
        assert_eq!(stations[0].name, "WAIKIKI, HI US");
        assert_eq!(stations[0].elevation, Some(3.0));
        Ok(())
    }

    #[test]
    fn test_malformed_latitude() {
        let data = "station,name,latitude,longitude,elevation\n\
                    USC00519397,WAIKIKI,north,-157.8168,3.0\n";

        let result = StationReader::new().read_stations_from(data.as_bytes());
        assert!(matches!(result, Err(QueryError::Csv(_))));
    }

    #[test]
    fn test_missing_station_file() {
        let result = StationReader::new().read_stations(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(QueryError::Io(_))));
    }
}
