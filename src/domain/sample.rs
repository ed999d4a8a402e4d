// Sensor sample model and CSV decoding
use csv::StringRecord;

use crate::domain::error::RouteDataError;

/// Column order produced by the datalogger firmware.
const COLUMN_NAMES: [&str; 5] = ["lat", "lon", "temperature", "vibration", "humidity"];

/// One time-indexed datalogger reading. Position in the parsed
/// sequence is the time axis; a sample has no other identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    pub temperature: f64,
    pub vibration: f64,
    pub humidity: f64,
}

impl Sample {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    fn from_record(record: &StringRecord, line: u64) -> Result<Self, RouteDataError> {
        if record.len() != COLUMN_NAMES.len() {
            return Err(RouteDataError::Parse {
                line,
                reason: format!(
                    "expected {} columns, found {}",
                    COLUMN_NAMES.len(),
                    record.len()
                ),
            });
        }

        let mut cells = [0.0_f64; 5];
        for (column, value) in cells.iter_mut().enumerate() {
            *value = numeric_cell(record, column, line)?;
        }

        Ok(Self {
            lat: cells[0],
            lon: cells[1],
            temperature: cells[2],
            vibration: cells[3],
            humidity: cells[4],
        })
    }
}

fn numeric_cell(record: &StringRecord, column: usize, line: u64) -> Result<f64, RouteDataError> {
    let raw = record.get(column).unwrap_or("");
    raw.parse::<f64>().map_err(|_| RouteDataError::Parse {
        line,
        reason: format!("non-numeric {} value '{}'", COLUMN_NAMES[column], raw),
    })
}

/// Decode a headerless CSV buffer into ordered samples.
///
/// Every row is data; no header is expected or skipped. Each row must
/// carry exactly five numeric columns in the order lat, lon,
/// temperature, vibration, humidity. Row order is preserved. Zero rows
/// decode to an empty vector; rejecting that happens downstream.
pub fn parse_samples(bytes: &[u8]) -> Result<Vec<Sample>, RouteDataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut samples = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index as u64 + 1;
        let record = record.map_err(|e| RouteDataError::Parse {
            line,
            reason: e.to_string(),
        })?;
        samples.push(Sample::from_record(&record, line)?);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_row_order() {
        let data = b"-23.5,-46.6,21.0,3.2,55.0\n-23.6,-46.7,21.5,9.1,54.0\n";
        let samples = parse_samples(data).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].lat, -23.5);
        assert_eq!(samples[0].vibration, 3.2);
        assert_eq!(samples[1].lon, -46.7);
        assert_eq!(samples[1].vibration, 9.1);
    }

    #[test]
    fn test_parse_tolerates_cell_padding() {
        let samples = parse_samples(b"0.0, 1.0, 20.0, 5.0, 50.0\n").unwrap();
        assert_eq!(samples[0].coordinates(), (0.0, 1.0));
        assert_eq!(samples[0].humidity, 50.0);
    }

    #[test]
    fn test_empty_input_is_a_valid_parse() {
        let samples = parse_samples(b"").unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_wrong_column_count_is_rejected() {
        let err = parse_samples(b"1.0,2.0,3.0,4.0\n").unwrap_err();
        match err {
            RouteDataError::Parse { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("expected 5 columns"), "reason: {reason}");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let data = b"1.0,2.0,20.0,5.0,50.0\n1.0,2.0,hot,5.0,50.0\n";
        let err = parse_samples(data).unwrap_err();
        match err {
            RouteDataError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("temperature"), "reason: {reason}");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_newline_adds_no_row() {
        let samples = parse_samples(b"1.0,2.0,3.0,4.0,5.0\n\n").unwrap();
        assert_eq!(samples.len(), 1);
    }
}
