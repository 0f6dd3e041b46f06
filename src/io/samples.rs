//! Calibration sample ingest (CSV or inline durations).
//!
//! CSV schema: a header row containing `x` and `elapsed_ms` (any order, extra
//! columns ignored). Rows that fail to parse are skipped and reported.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::Sample;
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed samples plus skipped rows.
#[derive(Debug, Clone, Default)]
pub struct SampleIngest {
    pub samples: Vec<Sample>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn load_samples_csv(path: &Path) -> Result<SampleIngest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_samples_csv(file)
}

pub fn read_samples_csv<R: Read>(reader: R) -> Result<SampleIngest, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_col = column(&header_map, "x")?;
    let elapsed_col = column(&header_map, "elapsed_ms")?;

    let mut out = SampleIngest::default();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        out.rows_read += 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, x_col, elapsed_col) {
            Ok(sample) => out.samples.push(sample),
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    Ok(out)
}

/// Build samples from inline durations: the i-th duration is `x = i + 1`.
pub fn samples_from_durations(elapsed_ms: &[f64]) -> Vec<Sample> {
    elapsed_ms
        .iter()
        .enumerate()
        .map(|(i, &e)| Sample::new(i as u32 + 1, e))
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required CSV column '{name}'.")))
}

fn parse_row(record: &StringRecord, x_col: usize, elapsed_col: usize) -> Result<Sample, String> {
    let x_raw = record.get(x_col).unwrap_or("");
    let x: u32 = x_raw
        .parse()
        .map_err(|_| format!("invalid x '{x_raw}'"))?;

    let e_raw = record.get(elapsed_col).unwrap_or("");
    let elapsed_ms: f64 = e_raw
        .parse()
        .map_err(|_| format!("invalid elapsed_ms '{e_raw}'"))?;
    if !elapsed_ms.is_finite() {
        return Err(format!("non-finite elapsed_ms '{e_raw}'"));
    }

    Ok(Sample::new(x, elapsed_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_samples_in_any_column_order() {
        let csv = "note,elapsed_ms,x\nfirst,4100,1\nsecond, 2300 ,2\n";
        let ingest = read_samples_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.rows_read, 2);
        assert_eq!(
            ingest.samples,
            vec![Sample::new(1, 4100.0), Sample::new(2, 2300.0)]
        );
        assert!(ingest.row_errors.is_empty());
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let csv = "x,elapsed_ms\n1,4000\ntwo,3000\n3,inf\n4,1500\n";
        let ingest = read_samples_csv(csv.as_bytes()).unwrap();
        assert_eq!(ingest.samples.len(), 2);
        assert_eq!(ingest.row_errors.len(), 2);
        assert_eq!(ingest.row_errors[0].line, 3);
        assert_eq!(ingest.row_errors[1].line, 4);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let err = read_samples_csv("x,ms\n1,2\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn inline_durations_number_from_one() {
        let s = samples_from_durations(&[900.0, 700.0]);
        assert_eq!(s, vec![Sample::new(1, 900.0), Sample::new(2, 700.0)]);
    }
}
