//! CSV export of the trailing measurement window.
//!
//! Rows are a read-only projection of stored points, sorted by time
//! descending, serialized as comma-separated UTF-8 with operator-facing
//! (localized) column labels and no index column.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::AppResult;

/// Operator-facing header labels, in column order
/// {time, pipe_name, temperature, pressure}.
pub const EXPORT_HEADERS: [&str; 4] = ["Время", "Труба", "Температура (°C)", "Давление (бар)"];

/// One exported row: a projection of a stored point over the lookback
/// window. Transient; exists only for the duration of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    /// Stored point timestamp (UTC).
    pub time: DateTime<Utc>,
    /// Pipe label; empty when the point was written without one.
    pub pipe_name: String,
    /// Temperature in °C.
    pub temperature: f64,
    /// Pressure in bar.
    pub pressure: f64,
}

/// Serialize rows to `path` as comma-separated UTF-8 with the localized
/// header row. The caller is responsible for never invoking this with an
/// empty row set; an empty slice still produces a header-only file.
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[ExportRow]) -> AppResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(EXPORT_HEADERS)?;

    for row in rows {
        writer.write_record(&[
            row.time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            row.pipe_name.clone(),
            row.temperature.to_string(),
            row.pressure.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                time: Utc.with_ymd_and_hms(2026, 8, 6, 12, 30, 0).unwrap(),
                pipe_name: "Line-A".to_string(),
                temperature: 85.5,
                pressure: 12.3,
            },
            ExportRow {
                time: Utc.with_ymd_and_hms(2026, 8, 6, 9, 15, 0).unwrap(),
                pipe_name: "Труба №7".to_string(),
                temperature: -3.25,
                pressure: 0.5,
            },
        ]
    }

    #[test]
    fn writes_localized_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        write_csv(&path, &sample_rows()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Время,Труба,Температура (°C),Давление (бар)"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2026-08-06T12:30:00Z,Line-A,85.5,12.3"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2026-08-06T09:15:00Z,Труба №7,-3.25,0.5"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_pipe_name_round_trips_as_empty_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        let rows = vec![ExportRow {
            time: Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap(),
            pipe_name: String::new(),
            temperature: 1.0,
            pressure: 2.0,
        }];
        write_csv(&path, &rows).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.lines().nth(1).unwrap().starts_with("2026-08-06T12:00:00Z,,1,2"));
    }

    #[test]
    fn file_is_valid_utf8_with_non_ascii_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");

        write_csv(&path, &sample_rows()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let contents = String::from_utf8(bytes).unwrap();
        assert!(contents.contains("Температура (°C)"));
        assert!(contents.contains("Труба №7"));
    }
}
