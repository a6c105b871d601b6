//! The measurement record captured from the input form.

use chrono::{DateTime, Utc};

use crate::error::{AppResult, PipelogError};

/// Series (measurement) name under which all points are stored.
pub const SERIES_NAME: &str = "pipe_measurements";

/// One timestamped, tagged, two-field record destined for the time-series
/// database: the pipe identifier as a tag and temperature/pressure as float
/// fields.
///
/// Immutable once constructed; the capture instant is taken at construction
/// time in UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPoint {
    /// Pipe label. Any text, including the empty string.
    pub pipe_name: String,
    /// Temperature in °C. Always finite.
    pub temperature: f64,
    /// Pressure in bar. Always finite.
    pub pressure: f64,
    /// Capture instant (UTC).
    pub timestamp: DateTime<Utc>,
}

impl MeasurementPoint {
    /// Build a point from the three raw form fields, stamping it with the
    /// current instant.
    ///
    /// The numeric fields must parse as finite floats; anything else is a
    /// validation error and no point is produced.
    pub fn from_input(pipe_name: &str, temperature: &str, pressure: &str) -> AppResult<Self> {
        let temperature = parse_finite(temperature)?;
        let pressure = parse_finite(pressure)?;

        Ok(Self {
            pipe_name: pipe_name.to_owned(),
            temperature,
            pressure,
            timestamp: Utc::now(),
        })
    }
}

fn parse_finite(raw: &str) -> AppResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PipelogError::InvalidNumber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_input_produces_exact_point() {
        let point = MeasurementPoint::from_input("Line-A", "85.5", "12.3").unwrap();
        assert_eq!(point.pipe_name, "Line-A");
        assert_eq!(point.temperature, 85.5);
        assert_eq!(point.pressure, 12.3);
    }

    #[test]
    fn pipe_name_is_kept_verbatim_including_empty() {
        let point = MeasurementPoint::from_input("", "1.0", "2.0").unwrap();
        assert_eq!(point.pipe_name, "");

        let point = MeasurementPoint::from_input("  Труба №7  ", "1.0", "2.0").unwrap();
        assert_eq!(point.pipe_name, "  Труба №7  ");
    }

    #[test]
    fn surrounding_whitespace_in_numbers_is_accepted() {
        let point = MeasurementPoint::from_input("Line-A", " 85.5 ", "\t12.3").unwrap();
        assert_eq!(point.temperature, 85.5);
        assert_eq!(point.pressure, 12.3);
    }

    #[test]
    fn non_numeric_temperature_is_rejected() {
        let result = MeasurementPoint::from_input("Line-B", "hot", "12.3");
        assert!(matches!(result, Err(PipelogError::InvalidNumber)));
    }

    #[test]
    fn comma_decimal_separator_is_rejected() {
        let result = MeasurementPoint::from_input("Line-A", "12,5", "1.0");
        assert!(matches!(result, Err(PipelogError::InvalidNumber)));
    }

    #[test]
    fn empty_numeric_field_is_rejected() {
        let result = MeasurementPoint::from_input("Line-A", "", "1.0");
        assert!(matches!(result, Err(PipelogError::InvalidNumber)));
        let result = MeasurementPoint::from_input("Line-A", "1.0", "");
        assert!(matches!(result, Err(PipelogError::InvalidNumber)));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for raw in ["NaN", "inf", "-inf", "infinity"] {
            let result = MeasurementPoint::from_input("Line-A", raw, "1.0");
            assert!(matches!(result, Err(PipelogError::InvalidNumber)), "{raw}");
        }
    }

    #[test]
    fn timestamp_is_close_to_now() {
        let before = Utc::now();
        let point = MeasurementPoint::from_input("Line-A", "1.0", "2.0").unwrap();
        let after = Utc::now();
        assert!(point.timestamp >= before && point.timestamp <= after);
    }
}
