//! InfluxDB v2 line-protocol encoding.
//!
//! Produces one protocol line per point, decoupled from the HTTP transport.
//! Escaping follows the line-protocol rules: commas and spaces in the
//! measurement name; commas, equals signs, and spaces in tag values.

use chrono::{DateTime, Utc};

use crate::measurement::{MeasurementPoint, SERIES_NAME};

/// Encode one point as a line-protocol line with a nanosecond timestamp.
///
/// An empty `pipe_name` omits the tag entirely: the protocol cannot
/// represent an empty tag value, and an absent tag reads back as empty.
pub fn encode_point(point: &MeasurementPoint) -> String {
    let mut line = escape_measurement(SERIES_NAME);

    if !point.pipe_name.is_empty() {
        line.push_str(",pipe_name=");
        line.push_str(&escape_tag_value(&point.pipe_name));
    }

    line.push_str(&format!(
        " temperature={},pressure={} {}",
        point.temperature,
        point.pressure,
        timestamp_nanos(point.timestamp)
    ));

    line
}

fn timestamp_nanos(t: DateTime<Utc>) -> i64 {
    t.timestamp() * 1_000_000_000 + i64::from(t.timestamp_subsec_nanos())
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_tag_value(s: &str) -> String {
    s.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}
