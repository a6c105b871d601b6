//! Flux query construction and annotated-CSV result parsing.
//!
//! The query pivots the stored field rows into one column per field keyed by
//! timestamp, keeps only the exported columns, and sorts by time descending.
//! The CSV response is parsed by header name; Flux emits one header block
//! per result table (the pipe tag is part of the group key), so the body is
//! split into blocks and the collected rows are re-sorted to keep the
//! descending order total.

use chrono::{DateTime, Duration, Utc};

use crate::error::{AppResult, PipelogError};
use crate::export::ExportRow;
use crate::measurement::SERIES_NAME;

/// Build the export query for all points of the series within the trailing
/// `lookback` window.
pub fn window_query(bucket: &str, lookback: Duration) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: -{hours}h)
  |> filter(fn: (r) => r._measurement == "{series}")
  |> pivot(rowKey:["_time"], columnKey: ["_field"], valueColumn: "_value")
  |> keep(columns: ["_time", "pipe_name", "temperature", "pressure"])
  |> sort(columns: ["_time"], desc: true)
"#,
        bucket = escape_string_literal(bucket),
        hours = lookback.num_hours(),
        series = SERIES_NAME,
    )
}

fn escape_string_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse an annotated-CSV query response into export rows, time descending.
///
/// An empty body is an empty result. Rows missing one of the pivoted value
/// columns are skipped; they cannot form a complete export row.
pub fn parse_query_response(body: &str) -> AppResult<Vec<ExportRow>> {
    let normalized = body.replace("\r\n", "\n");
    let mut rows = Vec::new();

    for block in normalized.split("\n\n") {
        let block = block.trim();
        if !block.is_empty() {
            parse_table_block(block, &mut rows)?;
        }
    }

    rows.sort_by(|a, b| b.time.cmp(&a.time));
    Ok(rows)
}

fn parse_table_block(block: &str, rows: &mut Vec<ExportRow>) -> AppResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(block.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let (Some(time_col), Some(temperature_col), Some(pressure_col)) =
        (column("_time"), column("temperature"), column("pressure"))
    else {
        // A block without the pivoted columns carries no exportable rows.
        return Ok(());
    };
    let pipe_col = column("pipe_name");

    for record in reader.records() {
        let record = record?;

        let Some(time_raw) = record.get(time_col).filter(|v| !v.is_empty()) else {
            continue;
        };
        let time = DateTime::parse_from_rfc3339(time_raw)
            .map_err(|e| PipelogError::Backend(format!("unexpected _time value {time_raw:?}: {e}")))?
            .with_timezone(&Utc);

        let Some(temperature) = parse_field(&record, temperature_col) else {
            continue;
        };
        let Some(pressure) = parse_field(&record, pressure_col) else {
            continue;
        };

        let pipe_name = pipe_col
            .and_then(|col| record.get(col))
            .unwrap_or_default()
            .to_string();

        rows.push(ExportRow {
            time,
            pipe_name,
            temperature,
            pressure,
        });
    }

    Ok(())
}

fn parse_field(record: &csv::StringRecord, col: usize) -> Option<f64> {
    record.get(col).and_then(|v| v.parse::<f64>().ok())
}
