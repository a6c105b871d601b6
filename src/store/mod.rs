//! Storage backend port and its InfluxDB adapter.
//!
//! The workflow talks to the database through the [`MeasurementStore`]
//! capability trait so tests can substitute an in-memory fake for the live
//! client.

pub mod flux;
pub mod influx;
pub mod line_protocol;

use async_trait::async_trait;
use chrono::Duration;

use crate::error::AppResult;
use crate::export::ExportRow;
use crate::measurement::MeasurementPoint;

pub use influx::InfluxClient;

/// Fixed export lookback window, in hours.
pub const EXPORT_WINDOW_HOURS: i64 = 24;

/// The trailing window queried by the export operation.
pub fn export_window() -> Duration {
    Duration::hours(EXPORT_WINDOW_HOURS)
}

/// Capability interface over the time-series backend: submit one point,
/// or project the trailing window into export rows (time descending).
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Submit one point; returns only once the backend acknowledged it.
    async fn write_point(&self, point: &MeasurementPoint) -> AppResult<()>;

    /// All points of the series within the trailing `lookback` window,
    /// sorted by time descending.
    async fn query_window(&self, lookback: Duration) -> AppResult<Vec<ExportRow>>;
}
