//! # pipelog
//!
//! A small desktop form for logging manually read pipe measurements
//! (temperature and pressure) into an InfluxDB 2.x bucket, with a one-click
//! CSV export of the last 24 hours.
//!
//! ## Crate Structure
//!
//! - **`config`**: figment-based configuration (TOML file + `PIPELOG_`
//!   environment overrides) with post-load validation.
//! - **`error`**: the central `PipelogError` enum; input validation and
//!   backend failures are the two operator-visible kinds.
//! - **`measurement`**: the `MeasurementPoint` record and its fallible
//!   construction from raw form text.
//! - **`store`**: the `MeasurementStore` capability trait plus the InfluxDB
//!   adapter (line-protocol writes, Flux queries over HTTP).
//! - **`export`**: the 24-hour export projection and its CSV serialization.
//! - **`gui`**: the eframe/egui form, status line, and operator dialogs.

pub mod config;
pub mod error;
pub mod export;
pub mod gui;
pub mod measurement;
pub mod store;

pub use error::{AppResult, PipelogError};
