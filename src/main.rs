//! Desktop entry point: load configuration, build the backend client, and
//! hand control to eframe.

use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use pipelog::config::AppConfig;
use pipelog::gui::PipelogApp;
use pipelog::store::InfluxClient;
use pipelog::PipelogError;

fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().map_err(PipelogError::Configuration)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.application.log_level)),
        )
        .init();

    tracing::info!(
        url = %config.influx.url,
        bucket = %config.influx.bucket,
        "starting pipelog"
    );

    // One client serves both the write and the query path for the lifetime
    // of the process.
    let store = Arc::new(InfluxClient::new(&config.influx)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 320.0])
            .with_min_inner_size([360.0, 280.0])
            .with_title(config.application.name.clone()),
        ..Default::default()
    };

    eframe::run_native(
        &config.application.name,
        options,
        Box::new(move |cc| Ok(Box::new(PipelogApp::new(cc, store, runtime)))),
    )
    .map_err(|err| anyhow::anyhow!("eframe error: {err}"))
}
