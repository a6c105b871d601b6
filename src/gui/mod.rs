//! The eframe/egui implementation of the input form.
//!
//! The form owns no business logic: each action trigger hands the raw field
//! values to the measurement/store layer and reflects the outcome in the
//! status line and operator toasts. Backend calls run on the app-owned tokio
//! runtime; results come back over an mpsc channel drained once per frame,
//! so the interaction thread never blocks on the network.
//!
//! A `busy` flag keeps at most one write-or-export operation in flight, so
//! status updates land in completion order, and the input fields clear only
//! after backend acknowledgment, never speculatively.

mod status;

use std::sync::Arc;

use eframe::egui;
use egui_notify::Toasts;
use tokio::sync::mpsc;

use crate::error::PipelogError;
use crate::export::{self, ExportRow};
use crate::measurement::MeasurementPoint;
use crate::store::{export_window, MeasurementStore};

pub use status::{StatusLevel, StatusLine};

/// Outcome of a backend operation, delivered from a spawned task.
enum BackendResponse {
    WriteDone(Result<(), PipelogError>),
    QueryDone(Result<Vec<ExportRow>, PipelogError>),
}

/// Main application state.
pub struct PipelogApp {
    store: Arc<dyn MeasurementStore>,

    /// Tokio runtime for backend operations
    runtime: tokio::runtime::Runtime,

    /// Raw form fields
    pipe_name_input: String,
    temperature_input: String,
    pressure_input: String,

    /// True while a write or export operation is in flight; both action
    /// buttons are disabled until the response arrives.
    busy: bool,

    status: StatusLine,
    toasts: Toasts,

    /// Channel for backend operation results
    response_tx: mpsc::Sender<BackendResponse>,
    response_rx: mpsc::Receiver<BackendResponse>,
}

impl PipelogApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        store: Arc<dyn MeasurementStore>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let (response_tx, response_rx) = mpsc::channel(4);

        Self {
            store,
            runtime,
            pipe_name_input: String::new(),
            temperature_input: String::new(),
            pressure_input: String::new(),
            busy: false,
            status: StatusLine::new(),
            toasts: Toasts::default(),
            response_tx,
            response_rx,
        }
    }

    /// Parse the form and submit one point. Validation failures are
    /// reported without touching the fields or the backend.
    fn record_measurement(&mut self) {
        let point = match MeasurementPoint::from_input(
            &self.pipe_name_input,
            &self.temperature_input,
            &self.pressure_input,
        ) {
            Ok(point) => point,
            Err(err) => {
                tracing::warn!(%err, "measurement input rejected");
                self.toasts.error(err.to_string());
                return;
            }
        };

        self.busy = true;
        let store = self.store.clone();
        let tx = self.response_tx.clone();
        self.runtime.spawn(async move {
            let result = store.write_point(&point).await;
            let _ = tx.send(BackendResponse::WriteDone(result)).await;
        });
    }

    /// Query the trailing window; the rest of the export continues in
    /// `finish_export` once the rows arrive.
    fn start_export(&mut self) {
        self.busy = true;
        let store = self.store.clone();
        let tx = self.response_tx.clone();
        self.runtime.spawn(async move {
            let result = store.query_window(export_window()).await;
            let _ = tx.send(BackendResponse::QueryDone(result)).await;
        });
    }

    /// Prompt for a destination and serialize the rows. Cancelling the
    /// dialog is a no-op.
    fn finish_export(&mut self, rows: Vec<ExportRow>) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("pipe_measurements.csv")
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .save_file()
        else {
            tracing::debug!("export cancelled by operator");
            return;
        };

        match export::write_csv(&path, &rows) {
            Ok(()) => {
                tracing::info!(path = %path.display(), rows = rows.len(), "export finished");
                self.status
                    .set(format!("exported to {}", path.display()), StatusLevel::Success);
                self.toasts.success("Export finished");
            }
            Err(err) => {
                tracing::error!(%err, "export failed");
                self.toasts.error(format!("Export failed: {err}"));
                self.status.set("export failed", StatusLevel::Error);
            }
        }
    }

    /// Drain completed backend operations.
    fn poll_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.busy = false;
            match response {
                BackendResponse::WriteDone(Ok(())) => {
                    // Fields clear only here, on backend acknowledgment.
                    self.pipe_name_input.clear();
                    self.temperature_input.clear();
                    self.pressure_input.clear();

                    let stamp = chrono::Local::now().format("%H:%M:%S");
                    tracing::info!("measurement written");
                    self.status
                        .set(format!("written at {stamp}"), StatusLevel::Success);
                    self.toasts.success("Measurement written to the database");
                }
                BackendResponse::WriteDone(Err(err)) => {
                    tracing::error!(%err, "write failed");
                    self.toasts.error(format!("Failed to write measurement: {err}"));
                    self.status.set("write failed", StatusLevel::Error);
                }
                BackendResponse::QueryDone(Ok(rows)) => {
                    if rows.is_empty() {
                        tracing::warn!("nothing to export in the trailing window");
                        self.toasts.warning("No data to export");
                    } else {
                        self.finish_export(rows);
                    }
                }
                BackendResponse::QueryDone(Err(err)) => {
                    tracing::error!(%err, "export query failed");
                    self.toasts.error(format!("Export failed: {err}"));
                    self.status.set("export failed", StatusLevel::Error);
                }
            }
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("measurement_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Pipe name:");
                ui.text_edit_singleline(&mut self.pipe_name_input);
                ui.end_row();

                ui.label("Temperature (°C):");
                ui.text_edit_singleline(&mut self.temperature_input);
                ui.end_row();

                ui.label("Pressure (bar):");
                ui.text_edit_singleline(&mut self.pressure_input);
                ui.end_row();
            });

        ui.add_space(16.0);

        ui.horizontal(|ui| {
            let record_button = egui::Button::new(
                egui::RichText::new("Record measurement").color(egui::Color32::WHITE),
            )
            .fill(egui::Color32::from_rgb(0x4c, 0xaf, 0x50));
            if ui.add_enabled(!self.busy, record_button).clicked() {
                self.record_measurement();
            }

            let export_button = egui::Button::new(
                egui::RichText::new("Export CSV").color(egui::Color32::WHITE),
            )
            .fill(egui::Color32::from_rgb(0x21, 0x96, 0xf3));
            if ui.add_enabled(!self.busy, export_button).clicked() {
                self.start_export();
            }

            if self.busy {
                ui.add(egui::Spinner::new());
            }
        });
    }
}

impl eframe::App for PipelogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_responses();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status.ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Pipe measurement entry");
            ui.add_space(8.0);
            self.form_ui(ui);
        });

        self.toasts.show(ctx);

        if self.busy {
            // Keep polling the response channel while an operation is in
            // flight, even without input events.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
