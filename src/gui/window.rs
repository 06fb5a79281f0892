//! Installer window state and the eframe app

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;
use tokio::sync::{mpsc, oneshot};

use crate::command::SystemCommand;
use crate::config::InstallerConfig;
use crate::detection::Variant;
use crate::environment::SystemEnvironment;
use crate::error::{InstallerError, Result};
use crate::install::InstallReport;
use crate::orchestration::Pipeline;
use crate::progress::{ChannelSink, StatusUpdate};

use super::types::{POLL_INTERVAL, Phase};

/// Final pipeline result, read by the runner after the window closes
pub type OutcomeSlot = Arc<Mutex<Option<Result<InstallReport>>>>;

pub struct InstallerWindow {
    runtime: tokio::runtime::Handle,
    pub config: InstallerConfig,
    source_hint: Option<PathBuf>,
    status_rx: Option<mpsc::UnboundedReceiver<StatusUpdate>>,
    result_rx: Option<oneshot::Receiver<Result<InstallReport>>>,
    outcome: OutcomeSlot,

    pub phase: Phase,
    pub status_text: String,
    pub progress: f32,
    /// Error dialog is open
    pub show_error: bool,
}

impl InstallerWindow {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Handle,
        config: InstallerConfig,
        source_hint: Option<PathBuf>,
        outcome: OutcomeSlot,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self::with_runtime(runtime, config, source_hint, outcome)
    }

    /// Window state without an egui context
    fn with_runtime(
        runtime: tokio::runtime::Handle,
        config: InstallerConfig,
        source_hint: Option<PathBuf>,
        outcome: OutcomeSlot,
    ) -> Self {
        Self {
            runtime,
            config,
            source_hint,
            status_rx: None,
            result_rx: None,
            outcome,
            phase: Phase::Ready,
            status_text: "Ready to install".to_string(),
            progress: 0.0,
            show_error: false,
        }
    }

    /// Start the pipeline on a blocking worker thread
    pub fn start(&mut self) {
        if self.phase.is_running() {
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = oneshot::channel();
        let config = self.config.clone();
        let hint = self.source_hint.clone();

        self.runtime.spawn_blocking(move || {
            let env = SystemEnvironment;
            let runner = SystemCommand;
            let sink = ChannelSink::new(tx);
            let result = Pipeline::new(&env, &runner, &sink, &config).run(Variant::WindowsGui, hint);
            if result_tx.send(result).is_err() {
                log::warn!("Installer window closed before the result arrived");
            }
        });

        self.attach(rx, result_rx);
    }

    /// Switch to running and listen on the channels of a started pipeline
    fn attach(
        &mut self,
        status_rx: mpsc::UnboundedReceiver<StatusUpdate>,
        result_rx: oneshot::Receiver<Result<InstallReport>>,
    ) {
        self.status_rx = Some(status_rx);
        self.result_rx = Some(result_rx);
        self.phase = Phase::Running;
        self.status_text = "Starting installation...".to_string();
        self.progress = 0.0;
    }

    /// Drain pending status updates and check for the final result
    pub fn poll(&mut self) {
        if let Some(rx) = &mut self.status_rx {
            while let Ok(update) = rx.try_recv() {
                self.status_text = update.message;
                self.progress = update.progress;
            }
        }

        let Some(rx) = &mut self.result_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => Err(InstallerError::Install(
                "installer task stopped unexpectedly".to_string(),
            )),
        };
        self.result_rx = None;
        self.finish(result);
    }

    fn finish(&mut self, result: Result<InstallReport>) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(result.clone());
        }

        match result {
            Ok(report) => {
                self.status_text = "✅ Installation complete!".to_string();
                self.progress = 1.0;
                self.phase = Phase::Complete(report);
            }
            Err(err) => {
                self.status_text = format!("❌ {err}");
                self.show_error = true;
                self.phase = Phase::Failed(err);
            }
        }
    }
}

impl eframe::App for InstallerWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        let running = self.phase.is_running();
        if running {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
        // Closing mid-run would leave the install half done
        ctx.send_viewport_cmd(egui::ViewportCommand::EnableButtons {
            close: !running,
            minimized: true,
            maximize: false,
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.heading(
                    egui::RichText::new(&self.config.product_name)
                        .size(28.0)
                        .strong(),
                );
                ui.add_space(20.0);

                match self.phase.clone() {
                    Phase::Ready => super::panels::show_ready_panel(self, ui),
                    Phase::Running => super::panels::show_progress_panel(self, ui),
                    Phase::Complete(report) => {
                        super::panels::show_completion_panel(self, ui, &report)
                    }
                    Phase::Failed(_) => super::panels::show_failure_panel(self, ui),
                }
            });
        });

        if let Phase::Failed(err) = self.phase.clone()
            && self.show_error
        {
            super::panels::show_error_dialog(self, ctx, &err);
        }
    }
}
