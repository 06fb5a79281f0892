//! GUI installer entry point

use std::sync::{Arc, Mutex};

use anyhow::Result;
use eframe::egui;

use crate::cli::GuiArgs;
use crate::config::InstallerConfig;

use super::types::WINDOW_TITLE;
use super::window::{InstallerWindow, OutcomeSlot};

/// Show the installer window and block until it closes.
///
/// Must be called from within a tokio runtime. Returns the pipeline error
/// when an install was attempted and failed; closing the window without
/// installing is not an error.
pub fn run_gui_installer(args: &GuiArgs) -> Result<()> {
    let runtime = tokio::runtime::Handle::current();
    let config = InstallerConfig::default();
    let source_hint = args.source.clone();
    let outcome: OutcomeSlot = Arc::new(Mutex::new(None));
    let window_outcome = outcome.clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 360.0])
            .with_resizable(false)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        "defacto_installer",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(InstallerWindow::new(
                cc,
                runtime,
                config,
                source_hint,
                window_outcome,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to open installer window: {e}"))?;

    let result = outcome.lock().ok().and_then(|mut slot| slot.take());
    match result {
        Some(Ok(report)) => {
            log::info!("Installed {}", report.binary.display());
            Ok(())
        }
        Some(Err(e)) => Err(e.into()),
        None => {
            log::info!("Installer closed without installing");
            Ok(())
        }
    }
}
