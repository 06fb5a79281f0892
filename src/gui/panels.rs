//! Panel rendering for the installer window

use eframe::egui;

use crate::environment::Platform;
use crate::error::InstallerError;
use crate::install::InstallReport;
use crate::wizard::assembler_hint;

use super::window::InstallerWindow;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 120, 212);
const SUCCESS: egui::Color32 = egui::Color32::from_rgb(16, 124, 16);
const FAILURE: egui::Color32 = egui::Color32::from_rgb(196, 43, 28);

fn status_label(window: &InstallerWindow, ui: &mut egui::Ui) {
    ui.label(egui::RichText::new(&window.status_text).size(14.0));
}

fn exit_button(ui: &mut egui::Ui, enabled: bool) {
    if ui
        .add_enabled(enabled, egui::Button::new(egui::RichText::new("Exit").size(14.0)))
        .clicked()
    {
        ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

pub fn show_ready_panel(window: &mut InstallerWindow, ui: &mut egui::Ui) {
    ui.label("Downloads, builds and installs the compiler into Program Files,");
    ui.label("adds it to PATH and creates Start Menu shortcuts.");
    ui.add_space(20.0);
    status_label(window, ui);
    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let install = egui::Button::new(egui::RichText::new("Install").size(14.0)).fill(ACCENT);
        if ui.add(install).clicked() {
            window.start();
        }
        ui.add_space(10.0);
        exit_button(ui, true);
    });
}

/// Install and Exit stay visible but disabled while the pipeline runs
pub fn show_progress_panel(window: &mut InstallerWindow, ui: &mut egui::Ui) {
    status_label(window, ui);
    ui.add_space(15.0);
    ui.add(
        egui::ProgressBar::new(window.progress)
            .desired_width(420.0)
            .show_percentage()
            .animate(true),
    );
    ui.add_space(20.0);

    ui.horizontal(|ui| {
        ui.add_enabled(false, egui::Button::new(egui::RichText::new("Install").size(14.0)));
        ui.add_space(10.0);
        exit_button(ui, false);
    });
}

pub fn show_completion_panel(window: &mut InstallerWindow, ui: &mut egui::Ui, report: &InstallReport) {
    ui.label(
        egui::RichText::new("Installation Complete!")
            .size(22.0)
            .strong()
            .color(SUCCESS),
    );
    ui.add_space(10.0);
    ui.label(format!("Installed: {}", report.binary.display()));
    if report.path_changed {
        ui.label("Added to PATH. Open a new terminal to use it.");
    }
    ui.add_space(15.0);

    ui.label("Don't forget to install NASM:");
    ui.monospace(assembler_hint(Platform::Windows));
    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let nasm = egui::Button::new(egui::RichText::new("Get NASM").size(14.0)).fill(ACCENT);
        if ui.add(nasm).clicked()
            && let Err(e) = opener::open(&window.config.assembler_url)
        {
            log::warn!("Failed to open {}: {e}", window.config.assembler_url);
        }
        ui.add_space(10.0);
        exit_button(ui, true);
    });
}

pub fn show_failure_panel(window: &mut InstallerWindow, ui: &mut egui::Ui) {
    ui.label(
        egui::RichText::new("Installation Failed")
            .size(22.0)
            .strong()
            .color(FAILURE),
    );
    ui.add_space(10.0);
    status_label(window, ui);
    ui.add_space(20.0);

    ui.horizontal(|ui| {
        if ui.button("Details").clicked() {
            window.show_error = true;
        }
        ui.add_space(10.0);
        exit_button(ui, true);
    });
}

/// Blocking-style error dialog shown over the window
pub fn show_error_dialog(window: &mut InstallerWindow, ctx: &egui::Context, err: &InstallerError) {
    let mut open = true;
    egui::Window::new(err.title())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(err.to_string());
            if let InstallerError::MissingDependency(missing) = err {
                ui.add_space(10.0);
                ui.label("Install with:");
                ui.monospace(Platform::Windows.remediation(missing.as_slice()));
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                window.show_error = false;
            }
        });
    if !open {
        window.show_error = false;
    }
}
