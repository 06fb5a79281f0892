//! Windows graphical installer for the Defacto compiler

use clap::Parser;
use defacto_install::cli::GuiArgs;
use defacto_install::detection::detect_platform;
use defacto_install::environment::{Platform, SystemEnvironment};
use defacto_install::gui;

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = GuiArgs::parse();

    if detect_platform(&SystemEnvironment).ok() != Some(Platform::Windows) {
        eprintln!("This installer is for Windows only");
        std::process::exit(1);
    }

    if let Err(e) = gui::run_gui_installer(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
