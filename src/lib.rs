//! Installers for the Defacto compiler
//!
//! Three entry points share one pipeline: the console quick installer, the
//! Windows graphical installer (`gui` feature) and the NSIS packager. Host
//! access goes through the [`environment::HostEnvironment`] and
//! [`command::ExternalCommand`] traits; progress flows out through
//! [`progress::StatusSink`].

pub mod builder;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod detection;
pub mod environment;
pub mod error;
pub mod install;
pub mod orchestration;
pub mod package;
pub mod progress;
pub mod runners;
pub mod source;
pub mod wizard;

#[cfg(feature = "gui")]
pub mod gui;

pub use config::InstallerConfig;
pub use detection::Variant;
pub use error::{InstallerError, Result};
pub use orchestration::Pipeline;
