//! Windows graphical installer
//!
//! The eframe window runs on the main thread. Pressing Install starts the
//! pipeline on a blocking tokio thread; status updates come back over an
//! unbounded channel and the final result over a oneshot, both polled with
//! `try_recv` once per frame.

mod panels;
mod runner;
mod types;
mod window;

pub use runner::run_gui_installer;
