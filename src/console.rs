//! Console status output for the quick installer and packager

use std::io::{IsTerminal, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::progress::{StatusKind, StatusSink, StatusUpdate};

pub(crate) fn color_choice(terminal: bool) -> ColorChoice {
    if terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

pub(crate) fn stdout() -> StandardStream {
    StandardStream::stdout(color_choice(std::io::stdout().is_terminal()))
}

pub(crate) fn stderr() -> StandardStream {
    StandardStream::stderr(color_choice(std::io::stderr().is_terminal()))
}

/// Write one line in `color`, resetting afterwards
pub(crate) fn line(out: &mut StandardStream, color: Option<Color>, bold: bool, text: &str) {
    let _ = out.set_color(ColorSpec::new().set_fg(color).set_bold(bold));
    let _ = writeln!(out, "{text}");
    let _ = out.reset();
}

/// Prints status updates; running stages show a spinner on terminals
pub struct ConsoleSink {
    spinner: Option<ProgressBar>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        let spinner = std::io::stdout().is_terminal().then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self { spinner }
    }

    /// Stop the spinner before printing summaries
    pub fn finish(&self) {
        if let Some(pb) = &self.spinner {
            pb.finish_and_clear();
        }
    }

    fn print(&self, update: &StatusUpdate) {
        let (color, to_stderr) = match update.kind {
            StatusKind::Progress => (None, false),
            StatusKind::Success => (Some(Color::Green), false),
            StatusKind::Warning => (Some(Color::Yellow), false),
            StatusKind::Error => (Some(Color::Red), true),
        };
        let mut out = if to_stderr { stderr() } else { stdout() };
        line(&mut out, color, false, &update.message);
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for ConsoleSink {
    fn report(&self, update: StatusUpdate) {
        match (&self.spinner, update.kind) {
            (Some(pb), StatusKind::Progress) => pb.set_message(update.message),
            (Some(pb), _) => pb.suspend(|| self.print(&update)),
            (None, _) => self.print(&update),
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        self.finish();
    }
}
