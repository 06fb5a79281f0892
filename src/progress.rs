//! Installation status reporting
//!
//! Stages publish immutable [`StatusUpdate`] values to a [`StatusSink`]. The
//! console installer prints them; the GUI receives them over a channel and
//! renders them on its own thread.

use std::fmt;

use tokio::sync::mpsc;

/// Pipeline stage a status update belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Probe,
    Acquire,
    Build,
    Deploy,
    Cleanup,
    Package,
    Done,
}

impl Stage {
    /// Overall completion fraction when this stage starts
    pub fn progress(self) -> f32 {
        match self {
            Self::Probe => 0.05,
            Self::Acquire => 0.15,
            Self::Build => 0.40,
            Self::Deploy => 0.75,
            Self::Cleanup => 0.95,
            Self::Package => 0.85,
            Self::Done => 1.0,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Probe => "probe",
            Self::Acquire => "acquire",
            Self::Build => "build",
            Self::Deploy => "deploy",
            Self::Cleanup => "cleanup",
            Self::Package => "package",
            Self::Done => "done",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A stage is running
    Progress,
    /// A stage finished
    Success,
    /// Non-fatal problem, e.g. a cleanup failure
    Warning,
    Error,
}

/// One human-readable status line
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub stage: Stage,
    pub kind: StatusKind,
    pub progress: f32, // 0.0 to 1.0
    pub message: String,
}

impl StatusUpdate {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            kind: StatusKind::Progress,
            progress: stage.progress(),
            message: message.into(),
        }
    }

    pub fn success(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            ..Self::new(stage, message)
        }
    }

    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            ..Self::new(stage, message)
        }
    }

    pub fn error(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            progress: 0.0,
            ..Self::new(stage, message)
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self::success(Stage::Done, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Receives status updates; must be callable from any thread
pub trait StatusSink: Send + Sync {
    fn report(&self, update: StatusUpdate);
}

/// Drops every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn report(&self, _update: StatusUpdate) {}
}

/// Forwards updates over an unbounded channel to the thread that owns the UI
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StatusUpdate>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<StatusUpdate>) -> Self {
        Self { tx }
    }
}

impl StatusSink for ChannelSink {
    fn report(&self, update: StatusUpdate) {
        // Receiver gone means the window closed; the run keeps going
        if self.tx.send(update).is_err() {
            log::debug!("Status receiver closed, dropping update");
        }
    }
}
