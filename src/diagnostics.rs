//! Diagnostic sink handed to a session at construction.

use std::fmt;

use log::Level;

/// Receives leveled diagnostic messages from a session.
///
/// Only [`Diagnostics::emit`] is required; the leveled helpers forward to it.
pub trait Diagnostics {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>);

    fn debug(&self, message: fmt::Arguments<'_>) {
        self.emit(Level::Debug, message);
    }

    fn info(&self, message: fmt::Arguments<'_>) {
        self.emit(Level::Info, message);
    }

    fn warn(&self, message: fmt::Arguments<'_>) {
        self.emit(Level::Warn, message);
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        self.emit(Level::Error, message);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        (**self).emit(level, message);
    }
}

/// Forwards diagnostics to the `log` facade under a fixed target.
#[derive(Debug, Clone)]
pub struct LogDiagnostics {
    target: String,
}

impl LogDiagnostics {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new("ze07")
    }
}

impl Diagnostics for LogDiagnostics {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        log::log!(target: self.target.as_str(), level, "{}", message);
    }
}
