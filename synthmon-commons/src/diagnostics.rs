use std::fmt;

/// Severity attached to a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl DiagnosticLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives non-fatal anomalies reported while formatting monitor
/// configurations. Calls are fire-and-forget: nothing is returned to the
/// reporting code and implementations must never block it.
pub trait DiagnosticsSink: Send + Sync {
    /// Record a message at the given level.
    fn log(&self, level: DiagnosticLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(DiagnosticLevel::Debug, message);
    }

    fn warn(&self, message: &str) {
        self.log(DiagnosticLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(DiagnosticLevel::Error, message);
    }
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for &T {
    fn log(&self, level: DiagnosticLevel, message: &str) {
        (**self).log(level, message);
    }
}

/// A sink that drops every message. Useful for tests or callers that do not
/// care about substitution warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn log(&self, _level: DiagnosticLevel, _message: &str) {}
}

/// Forwards diagnostics to the `tracing` facade under the
/// `synthmon::diagnostics` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn log(&self, level: DiagnosticLevel, message: &str) {
        match level {
            DiagnosticLevel::Debug => tracing::debug!(target: "synthmon::diagnostics", "{message}"),
            DiagnosticLevel::Info => tracing::info!(target: "synthmon::diagnostics", "{message}"),
            DiagnosticLevel::Warn => tracing::warn!(target: "synthmon::diagnostics", "{message}"),
            DiagnosticLevel::Error => tracing::error!(target: "synthmon::diagnostics", "{message}"),
        }
    }
}
