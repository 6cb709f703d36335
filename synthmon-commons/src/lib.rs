//! Shared contracts reused by the synthmon crates. The formatter crate only
//! depends on the [`DiagnosticsSink`] trait so that embedding applications can
//! route non-fatal anomalies into their own logging stack.

pub mod diagnostics;
pub mod reference;

pub use diagnostics::{DiagnosticLevel, DiagnosticsSink, NoopDiagnostics, TracingDiagnostics};
pub use reference::{DiagnosticEntry, MemoryDiagnostics};
