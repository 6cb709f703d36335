//! Reference sink implementations used by tests.

use std::sync::{Mutex, PoisonError};

use crate::diagnostics::{DiagnosticLevel, DiagnosticsSink};

/// One recorded diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// Keeps every message in memory, in the order it was reported.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries recorded at `level`.
    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: DiagnosticLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.level == level)
            .map(|entry| entry.message.clone())
            .collect()
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn log(&self, level: DiagnosticLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DiagnosticEntry {
                level,
                message: message.to_owned(),
            });
    }
}
