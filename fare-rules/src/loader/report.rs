//! Diagnostics collected while loading.

use std::fmt;

use tracing::warn;

use crate::domain::FareError;

/// Which input a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FareFile {
    Prices,
    Transitions,
    Od,
}

impl fmt::Display for FareFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FareFile::Prices => "prices",
            FareFile::Transitions => "transitions",
            FareFile::Od => "OD",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem found in one row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWarning {
    /// The row does not have the expected layout and was skipped
    #[error("{file} line {line}: wrong number of columns ({found}, expected {expected}), row skipped")]
    WrongColumnCount {
        file: FareFile,
        line: usize,
        found: usize,
        expected: usize,
    },

    /// The row refers to a ticket missing from the price table; it was kept
    #[error("{file} line {line}: unknown ticket {ticket:?}")]
    UnknownTicket {
        file: FareFile,
        line: usize,
        ticket: String,
    },

    /// The row could not be interpreted and was skipped
    #[error("{file} line {line}: {error}, row skipped")]
    RowRejected {
        file: FareFile,
        line: usize,
        error: FareError,
    },
}

impl LoadWarning {
    /// True for warnings about row layout rather than content.
    pub fn is_structural(&self) -> bool {
        matches!(self, LoadWarning::WrongColumnCount { .. })
    }

    /// True for references to tickets the price table does not know.
    pub fn is_coherence(&self) -> bool {
        matches!(self, LoadWarning::UnknownTicket { .. })
    }
}

/// Outcome of a load: warnings in the order they were found, and how many
/// rows each pass stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub warnings: Vec<LoadWarning>,
    pub price_rows: usize,
    pub transition_rows: usize,
    pub od_rows: usize,
}

impl LoadReport {
    /// Record a warning and log it.
    pub(crate) fn warn(&mut self, warning: LoadWarning) {
        warn!(warning = %warning, "Fare row problem");
        self.warnings.push(warning);
    }

    /// Number of structural (column count) warnings.
    pub fn structural_warnings(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_structural()).count()
    }

    /// Number of coherence (unknown ticket) warnings.
    pub fn coherence_warnings(&self) -> usize {
        self.warnings.iter().filter(|w| w.is_coherence()).count()
    }

    /// Number of rows rejected for their content.
    pub fn rejected_rows(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, LoadWarning::RowRejected { .. }))
            .count()
    }
}
