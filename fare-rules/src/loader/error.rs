//! Load pass error types.
//!
//! These errors abort a whole load. Problems confined to one transition or
//! OD row are reported as [`LoadWarning`](super::LoadWarning)s instead.

use std::path::PathBuf;

use crate::domain::PriceRowError;

/// Errors that stop a load pass.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A fare file could not be opened or decoded
    #[error("failed to read {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// A price row is malformed; prices cannot be partially loaded
    #[error("price row at line {line}: {source}")]
    InvalidPriceRow { line: usize, source: PriceRowError },
}
