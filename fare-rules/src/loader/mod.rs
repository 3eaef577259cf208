//! Loading fare files into the compiled fare model.
//!
//! Three files describe a fare system:
//! - prices: ticket prices per fare key and validity period (no header)
//! - transitions: rules between travel states (one header row)
//! - OD fares: ticket keys per origin and destination (one header row)
//!
//! Malformed prices abort the load. Malformed transition or OD rows are
//! skipped and reported in a [`LoadReport`], and loading carries on.

mod builder;
mod error;
mod pipeline;
mod report;
mod source;

pub use builder::{FareBuilder, FareData, OdTable};
pub use error::LoadError;
pub use pipeline::FareLoader;
pub use report::{FareFile, LoadReport, LoadWarning};
pub use source::{Row, read_rows};
