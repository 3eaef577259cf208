//! Origin-destination keys.
//!
//! OD fares map a pair of travel points to the ticket keys valid between
//! them. A travel point is identified by what it is (a mode, a zone or a
//! stop area) and an identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FareError;

/// Minimum number of columns in an OD row: six descriptive columns and at
/// least one ticket column.
pub const OD_MIN_COLUMNS: usize = 7;

/// What an OD identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OdKind {
    Mode,
    Zone,
    StopArea,
}

impl OdKind {
    /// Classify a mode column, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use fare_rules::domain::OdKind;
    ///
    /// assert_eq!(OdKind::classify("Stop").unwrap(), OdKind::StopArea);
    /// assert_eq!(OdKind::classify("ZONE").unwrap(), OdKind::Zone);
    /// assert!(OdKind::classify("bus").is_err());
    /// ```
    pub fn classify(mode: &str) -> Result<Self, FareError> {
        match mode.to_lowercase().as_str() {
            "mode" => Ok(OdKind::Mode),
            "zone" => Ok(OdKind::Zone),
            "stop" | "stoparea" => Ok(OdKind::StopArea),
            _ => Err(FareError::UnknownOdKind(mode.to_string())),
        }
    }
}

impl FromStr for OdKind {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::classify(s)
    }
}

impl fmt::Display for OdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OdKind::Mode => "mode",
            OdKind::Zone => "zone",
            OdKind::StopArea => "stoparea",
        };
        f.write_str(name)
    }
}

/// A classified travel point. Ordered by kind, then identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OdKey {
    pub kind: OdKind,
    pub id: String,
}

impl OdKey {
    pub fn new(kind: OdKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for OdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// One interpreted OD row: where from, where to, and which tickets apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdFare {
    pub origin: OdKey,
    pub destination: OdKey,
    /// Ticket keys in column order, blanks removed.
    pub ticket_keys: Vec<String>,
}

impl OdFare {
    /// Interpret an OD row.
    ///
    /// Layout: `origin_id, origin_name, origin_mode, dest_id, dest_name,
    /// dest_mode, ticket...`. Names are not used. Returns `None` when the
    /// row has fewer than [`OD_MIN_COLUMNS`] columns.
    pub fn from_row(fields: &[String]) -> Option<Result<Self, FareError>> {
        if fields.len() < OD_MIN_COLUMNS {
            return None;
        }
        Some(Self::interpret(fields))
    }

    fn interpret(fields: &[String]) -> Result<Self, FareError> {
        let origin = OdKey::new(OdKind::classify(fields[2].trim())?, fields[0].trim());
        let destination = OdKey::new(OdKind::classify(fields[5].trim())?, fields[3].trim());

        let ticket_keys = fields[6..]
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            origin,
            destination,
            ticket_keys,
        })
    }
}
