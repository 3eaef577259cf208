//! JSON snapshot of a compiled fare model.
//!
//! The fare engine reads the snapshot instead of re-parsing the rule files.
//! OD keys are structured, so the OD table is written as a flat list of
//! entries; prices are written sorted by fare key for stable output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DateInterval, OdKey, Ticket, TransitionRecord};
use crate::loader::FareData;
use crate::prices::PriceTable;

/// Errors reading or writing a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Filesystem operation failed
    #[error("snapshot I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot content is not valid
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    prices: Vec<PriceEntry>,
    transitions: Vec<TransitionRecord>,
    od_fares: Vec<OdEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PriceEntry {
    fare_key: String,
    tickets: Vec<DatedTicket>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatedTicket {
    validity: DateInterval,
    ticket: Ticket,
}

#[derive(Debug, Serialize, Deserialize)]
struct OdEntry {
    origin: OdKey,
    destination: OdKey,
    tickets: Vec<String>,
}

impl From<&FareData> for Snapshot {
    fn from(data: &FareData) -> Self {
        let mut prices: Vec<PriceEntry> = data
            .prices
            .iter()
            .map(|(key, entries)| PriceEntry {
                fare_key: key.to_string(),
                tickets: entries
                    .iter()
                    .map(|(validity, ticket)| DatedTicket {
                        validity: *validity,
                        ticket: ticket.clone(),
                    })
                    .collect(),
            })
            .collect();
        prices.sort_by(|a, b| a.fare_key.cmp(&b.fare_key));

        let od_fares = data
            .od_tickets
            .iter()
            .flat_map(|(origin, destinations)| {
                destinations.iter().map(|(destination, tickets)| OdEntry {
                    origin: origin.clone(),
                    destination: destination.clone(),
                    tickets: tickets.clone(),
                })
            })
            .collect();

        Self {
            prices,
            transitions: data.transitions.clone(),
            od_fares,
        }
    }
}

impl From<Snapshot> for FareData {
    fn from(snapshot: Snapshot) -> Self {
        let mut prices = PriceTable::new();
        for entry in snapshot.prices {
            for dated in entry.tickets {
                prices.add(dated.validity, dated.ticket);
            }
        }

        let mut data = FareData {
            prices,
            transitions: snapshot.transitions,
            ..Default::default()
        };
        for entry in snapshot.od_fares {
            data.od_tickets
                .entry(entry.origin)
                .or_default()
                .insert(entry.destination, entry.tickets);
        }
        data
    }
}

/// Write `data` to `path` as pretty-printed JSON.
///
/// Creates parent directories if they don't exist.
pub fn write_snapshot(data: &FareData, path: &Path) -> Result<(), SnapshotError> {
    let io_error = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(&Snapshot::from(data))?;
    std::fs::write(path, json).map_err(io_error)?;
    Ok(())
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<FareData, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot = serde_json::from_str(&contents)?;
    Ok(snapshot.into())
}
