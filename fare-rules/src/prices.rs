//! Price table: tickets per fare key, each valid over a date interval.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{DateInterval, Ticket};

/// Tickets grouped by fare key, in insertion order within each key.
///
/// Overlapping intervals for the same key are kept as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    entries: HashMap<String, Vec<(DateInterval, Ticket)>>,
}

impl PriceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ticket under its fare key for the given interval.
    pub fn add(&mut self, interval: DateInterval, ticket: Ticket) {
        self.entries
            .entry(ticket.fare_key.clone())
            .or_default()
            .push((interval, ticket));
    }

    /// Check whether any ticket is known under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All entries for a fare key.
    pub fn get(&self, key: &str) -> Option<&[(DateInterval, Ticket)]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// The first ticket for `key` valid on `date`.
    pub fn ticket_on(&self, key: &str, date: NaiveDate) -> Option<&Ticket> {
        self.get(key)?
            .iter()
            .find(|(interval, _)| interval.contains(date))
            .map(|(_, ticket)| ticket)
    }

    /// Fare keys present in the table, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over keys and their entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(DateInterval, Ticket)])> {
        self.entries
            .iter()
            .map(|(key, entries)| (key.as_str(), entries.as_slice()))
    }

    /// Returns the number of fare keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no ticket has been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of (interval, ticket) entries across all keys.
    pub fn ticket_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
