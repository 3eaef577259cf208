//! Build context for one load pass.
//!
//! Rows are consumed in source order. Prices come first, since transitions
//! and OD fares check their ticket keys against the price table as they
//! are read.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::error::LoadError;
use super::report::{FareFile, LoadReport, LoadWarning};
use super::source::Row;
use crate::domain::{
    OD_MIN_COLUMNS, OdFare, OdKey, TRANSITION_COLUMNS, Ticket, TransitionRecord,
};
use crate::prices::PriceTable;

/// Ticket keys valid between an origin and a destination.
pub type OdTable = BTreeMap<OdKey, BTreeMap<OdKey, Vec<String>>>;

/// The compiled fare model handed to the fare engine.
///
/// Read-only once loading is finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FareData {
    pub prices: PriceTable,
    /// Transitions in row order, a symmetric copy right after its source.
    pub transitions: Vec<TransitionRecord>,
    pub od_tickets: OdTable,
}

impl FareData {
    /// Ticket keys between two OD keys, if a fare was loaded for the pair.
    pub fn od_tickets_between(&self, origin: &OdKey, destination: &OdKey) -> Option<&[String]> {
        self.od_tickets
            .get(origin)?
            .get(destination)
            .map(Vec::as_slice)
    }

    /// Number of (origin, destination) pairs in the OD table.
    pub fn od_pair_count(&self) -> usize {
        self.od_tickets.values().map(BTreeMap::len).sum()
    }
}

/// Accumulates fare data and diagnostics while rows are loaded.
#[derive(Debug, Default)]
pub struct FareBuilder {
    data: FareData,
    report: LoadReport,
}

impl FareBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load price rows (`fare_key;start;end;price;label`).
    ///
    /// Any malformed row aborts the pass. Returns the number of rows added.
    pub fn load_prices<I>(&mut self, rows: I) -> Result<usize, LoadError>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut count = 0;
        for row in rows {
            let (interval, ticket) = Ticket::from_price_row(&row.fields)
                .map_err(|source| LoadError::InvalidPriceRow {
                    line: row.line,
                    source,
                })?;
            debug!(
                key = %ticket.fare_key,
                interval = %interval,
                price = ticket.price,
                "Price added"
            );
            self.data.prices.add(interval, ticket);
            count += 1;
        }

        self.report.price_rows += count;
        info!(
            rows = count,
            keys = self.data.prices.len(),
            "Prices loaded"
        );
        Ok(count)
    }

    /// Load transition rows.
    ///
    /// Rows with the wrong layout or an unparsable rule are skipped with a
    /// warning; the rest of the rows are still loaded. Returns the number
    /// of rows stored.
    pub fn load_transitions<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = Row>,
    {
        let mut count = 0;
        for row in rows {
            let Ok(fields) = <&[String; TRANSITION_COLUMNS]>::try_from(row.fields.as_slice()) else {
                self.report.warn(LoadWarning::WrongColumnCount {
                    file: FareFile::Transitions,
                    line: row.line,
                    found: row.fields.len(),
                    expected: TRANSITION_COLUMNS,
                });
                continue;
            };

            let records = match TransitionRecord::from_row(fields) {
                Ok(records) => records,
                Err(error) => {
                    self.report.warn(LoadWarning::RowRejected {
                        file: FareFile::Transitions,
                        line: row.line,
                        error,
                    });
                    continue;
                }
            };

            // Every record of a row shares the ticket key
            let ticket_key = &records[0].transition.ticket_key;
            if !self.data.prices.contains_key(ticket_key) {
                self.report.warn(LoadWarning::UnknownTicket {
                    file: FareFile::Transitions,
                    line: row.line,
                    ticket: ticket_key.clone(),
                });
            }

            for record in &records {
                debug!(
                    start = %record.start,
                    end = %record.end,
                    ticket = %record.transition.ticket_key,
                    "Transition added"
                );
            }
            self.data.transitions.extend(records);
            count += 1;
        }

        self.report.transition_rows += count;
        info!(
            rows = count,
            transitions = self.data.transitions.len(),
            "Transitions loaded"
        );
        count
    }

    /// Load OD rows.
    ///
    /// A later row for the same (origin, destination) pair replaces the
    /// earlier one. Short rows and rows with an unknown mode are skipped
    /// with a warning. Returns the number of rows stored.
    pub fn load_od<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = Row>,
    {
        let mut count = 0;
        for row in rows {
            let fare = match OdFare::from_row(&row.fields) {
                Some(Ok(fare)) => fare,
                Some(Err(error)) => {
                    self.report.warn(LoadWarning::RowRejected {
                        file: FareFile::Od,
                        line: row.line,
                        error,
                    });
                    continue;
                }
                None => {
                    self.report.warn(LoadWarning::WrongColumnCount {
                        file: FareFile::Od,
                        line: row.line,
                        found: row.fields.len(),
                        expected: OD_MIN_COLUMNS,
                    });
                    continue;
                }
            };

            for key in &fare.ticket_keys {
                if !self.data.prices.contains_key(key) {
                    self.report.warn(LoadWarning::UnknownTicket {
                        file: FareFile::Od,
                        line: row.line,
                        ticket: key.clone(),
                    });
                }
            }

            debug!(
                origin = %fare.origin,
                destination = %fare.destination,
                tickets = fare.ticket_keys.len(),
                "OD fare added"
            );
            self.data
                .od_tickets
                .entry(fare.origin)
                .or_default()
                .insert(fare.destination, fare.ticket_keys);
            count += 1;
        }

        self.report.od_rows += count;
        info!(rows = count, pairs = self.data.od_pair_count(), "OD fares loaded");
        count
    }

    /// Diagnostics so far.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Data loaded so far.
    pub fn data(&self) -> &FareData {
        &self.data
    }

    /// Finish loading and hand over the compiled data.
    pub fn finish(self) -> (FareData, LoadReport) {
        (self.data, self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OdKind, State};
    use chrono::NaiveDate;

    fn price_rows() -> Vec<Row> {
        vec![Row::new(1, ["T1", "20120101", "20121231", "150", "Ticket One"])]
    }

    fn builder_with_prices() -> FareBuilder {
        let mut builder = FareBuilder::new();
        builder.load_prices(price_rows()).unwrap();
        builder
    }

    #[test]
    fn prices_fill_table() {
        let builder = builder_with_prices();
        let table = &builder.data().prices;
        let entries = table.get("T1").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1.price, 150);
        assert_eq!(
            entries[0].0.start,
            NaiveDate::from_ymd_opt(2012, 1, 1).unwrap()
        );
        assert_eq!(builder.report().price_rows, 1);
    }

    #[test]
    fn bad_price_row_aborts_pass() {
        let mut builder = FareBuilder::new();
        let rows = vec![
            Row::new(1, ["T1", "20120101", "20121231", "150", "One"]),
            Row::new(2, ["T2", "2012-01-01", "20121231", "150", "Two"]),
            Row::new(3, ["T3", "20120101", "20121231", "150", "Three"]),
        ];
        let err = builder.load_prices(rows).unwrap_err();
        assert!(matches!(err, LoadError::InvalidPriceRow { line: 2, .. }));
        assert!(!builder.data().prices.contains_key("T3"));
    }

    #[test]
    fn non_numeric_price_aborts_pass() {
        let mut builder = FareBuilder::new();
        let err = builder
            .load_prices(vec![Row::new(1, ["T1", "20120101", "20121231", "abc", "One"])])
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidPriceRow { line: 1, .. }));
    }

    #[test]
    fn symmetric_transition_end_to_end() {
        let mut builder = builder_with_prices();
        let count = builder.load_transitions(vec![Row::new(
            2,
            ["line=A", "line=B", "", "", "symetric", "T1"],
        )]);
        assert_eq!(count, 1);

        let (data, report) = builder.finish();
        assert_eq!(data.transitions.len(), 2);
        for record in &data.transitions {
            assert_eq!(record.transition.ticket_key, "T1");
            assert_eq!(record.start.line, "a");
            assert_eq!(record.end.line, "b");
        }
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn short_transition_row_is_skipped() {
        let mut builder = builder_with_prices();
        let count = builder.load_transitions(vec![
            Row::new(2, ["line=A", "line=B", "", "", "T1"]),
            Row::new(3, ["line=A", "line=B", "", "", "", "T1"]),
        ]);
        assert_eq!(count, 1);

        let (data, report) = builder.finish();
        assert_eq!(data.transitions.len(), 1);
        assert_eq!(
            report.warnings,
            vec![LoadWarning::WrongColumnCount {
                file: FareFile::Transitions,
                line: 2,
                found: 5,
                expected: 6,
            }]
        );
    }

    #[test]
    fn invalid_rule_rejects_only_its_row() {
        let mut builder = builder_with_prices();
        let count = builder.load_transitions(vec![
            Row::new(2, ["line=A&line=B", "*", "", "", "", "T1"]),
            Row::new(3, ["*", "*", "a<>b", "", "", "T1"]),
            Row::new(4, ["zone=1", "zone=2", "", "", "", "T1"]),
        ]);
        assert_eq!(count, 1);

        let (data, report) = builder.finish();
        assert_eq!(data.transitions.len(), 1);
        assert_eq!(data.transitions[0].start.zone, "1");
        assert_eq!(report.rejected_rows(), 2);
        assert!(matches!(
            report.warnings[0],
            LoadWarning::RowRejected { line: 2, .. }
        ));
    }

    #[test]
    fn unknown_ticket_keeps_transition() {
        let mut builder = builder_with_prices();
        builder.load_transitions(vec![Row::new(2, ["*", "*", "", "", "symetric", "T9"])]);

        let (data, report) = builder.finish();
        assert_eq!(data.transitions.len(), 2);
        assert_eq!(
            report.warnings,
            vec![LoadWarning::UnknownTicket {
                file: FareFile::Transitions,
                line: 2,
                ticket: "T9".to_string(),
            }]
        );
    }

    #[test]
    fn transitions_keep_row_order() {
        let mut builder = builder_with_prices();
        builder.load_transitions(vec![
            Row::new(2, ["zone=1", "*", "", "", "symetric", "T1"]),
            Row::new(3, ["zone=2", "*", "", "", "", "T1"]),
        ]);

        let zones: Vec<&str> = builder
            .data()
            .transitions
            .iter()
            .map(|r| r.start.zone.as_str())
            .collect();
        assert_eq!(zones, vec!["1", "1", "2"]);
        assert_eq!(builder.data().transitions[2].end, State::default());
    }

    #[test]
    fn od_row_end_to_end() {
        let mut builder = FareBuilder::new();
        builder
            .load_prices(vec![
                Row::new(1, ["T1", "20120101", "20121231", "150", "One"]),
                Row::new(2, ["T2", "20120101", "20121231", "250", "Two"]),
            ])
            .unwrap();
        let count = builder.load_od(vec![Row::new(
            2,
            ["S1", "Start", "stop", "S2", "End", "zone", "T1", "", "T2"],
        )]);
        assert_eq!(count, 1);

        let (data, report) = builder.finish();
        let origin = OdKey::new(OdKind::StopArea, "S1");
        let destination = OdKey::new(OdKind::Zone, "S2");
        assert_eq!(
            data.od_tickets_between(&origin, &destination),
            Some(&["T1".to_string(), "T2".to_string()][..])
        );
        assert_eq!(report.od_rows, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn od_unknown_ticket_is_kept() {
        let mut builder = builder_with_prices();
        builder.load_od(vec![Row::new(
            2,
            ["S1", "Start", "stop", "S2", "End", "zone", "T1", "T9"],
        )]);

        let (data, report) = builder.finish();
        let tickets = data
            .od_tickets_between(
                &OdKey::new(OdKind::StopArea, "S1"),
                &OdKey::new(OdKind::Zone, "S2"),
            )
            .unwrap();
        assert_eq!(tickets, ["T1", "T9"]);
        assert_eq!(report.coherence_warnings(), 1);
    }

    #[test]
    fn od_last_row_wins() {
        let mut builder = builder_with_prices();
        let count = builder.load_od(vec![
            Row::new(2, ["S1", "a", "stop", "S2", "b", "stop", "T1"]),
            Row::new(3, ["S1", "a", "StopArea", "S2", "b", "STOP", "T2", "T3"]),
        ]);
        assert_eq!(count, 2);

        let (data, report) = builder.finish();
        assert_eq!(data.od_pair_count(), 1);
        let tickets = data
            .od_tickets_between(
                &OdKey::new(OdKind::StopArea, "S1"),
                &OdKey::new(OdKind::StopArea, "S2"),
            )
            .unwrap();
        assert_eq!(tickets, ["T2", "T3"]);
        assert_eq!(report.od_rows, 2);
    }

    #[test]
    fn od_bad_rows_are_skipped() {
        let mut builder = builder_with_prices();
        let count = builder.load_od(vec![
            Row::new(2, ["S1", "a", "stop", "S2", "b", "zone"]),
            Row::new(3, ["S1", "a", "bus", "S2", "b", "zone", "T1"]),
            Row::new(4, ["M1", "a", "mode", "Z2", "b", "zone", "T1"]),
        ]);
        assert_eq!(count, 1);

        let (data, report) = builder.finish();
        assert_eq!(data.od_pair_count(), 1);
        assert_eq!(report.structural_warnings(), 1);
        assert_eq!(report.rejected_rows(), 1);
        assert_eq!(report.od_rows, 1);
    }

    #[test]
    fn od_row_with_only_blank_tickets_stores_empty_list() {
        let mut builder = builder_with_prices();
        builder.load_od(vec![Row::new(2, ["S1", "a", "stop", "S2", "b", "zone", " "])]);

        let (data, _) = builder.finish();
        let tickets = data
            .od_tickets_between(
                &OdKey::new(OdKind::StopArea, "S1"),
                &OdKey::new(OdKind::Zone, "S2"),
            )
            .unwrap();
        assert!(tickets.is_empty());
    }
}
