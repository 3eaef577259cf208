//! Running the three load passes over files on disk.

use tracing::info;

use super::builder::{FareBuilder, FareData};
use super::error::LoadError;
use super::report::LoadReport;
use super::source::read_rows;
use crate::config::FareFiles;

/// Loads a fare system from its files.
#[derive(Debug, Clone)]
pub struct FareLoader {
    files: FareFiles,
}

impl FareLoader {
    /// Create a loader for the given files.
    pub fn new(files: FareFiles) -> Self {
        Self { files }
    }

    /// Load prices, then transitions, then OD fares.
    ///
    /// Stops at the first unreadable file or malformed price row.
    pub fn load(&self) -> Result<(FareData, LoadReport), LoadError> {
        let mut builder = FareBuilder::new();

        info!(path = %self.files.prices.display(), "Loading prices");
        builder.load_prices(read_rows(&self.files.prices, false)?)?;

        info!(path = %self.files.transitions.display(), "Loading transitions");
        builder.load_transitions(read_rows(&self.files.transitions, true)?);

        info!(path = %self.files.od.display(), "Loading OD fares");
        builder.load_od(read_rows(&self.files.od, true)?);

        Ok(builder.finish())
    }

    /// The files this loader reads.
    pub fn files(&self) -> &FareFiles {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OdKey, OdKind};
    use std::path::Path;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path) {
        std::fs::write(
            dir.join("prices.csv"),
            "T1;20120101;20121231;150;Ticket One\nT2;20120101;20121231;300;Ticket Two\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("fares.csv"),
            "start;end;start_conditions;end_conditions;global;ticket\n\
             line=A;line=B;;;symetric;T1\n\
             line=A;line=C;\n\
             mode=metro;*;duration<90;;;T3\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("od_fares.csv"),
            "origin;origin_name;origin_mode;dest;dest_name;dest_mode;tickets\n\
             S1;Start;stop;S2;End;zone;T1;;T2\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_all_three_files() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());

        let loader = FareLoader::new(FareFiles::in_dir(dir.path()));
        let (data, report) = loader.load().unwrap();

        assert_eq!(data.prices.len(), 2);
        assert_eq!(data.transitions.len(), 3);
        assert_eq!(
            data.od_tickets_between(
                &OdKey::new(OdKind::StopArea, "S1"),
                &OdKey::new(OdKind::Zone, "S2")
            )
            .unwrap(),
            ["T1", "T2"]
        );

        assert_eq!(report.price_rows, 2);
        assert_eq!(report.transition_rows, 2);
        assert_eq!(report.od_rows, 1);
        assert_eq!(report.structural_warnings(), 1);
        assert_eq!(report.coherence_warnings(), 1);
    }

    #[test]
    fn badly_encoded_row_does_not_stop_the_load() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::write(
            dir.path().join("fares.csv"),
            b"start;end;start_conditions;end_conditions;global;ticket\n\
              line=A;line=B;;;;T1\n\
              line=C;line=D;;;\xe9;T1\n\
              line=E;line=F;;;;T1\n",
        )
        .unwrap();

        let (data, report) = FareLoader::new(FareFiles::in_dir(dir.path()))
            .load()
            .unwrap();

        assert_eq!(report.transition_rows, 3);
        let lines: Vec<&str> = data
            .transitions
            .iter()
            .map(|record| record.start.line.as_str())
            .collect();
        assert_eq!(lines, ["a", "c", "e"]);
        assert_eq!(data.transitions[1].transition.global_condition, "\u{FFFD}");
        assert_eq!(report.od_rows, 1);
    }

    #[test]
    fn loader_keeps_its_files() {
        let files = FareFiles::in_dir("/data/idf").with_od("/tmp/od.csv");
        let loader = FareLoader::new(files.clone());
        assert_eq!(loader.files(), &files);
    }

    #[test]
    fn bad_price_file_stops_the_load() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::write(dir.path().join("prices.csv"), "T1;2012-01-01;20121231;150;One\n").unwrap();

        let err = FareLoader::new(FareFiles::in_dir(dir.path()))
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::InvalidPriceRow { line: 1, .. }));
    }

    #[test]
    fn missing_file_stops_the_load() {
        let dir = tempdir().unwrap();
        write_fixture(dir.path());
        std::fs::remove_file(dir.path().join("od_fares.csv")).unwrap();

        let err = FareLoader::new(FareFiles::in_dir(dir.path()))
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }
}
