//! Reading `;`-separated fare files into rows.

use std::borrow::Cow;
use std::path::Path;

use tracing::warn;

use super::error::LoadError;

/// Field separator of every fare file.
const DELIMITER: u8 = b';';

/// One record of a fare file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line in the source file, used in diagnostics.
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new<S: Into<String>>(line: usize, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read every record of a fare file.
///
/// Records may have any number of fields; callers check the layout. When
/// `has_header` is set the first record is skipped. Quotes have no special
/// meaning in fare files. Bytes that are not valid UTF-8 are replaced with
/// U+FFFD so a badly encoded row does not stop the read.
pub fn read_rows(path: &Path, has_header: bool) -> Result<Vec<Row>, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(has_header)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = result.map_err(csv_error)?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);

        let fields: Vec<Cow<'_, str>> = record.iter().map(String::from_utf8_lossy).collect();
        if fields.iter().any(|field| matches!(field, Cow::Owned(_))) {
            warn!(path = %path.display(), line, "Invalid UTF-8 replaced");
        }
        rows.push(Row::new(line, fields));
    }

    Ok(rows)
}
