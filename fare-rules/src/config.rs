//! Where the fare files live and where the compiled model goes.

use std::path::{Path, PathBuf};

/// Default file names inside a fare directory.
const PRICES_FILE: &str = "prices.csv";
const TRANSITIONS_FILE: &str = "fares.csv";
const OD_FILE: &str = "od_fares.csv";

/// Paths of the three fare files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareFiles {
    /// Ticket prices per fare key.
    pub prices: PathBuf,
    /// Transition rules between travel states.
    pub transitions: PathBuf,
    /// Origin-destination fares.
    pub od: PathBuf,
}

impl FareFiles {
    /// Use the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            prices: dir.join(PRICES_FILE),
            transitions: dir.join(TRANSITIONS_FILE),
            od: dir.join(OD_FILE),
        }
    }

    /// Set a custom prices file.
    pub fn with_prices(mut self, path: impl Into<PathBuf>) -> Self {
        self.prices = path.into();
        self
    }

    /// Set a custom transitions file.
    pub fn with_transitions(mut self, path: impl Into<PathBuf>) -> Self {
        self.transitions = path.into();
        self
    }

    /// Set a custom OD file.
    pub fn with_od(mut self, path: impl Into<PathBuf>) -> Self {
        self.od = path.into();
        self
    }
}

impl Default for FareFiles {
    fn default() -> Self {
        // Fare files in the current directory
        Self::in_dir(".")
    }
}

/// Configuration of the `fare-rules` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    pub files: FareFiles,
    /// Where to write the compiled model as JSON, if anywhere.
    pub output: Option<PathBuf>,
}

impl LoaderConfig {
    /// Read the configuration from environment variables.
    ///
    /// `FARE_DIR` selects the directory holding the default file names;
    /// `FARE_PRICES`, `FARE_TRANSITIONS` and `FARE_OD` override single
    /// files; `FARE_OUTPUT` enables the JSON snapshot.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut files = match var("FARE_DIR") {
            Some(dir) => FareFiles::in_dir(dir),
            None => FareFiles::default(),
        };
        if let Some(path) = var("FARE_PRICES") {
            files = files.with_prices(path);
        }
        if let Some(path) = var("FARE_TRANSITIONS") {
            files = files.with_transitions(path);
        }
        if let Some(path) = var("FARE_OD") {
            files = files.with_od(path);
        }

        Self {
            files,
            output: var("FARE_OUTPUT").map(PathBuf::from),
        }
    }
}
