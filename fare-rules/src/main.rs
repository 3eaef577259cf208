use std::process::ExitCode;

use fare_rules::config::LoaderConfig;
use fare_rules::loader::FareLoader;
use fare_rules::snapshot::write_snapshot;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Get file locations from environment
    let config = LoaderConfig::from_env();
    let loader = FareLoader::new(config.files.clone());

    let (data, report) = match loader.load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load fares: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Loaded {} fare keys ({} tickets)",
        data.prices.len(),
        data.prices.ticket_count()
    );
    println!(
        "Loaded {} transitions from {} rows",
        data.transitions.len(),
        report.transition_rows
    );
    println!(
        "Loaded {} OD fares ({} origin-destination pairs)",
        report.od_rows,
        data.od_pair_count()
    );
    println!(
        "{} warnings: {} malformed rows, {} rejected rows, {} unknown tickets",
        report.warnings.len(),
        report.structural_warnings(),
        report.rejected_rows(),
        report.coherence_warnings()
    );

    if let Some(output) = &config.output {
        if let Err(e) = write_snapshot(&data, output) {
            eprintln!("Failed to write snapshot: {e}");
            return ExitCode::FAILURE;
        }
        println!("Wrote fare model to {}", output.display());
    }

    ExitCode::SUCCESS
}
