//! Command-line front end for querying process memory usage.

#![deny(warnings)]
#![deny(missing_docs)]

use clap::Parser;
use process_memusage::{MemoryQuerier as _, Querier, QueryError};
use tracing::error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Queries the calling process's memory usage and prints it.
///
/// Values are in OS-native units: pages when read from procfs, kilobytes when derived from
/// getrusage. Fields the platform cannot supply are reported as -1.
#[derive(Parser)]
#[command(about)]
struct Cli {
    /// Emit the sample as a JSON object instead of plain text.
    #[arg(long)]
    json: bool,

    /// Procfs root to read from, for host-mapped procfs filesystems.
    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[arg(long, default_value = "/proc")]
    procfs_root: std::path::PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), QueryError> {
    let mut querier = build_querier(cli);
    let usage = querier.query()?;

    if cli.json {
        // Five integer fields can't fail to serialize.
        println!("{}", serde_json::to_string(&usage).expect("sample serializes to JSON"));
    } else {
        println!("{}", usage);
    }

    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn build_querier(cli: &Cli) -> Querier {
    process_memusage::ProcfsQuerier::with_procfs_root(&cli.procfs_root)
}

#[cfg(all(unix, not(any(target_os = "linux", target_os = "android"))))]
fn build_querier(_cli: &Cli) -> Querier {
    Querier::default()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::Cli;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
