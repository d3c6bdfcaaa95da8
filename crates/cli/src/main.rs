//! Cache hierarchy simulator CLI.
//!
//! This binary is the sweep driver around `cachesim-core`. It performs:
//! 1. **Trace loading:** Reads the `<kind> <hexAddress>` trace given as the positional argument.
//! 2. **Sweep:** Simulates every configuration of the default sweep, or of a JSON sweep file.
//! 3. **Reporting:** Prints the miss-ratio and memory-write tables, or the same data as JSON.

use std::error::Error as _;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::SweepConfig;
use cachesim_core::sim::{self, Simulator, loader};
use cachesim_core::{SimError, report};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Two-level cache hierarchy simulator (inclusive / exclusive L2)",
    long_about = "Replay a memory access trace against a split L1 backed by a unified L2 for every \
configuration of a sweep, and print L1/L2 miss ratios and memory block writes.\n\n\
Trace lines are `<kind> <hexAddress>` with kind 0 = read, 1 = write, 2 = instruction fetch.\n\n\
Examples:\n  cachesim trace.txt\n  cachesim trace.txt --config sweep.json --format json\n  RUST_LOG=debug cachesim trace.txt --sequential"
)]
struct Cli {
    /// Trace file to replay.
    trace: PathBuf,

    /// JSON sweep description; missing fields use the built-in sweep.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Run configurations one after another instead of in parallel.
    #[arg(long)]
    sequential: bool,

    /// Verify the inclusion / exclusion invariant after every access (slow).
    #[arg(long)]
    check_invariants: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Fixed-width text tables.
    Table,
    /// One JSON object per run.
    Json,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("\n[!] FATAL: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("    caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let mut sweep = match &cli.config {
        Some(path) => SweepConfig::from_json_file(path)?,
        None => SweepConfig::default(),
    };
    if cli.sequential {
        sweep.parallel = false;
    }

    let trace = loader::load_trace(&cli.trace)?;
    if trace.is_empty() {
        warn!(path = %cli.trace.display(), "trace is empty; every miss ratio will be 0");
    }

    if cli.check_invariants {
        check_invariants(&trace, &sweep)?;
    }

    let results = sim::run_sweep(&trace, &sweep);
    for (key, reason) in &results.failures {
        eprintln!("[!] skipped {key:?}: {reason}");
    }

    match cli.format {
        Format::Table => print!("{}", report::render_tables(&results, &sweep)),
        Format::Json => println!("{}", report::to_json(&results)?),
    }
    Ok(())
}

/// Replays every configuration with per-access invariant checks before the real sweep.
fn check_invariants(
    trace: &[cachesim_core::AccessRecord],
    sweep: &SweepConfig,
) -> Result<(), SimError> {
    for key in sim::run_keys(sweep) {
        let config = key.hierarchy(sweep);
        match Simulator::new(trace, &config) {
            Ok(simulator) => {
                let _ = simulator.run_checked()?;
            }
            Err(e) if e.is_configuration() => continue,
            Err(e) => return Err(e),
        }
    }
    info!("containment invariants hold for every configuration");
    Ok(())
}
