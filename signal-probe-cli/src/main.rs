//! Signal Probe CLI Application
//!
//! Command-line front end for the signal-store library. It packages four
//! small runtime probes that used to require an interactive shell:
//! - Synchronous post-save dispatch (does the save wait for its handlers?)
//! - Handler thread identity
//! - Handler writes under a rolled-back transaction
//! - Custom iteration over a rectangle's dimensions
//!
//! Probes print their observations; nothing is asserted here. See the
//! signal-store test suite for the asserted semantics.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

mod config;
mod probes;

use probes::Probe;

/// Signal Probe - exercise record-save signals and transaction scoping
#[derive(Parser, Debug)]
#[command(name = "signal-probe-cli")]
#[command(about = "Run record-save signal and transaction probes", long_about = None)]
#[command(version)]
struct Args {
    /// Probe(s) to run (sync, thread, transaction, iteration); default: all
    #[arg(short, long, value_name = "NAME")]
    probe: Vec<String>,

    /// List available probes and exit
    #[arg(long)]
    list: bool,

    /// Path to configuration file (probes.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the slow handler's sleep duration in milliseconds
    #[arg(long, value_name = "MS")]
    sleep_ms: Option<u64>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Signal Probe CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using store library v{}", signal_store::VERSION);

    if args.list {
        println!("Available probes:");
        for probe in Probe::ALL {
            println!("  {:12} {}", probe.name(), probe.description());
        }
        return Ok(());
    }

    // Load configuration, then apply flag overrides
    let mut cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::ProbeConfig::default(),
    };
    if let Some(ms) = args.sleep_ms {
        cfg.sleep_ms = ms;
    }

    // Resolve the probe selection
    let selected: Vec<Probe> = if args.probe.is_empty() {
        Probe::ALL.to_vec()
    } else {
        let mut selected = Vec::new();
        for name in &args.probe {
            match Probe::from_name(name) {
                Some(probe) => selected.push(probe),
                None => bail!(
                    "unknown probe '{}' (expected one of: sync, thread, transaction, iteration)",
                    name
                ),
            }
        }
        selected
    };

    println!("═══════════════════════════════════════════════");
    println!("  Signal Probes");
    println!("═══════════════════════════════════════════════");

    for probe in selected {
        probe.run(&cfg)?;
    }
    println!();

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
