//! Phasor - AC Steady-State Circuit Analyzer
//!
//! Solves a linear circuit at the single frequency of its sources.
//!
//! # Usage
//!
//! ```bash
//! phasor circuit.net
//! phasor circuit.net --json --pretty -vv
//! ```

use std::path::PathBuf;

use clap::Parser;
use phasor_core::{dsl, error::Result, Analyzer, AnalyzerConfig};
use tracing::Level;

/// AC steady-state circuit analyzer (Modified Nodal Analysis)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST_FILE")]
    netlist_file: PathBuf,

    /// Print the result as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Indent JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Pivot magnitude (row-scaled system) below which the circuit is declared singular
    #[arg(long, default_value_t = phasor_core::solver::DEFAULT_PIVOT_TOLERANCE)]
    pivot_tolerance: f64,

    /// Impedance angle (degrees) still reported as unity power factor
    #[arg(long, default_value_t = phasor_core::solver::DEFAULT_UNITY_TOLERANCE_DEG)]
    unity_tolerance: f64,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Parse the netlist file
    let netlist = dsl::parse_file(&args.netlist_file)?;
    tracing::info!(components = netlist.len(), "netlist parsed");

    // Analyze
    let config = AnalyzerConfig::new()
        .with_pivot_tolerance(args.pivot_tolerance)
        .with_unity_tolerance_deg(args.unity_tolerance);
    let result = Analyzer::with_config(config).solve(&netlist)?;

    if args.json {
        let json = if args.pretty {
            result.to_json_pretty()?
        } else {
            result.to_json()?
        };
        println!("{json}");
    } else {
        print!("{result}");
    }

    Ok(())
}
