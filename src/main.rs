//! logic-scheme - Digital Logic Scheme Simulator
//!
//! Builds a scheme from a command script and prints the evaluated outputs.
//!
//! # Usage
//!
//! ```bash
//! logic-scheme circuit.lsc --elements -v
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use logic_scheme::{
    error::Result,
    scheme::{find_feedback, Scheme},
    script, EngineConfig, DEFAULT_MAX_TICKS,
};

/// Digital logic scheme simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the command script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Maximum period-detection ticks per run
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: usize,

    /// Print every element with its type, position and connections
    #[arg(long)]
    elements: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();
}

fn print_elements(scheme: &Scheme) {
    for element in scheme {
        println!(
            "{} {} at {}",
            element.id(),
            element.element_type(),
            element.position()
        );
        for connection in element.outputs().values().flatten() {
            println!("    {}", connection);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Parse the script
    let script = script::parse_file(&args.script)?;
    info!(commands = script.statements.len(), "script loaded");

    // Build and evaluate
    let config = EngineConfig::new().with_max_ticks(args.max_ticks);
    let mut scheme = Scheme::with_config(config);
    let mut reports = script::execute(&mut scheme, &script)?;

    if let Some(ring) = find_feedback(&scheme) {
        let names: Vec<&str> = ring.iter().map(|id| id.as_str()).collect();
        warn!(elements = ?names, "scheme contains feedback; oscillating pins print as X");
    }

    if !script.has_run() {
        reports.push(scheme.run()?);
    }

    if args.elements {
        print_elements(&scheme);
        println!();
    }

    for (i, report) in reports.iter().enumerate() {
        if reports.len() > 1 {
            println!("# run {}", i + 1);
        }
        print!("{}", report);
    }

    Ok(())
}
