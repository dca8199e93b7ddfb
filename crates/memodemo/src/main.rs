//! memodemo - walkthrough of the memocache memoizer

mod report;
mod scenarios;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use crate::report::Reporter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// f(x) = 2x keyed by value
    Doubling,
    /// Character lookup keyed by address
    Identity,
    /// Mutable handle returned from the cache
    SharedOutput,
    /// Run every scenario in order
    All,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Cache capacity for every scenario (<= 0 disables caching)
    #[arg(short, long, allow_negative_numbers = true)]
    capacity: Option<i64>,

    /// Print one JSON object per call instead of text
    #[arg(long)]
    json: bool,

    /// Log every cache event
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting memodemo v{}", env!("CARGO_PKG_VERSION"));
    if let Some(capacity) = args.capacity {
        info!("Capacity override: {}", capacity);
    }

    let mut reporter = Reporter::new(args.json);
    match args.scenario {
        Scenario::Doubling => scenarios::doubling(&mut reporter, args.capacity)?,
        Scenario::Identity => scenarios::identity(&mut reporter, args.capacity)?,
        Scenario::SharedOutput => scenarios::shared_output(&mut reporter, args.capacity)?,
        Scenario::All => {
            scenarios::doubling(&mut reporter, args.capacity)?;
            scenarios::identity(&mut reporter, args.capacity)?;
            scenarios::shared_output(&mut reporter, args.capacity)?;
        }
    }

    info!("All scenarios behaved as expected");
    Ok(())
}
