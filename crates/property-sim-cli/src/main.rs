mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::credit::ScoreArgs;
use commands::land::LookupArgs;
use commands::simulate::SimulateArgs;
use commands::Runtime;
use property_sim_core::simulation::config::{
    SimulatorConfig, DEFAULT_SIMILARITY_CUTOFF, LAND_DATA_ENV, SIMILARITY_CUTOFF_ENV,
};

/// Real-estate investment simulation for bank financing
#[derive(Parser)]
#[command(
    name = "psim",
    version,
    about = "Real-estate acquisition, appraisal and loan serviceability simulation",
    long_about = "Simulates the purchase of an income property the way a lending bank \
                  sees it: acquisition costs, year-1 operations, cost/income approach \
                  appraisal, DSCR x LTV credit score, the largest A-rank loan and a \
                  35-year cash flow projection."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Reference land price CSV (所在地,価格)
    #[arg(long, global = true, env = LAND_DATA_ENV)]
    land_data: Option<PathBuf>,

    /// Minimum address similarity for a reference match
    #[arg(long, global = true, env = SIMILARITY_CUTOFF_ENV, default_value_t = DEFAULT_SIMILARITY_CUTOFF)]
    cutoff: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full simulation for one property
    Simulate(SimulateArgs),
    /// Look up the reference land price nearest an address
    Lookup(LookupArgs),
    /// Score a financing plan and size the largest A-rank loan
    Score(ScoreArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let runtime = match Runtime::from_config(&SimulatorConfig {
        land_data_path: cli.land_data.clone(),
        similarity_cutoff: cli.cutoff,
    }) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args, &runtime),
        Commands::Lookup(args) => commands::land::run_lookup(args, &runtime),
        Commands::Score(args) => commands::credit::run_score(args),
        Commands::Version => {
            println!("psim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
