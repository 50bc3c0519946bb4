use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use sales_datagen::config::{Config, ConfigOverrides};
use sales_datagen::constants::DATE_FORMAT;
use sales_datagen::logging;
use sales_datagen::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "sales_datagen")]
#[command(about = "Synthetic sales and inventory-log generator for bulk database loads")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file (defaults to ./sales_datagen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load metadata, plan the distribution and write both output files
    Generate {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Load metadata and print the per-customer plan summary without writing records
    Plan {
        #[command(flatten)]
        run: RunArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Total number of sales records to generate
    #[arg(long)]
    total_target: Option<u64>,
    /// Last possible order date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,
    /// Join dates earlier than this are moved up to it (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    floor_date: Option<NaiveDate>,
    /// Metadata file with customer and product lines
    #[arg(long)]
    input: Option<PathBuf>,
    /// Sales output file
    #[arg(long)]
    sales_output: Option<PathBuf>,
    /// Inventory-log output file
    #[arg(long)]
    inventory_output: Option<PathBuf>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl From<RunArgs> for ConfigOverrides {
    fn from(args: RunArgs) -> Self {
        Self {
            total_target: args.total_target,
            end_date: args.end_date,
            floor_date: args.floor_date,
            input: args.input,
            sales_output: args.sales_output,
            inventory_output: args.inventory_output,
            seed: args.seed,
        }
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

fn load_config(path: Option<&PathBuf>, run: RunArgs) -> Result<Config> {
    let mut config = Config::load(path.map(PathBuf::as_path)).context("failed to load configuration")?;
    config.apply_overrides(run.into());
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_guard = logging::init_logging();

    if let Err(e) = run(cli) {
        error!("Run failed: {:#}", e);
        // process::exit skips destructors, so flush the file log first
        drop(log_guard);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { run } => {
            let config = load_config(cli.config.as_ref(), run)?;
            let mut rng = Pipeline::rng_for(&config.generation);

            println!("🔄 Generating {} sales records...", config.generation.total_target);
            let summary = Pipeline::generate(&config, &mut rng).with_context(|| {
                format!("generation from '{}' failed", config.paths.input.display())
            })?;

            println!("\n📊 Generation Results:");
            println!("   Customers: {}", summary.customers);
            println!("   Products: {}", summary.products);
            println!("   Records written: {}", summary.records_written);
            println!("   Sales file: {}", summary.sales_path.display());
            println!("   Inventory file: {}", summary.inventory_path.display());
        }
        Commands::Plan { run, json } => {
            let config = load_config(cli.config.as_ref(), run)?;
            let mut rng = Pipeline::rng_for(&config.generation);

            let planned = Pipeline::plan(&config, &mut rng).with_context(|| {
                format!("planning from '{}' failed", config.paths.input.display())
            })?;
            let summary = planned.plan.summary();

            if json {
                let body = serde_json::json!({
                    "products": planned.metadata.products.len(),
                    "plan": summary,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("📋 Plan for {} customers:", summary.customers);
                println!("   Products: {}", planned.metadata.products.len());
                println!("   Total records: {}", summary.total);
                println!("   Min per customer: {}", summary.min);
                println!("   Max per customer: {}", summary.max);
                println!("   Mean per customer: {:.2}", summary.mean);
            }
        }
    }
    Ok(())
}
