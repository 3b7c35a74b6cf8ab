use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use shipdash::runtime::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use shipdash::{build_dashboard, DashboardConfig, RenderOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Largest accepted chart side in pixels
const MAX_CHART_SIDE: i64 = 8192;

#[derive(Parser, Debug)]
#[command(name = "shipdash")]
#[command(about = "Render a static shipping dashboard (four PNG charts + index.html) from CSV", long_about = None)]
struct Args {
    /// Shipment CSV with Warehouse_block, Mode_of_Shipment, Customer_rating and Weight_in_gms columns
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory receiving the charts and index.html (created if missing)
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value_t = RenderOptions::default().width, value_parser = clap::value_parser!(u32).range(1..=MAX_CHART_SIDE))]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = RenderOptions::default().height, value_parser = clap::value_parser!(u32).range(1..=MAX_CHART_SIDE))]
    height: u32,

    /// Print the computed aggregations as JSON on stdout
    #[arg(long)]
    summary: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("SHIPDASH_LOG", "warn,shipdash=info"))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Dashboard run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = DashboardConfig {
        input: args.input,
        output_dir: args.output_dir,
        render: RenderOptions {
            width: args.width,
            height: args.height,
        },
    };

    let summary = build_dashboard(&config)?;

    if args.summary {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    }

    Ok(())
}
