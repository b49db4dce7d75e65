//! FIRST source table tool
//!
//! Finds every FIRST source within a radius of a position or a named source
//! and writes them, nearest first, to an HTML table.
//!
//! Usage:
//!   cargo run --bin table_tool -- --ra 338.12 --dec 11.53 -r 1.5
//!   cargo run --bin table_tool -- -s J223228.8+113152

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use firstfield::config::validate_radius;
use firstfield::presentation::{run_table_query, QueryRequest};
use firstfield::query::resolve::{CoordinateInput, NoInput, PromptInput};
use firstfield::{Loader, ToolConfig};

/// FIRST source table tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Lists FIRST sources within a radius of a sky position as an HTML table",
    long_about = None,
    allow_negative_numbers = true
)]
struct Args {
    /// Right ascension of your chosen position, in decimal degrees
    #[arg(long)]
    ra: Option<f64>,

    /// Declination of your chosen position, in decimal degrees
    #[arg(long)]
    dec: Option<f64>,

    /// Search radius, in degrees (default 1.0)
    #[arg(short, long)]
    radius: Option<f64>,

    /// FIRST source around which to perform the query
    #[arg(short, long)]
    source: Option<String>,

    /// Catalog file (CSV or gzipped CSV)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Directory to write table.html into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail instead of prompting when a coordinate is missing
    #[arg(long, action = ArgAction::SetTrue)]
    no_prompt: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ToolConfig::load(args.config.as_deref())?;

    let radius_deg = args.radius.unwrap_or(config.table_radius_deg);
    validate_radius("radius", radius_deg)?;

    let loader = Loader::new().first_catalog(args.catalog.unwrap_or(config.catalog_path));
    let output_dir = args.output_dir.unwrap_or(config.output_dir);
    let request = QueryRequest {
        ra: args.ra,
        dec: args.dec,
        source: args.source,
        radius_deg,
    };

    let mut input: Box<dyn CoordinateInput> = if config.interactive && !args.no_prompt {
        Box::new(PromptInput::stdio())
    } else {
        Box::new(NoInput)
    };

    let report = run_table_query(&loader, &request, input.as_mut(), &output_dir)?;

    println!(
        "Done! {} sources found. View your result by opening {}",
        report.outcome.results.len(),
        report.path.display()
    );
    Ok(())
}
