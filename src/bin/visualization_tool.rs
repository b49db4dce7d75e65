//! FIRST source visualization tool
//!
//! Plots every FIRST source within a radius of a position or a named source,
//! coloured by SDSS classification and sized by integrated flux.
//!
//! Usage:
//!   cargo run --bin visualization_tool -- --ra 338.12 --dec 11.53
//!   cargo run --bin visualization_tool -- -s J223228.8+113152 -r 0.5

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use firstfield::config::validate_radius;
use firstfield::presentation::{run_plot_query, QueryRequest};
use firstfield::query::resolve::{CoordinateInput, NoInput, PromptInput};
use firstfield::{Loader, ToolConfig};

/// FIRST source visualization tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plots FIRST sources within a radius of a sky position",
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

    /// Search radius, in degrees (default 0.25)
    #[arg(short, long)]
    radius: Option<f64>,

    /// FIRST source around which to perform the query
    #[arg(short, long)]
    source: Option<String>,

    /// Catalog file (CSV or gzipped CSV)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Directory to write the plot image and plot.html into
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

    let radius_deg = args.radius.unwrap_or(config.plot_radius_deg);
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

    let report = run_plot_query(&loader, &request, input.as_mut(), &output_dir)?;

    println!("{}", report.title);
    println!(
        "Done! View your result by opening {}",
        report.html_path.display()
    );
    Ok(())
}
