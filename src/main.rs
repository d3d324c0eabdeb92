//! CLI entry point for the COVID tracker pipeline.
//!
//! One linear run: resolve a data source, clean the records, aggregate,
//! render the chart set, export the cleaned CSV.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use covid_tracker::aggregate::{country_snapshot, global_time_series};
use covid_tracker::charts::{
    ComparisonMetric, GLOBAL_TRENDS_FILE, comparison_path, render_country_comparison,
    render_global_trends,
};
use covid_tracker::clean::clean_records;
use covid_tracker::fetch::{BasicClient, DataSource, load_dataset};
use covid_tracker::output::{CLEAN_DATA_FILE, DatasetSummary, print_json, write_clean_csv};
use covid_tracker::parser::parse_records;

const PRIMARY_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";
const MIRROR_URL: &str =
    "https://raw.githubusercontent.com/owid/covid-19-data/master/public/data/owid-covid-data.csv";

/// Countries shown in each comparison chart.
const TOP_N: usize = 15;

#[derive(Parser)]
#[command(name = "covid_tracker")]
#[command(about = "Clean and chart worldwide COVID-19 trends", long_about = None)]
struct Cli {
    /// Local dataset tried before the remote sources
    #[arg(short, long, default_value = "sample_data/owid-covid-data.csv")]
    data: PathBuf,

    /// Directory the charts and the cleaned CSV are written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    tracing_subscriber::registry().with(stderr_layer).init();

    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("could not create {}", cli.output_dir.display()))?;

    let sources = [
        DataSource::Local(cli.data.clone()),
        DataSource::Remote(PRIMARY_URL.to_string()),
        DataSource::Remote(MIRROR_URL.to_string()),
    ];

    let client = BasicClient::new();
    let loaded = load_dataset(&client, &sources)?;
    info!(source = %loaded.source, "dataset resolved");

    let raw = parse_records(&loaded.bytes).context("input does not match the expected schema")?;
    info!(rows = raw.len(), "raw records parsed");

    let clean = clean_records(raw);
    ensure!(!clean.is_empty(), "no usable rows left after cleaning");

    if let Some(summary) = DatasetSummary::from_records(&clean) {
        print_json(&summary)?;
    }

    let series = global_time_series(&clean);
    let snapshot = country_snapshot(&clean);

    render_global_trends(&series, &cli.output_dir.join(GLOBAL_TRENDS_FILE))?;
    for metric in ComparisonMetric::ALL {
        render_country_comparison(
            &snapshot,
            metric,
            TOP_N,
            &comparison_path(&cli.output_dir, metric),
        )?;
    }

    write_clean_csv(&cli.output_dir.join(CLEAN_DATA_FILE), &clean)?;

    info!(output_dir = %cli.output_dir.display(), "analysis complete");
    Ok(())
}
