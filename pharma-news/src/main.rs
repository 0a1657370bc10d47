use anyhow::Context;
use clap::{Parser, ValueEnum};
use pharma_news::render::{render_json, render_markdown};
use pharma_news::{DashboardConfig, DashboardError, NewsAggregator};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

/// Pharma news grouped by therapy area.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON object mapping source names to feed URLs
    #[arg(long, default_value = "rss_sources.json")]
    sources: PathBuf,

    /// JSON object mapping therapy areas to keyword lists
    #[arg(long, default_value = "therapy_areas.json")]
    areas: PathBuf,

    /// Therapy area to show (defaults to the first configured area)
    #[arg(long, conflicts_with = "all")]
    area: Option<String>,

    /// Show every therapy area
    #[arg(long)]
    all: bool,

    /// Only keep articles published within this many days
    #[arg(long, default_value_t = pharma_news::config::DEFAULT_WINDOW_DAYS)]
    window_days: i64,

    /// Also fetch each article page and match keywords against its body
    #[arg(long)]
    full_text: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Print the configured therapy areas and exit
    #[arg(long)]
    list_areas: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = DashboardConfig::from_files(&cli.sources, &cli.areas)
        .context("failed to load dashboard configuration")?
        .with_window_days(cli.window_days)?
        .with_full_text(cli.full_text);

    if cli.list_areas {
        for name in config.area_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let selected: Vec<String> = if cli.all {
        config.area_names().into_iter().map(String::from).collect()
    } else {
        match cli.area {
            Some(name) => vec![config.therapy_area(&name)?.name.clone()],
            None => config.area_names().into_iter().take(1).map(String::from).collect(),
        }
    };

    let window_days = config.window_days;
    let aggregator = NewsAggregator::from_config(config)?;
    let grouped = aggregator.run_cycle().await;

    let buckets = selected
        .iter()
        .map(|name| {
            grouped.bucket(name).ok_or_else(|| DashboardError::UnknownArea {
                name: name.clone(),
                available: grouped.area_names().into_iter().map(String::from).collect(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match cli.format {
        OutputFormat::Markdown => {
            for bucket in &buckets {
                print!("{}", render_markdown(bucket, window_days));
            }
        }
        OutputFormat::Json => println!("{}", render_json(&buckets)?),
    }

    info!("Rendered {} therapy areas", buckets.len());
    Ok(())
}
