// In app/src/main.rs

use std::str::FromStr;
use std::sync::Arc;

use analytics::TickerReport;
use anyhow::Result;
use api_client::HistorySource;
use app_config::Settings;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use web_server::service;
use web_server::types::{ScreenEntry, ScreenStatus};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Compares a stock's price with its 200-week moving average.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the web interface.
    Serve,

    /// Analyzes a single ticker and prints the result.
    Analyze {
        /// The ticker symbol to analyze (e.g., "AAPL", "RELIANCE.NS").
        #[arg(short, long)]
        ticker: String,
    },

    /// Screens a configured watchlist.
    Screen {
        /// The watchlist name from `config/watchlists.toml` (e.g., "fno").
        #[arg(short, long)]
        watchlist: String,

        /// Only screen symbols starting with this prefix.
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);
    tracing::info!(environment = %settings.app.environment, "Application settings loaded successfully.");

    let source: Arc<dyn HistorySource> = Arc::new(api_client::new(&settings.market_data)?);

    match cli.command {
        Commands::Serve => {
            let watchlists = app_config::load_watchlists()?;
            tracing::info!(watchlists = watchlists.watchlists.len(), "Watchlists loaded.");
            web_server::run(settings, watchlists, source).await?;
        }
        Commands::Analyze { ticker } => {
            let report = service::analyze_ticker(source.as_ref(), &settings.analysis, &ticker).await?;
            print_report(&report);
        }
        Commands::Screen { watchlist, query } => {
            handle_screen(&settings, source.as_ref(), &watchlist, &query).await?;
        }
    }

    Ok(())
}

/// Sets up the fmt layer with the configured default level.
fn init_tracing(log_level: &str) {
    let level = tracing::Level::from_str(log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper_util", tracing::Level::WARN) // Connection pool chatter
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Handles the logic for the `screen` subcommand.
async fn handle_screen(
    settings: &Settings,
    source: &dyn HistorySource,
    name: &str,
    query: &str,
) -> Result<()> {
    let watchlists = app_config::load_watchlists()?;
    let Some(watchlist) = watchlists.find(name) else {
        anyhow::bail!(
            "Unknown watchlist '{}'. Configured: {}",
            name,
            watchlists.names().join(", ")
        );
    };

    let entries = service::screen_watchlist(source, &settings.analysis, watchlist, query).await;
    if entries.is_empty() {
        println!("No symbols in '{}' match '{}'.", watchlist.name, query);
        return Ok(());
    }

    print_screen(&entries, settings.analysis.window_weeks);
    Ok(())
}

/// Helper function to print a single-ticker report.
fn print_report(report: &TickerReport) {
    let analysis = &report.analysis;
    println!("\n--- {} ---", report.ticker);
    println!("  {}-week average: {:.2}", report.window, analysis.window_average);
    println!("  Latest price:    {:.2}", analysis.latest_price);
    println!("  Deviation:       {:+.2}%", analysis.deviation_pct);
    println!("  Weeks used:      {} of {} available", report.weeks_used, report.weeks_available);
    println!("\nRecommendation: {} ({})", analysis.recommendation, report.summary);
}

/// Helper function to print a watchlist screen as a table.
fn print_screen(entries: &[ScreenEntry], window: usize) {
    let average_header = format!("{}W AVG", window);
    println!("\n{:<14} {:>12} {:>12}  STATUS", "SYMBOL", "PRICE", average_header);
    println!("{}", "-".repeat(50));

    for entry in entries {
        let price = entry.price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".into());
        let average = entry
            .window_average
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "-".into());
        let status = match &entry.status {
            ScreenStatus::Success => "ok".to_string(),
            ScreenStatus::NoData => "no data".to_string(),
            ScreenStatus::Error(e) => format!("error: {}", e),
        };
        println!("{:<14} {:>12} {:>12}  {}", entry.symbol, price, average, status);
    }
}
