use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use covid_consolidator::config::Config;
use covid_consolidator::logging;
use covid_consolidator::normalization;
use covid_consolidator::pipeline::{self, RunResult};
use covid_consolidator::registry;

#[derive(Parser)]
#[command(name = "covid_consolidator")]
#[command(about = "Consolidates scraped COVID-19 bulletins into daily per-state reports")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate bulletins and export the resulting reports as CSV
    Consolidate {
        /// JSON file, or directory of JSON files, with scraped bulletins
        #[arg(long)]
        input: String,
        /// Directory the CSV reports are written to
        #[arg(long)]
        output: Option<String>,
        /// Only consolidate bulletins for this date (e.g. 2021-05-01 or 01/05/2021)
        #[arg(long)]
        date: Option<String>,
        /// Days between a bulletin's reference date and its publication
        #[arg(long)]
        publication_delay: Option<i64>,
    },
    /// Consolidate and cross-check without writing any files
    Check {
        /// JSON file, or directory of JSON files, with scraped bulletins
        #[arg(long)]
        input: String,
        /// Only check bulletins for this date
        #[arg(long)]
        date: Option<String>,
    },
    /// List the states with a registered scraper
    States,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Consolidate {
            input,
            output,
            date,
            publication_delay,
        } => {
            println!("🔄 Consolidating bulletins from {}...", input);

            let mut config = Config::load_or_default();
            if let Some(output_dir) = output {
                config.export.output_dir = output_dir;
            }
            if let Some(delay) = publication_delay {
                config.consolidation.publication_delay_days = delay;
            }
            let date_filter = parse_date_arg(date.as_deref())?;

            match pipeline::run(&input, &config, date_filter, true) {
                Ok(result) => print_run_result(&result),
                Err(e) => {
                    error!("Consolidation failed: {}", e);
                    println!("❌ Consolidation failed: {}", e);
                }
            }
        }
        Commands::Check { input, date } => {
            println!("🔍 Checking bulletins from {}...", input);

            let config = Config::load_or_default();
            let date_filter = parse_date_arg(date.as_deref())?;

            match pipeline::run(&input, &config, date_filter, false) {
                Ok(result) => print_run_result(&result),
                Err(e) => {
                    error!("Check failed: {}", e);
                    println!("❌ Check failed: {}", e);
                }
            }
        }
        Commands::States => {
            println!("📋 States with a registered scraper:");
            for (state, qualities) in registry::supported_states() {
                let labels: Vec<&str> = qualities.iter().map(|quality| quality.as_str()).collect();
                println!("   {} ({})", state, labels.join(", "));
            }
        }
    }
    Ok(())
}

fn parse_date_arg(date: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    match date {
        Some(raw) => Ok(Some(normalization::parse_date_flexible(raw)?)),
        None => Ok(None),
    }
}

fn print_run_result(result: &RunResult) {
    info!("Consolidation finished");
    println!("\n📊 Consolidation results:");
    println!("   Bulletins read: {}", result.total_bulletins);
    println!("   Reports: {}", result.summaries.len());

    for summary in &result.summaries {
        println!("\n   {} - {}:", summary.state, summary.reference_date);
        println!("      Counties: {}", summary.county_bulletins);
        println!("      Official totals: {}", summary.official_totals);
        println!(
            "      Total: confirmed={}, deaths={}",
            format_count(summary.total_confirmed_cases),
            format_count(summary.total_deaths)
        );
        println!(
            "      Cross-checks: confirmed {}, deaths {}",
            check_mark(summary.confirmed_cases_check),
            check_mark(summary.death_cases_check)
        );
        if let Some(output_file) = &summary.output_file {
            println!("      Output file: {}", output_file);
        }
        if !summary.warnings.is_empty() {
            println!("      ⚠️  Warnings:");
            for warning in &summary.warnings {
                println!("         - {}", warning.replace('\n', "\n           "));
            }
        }
    }

    if !result.errors.is_empty() {
        warn!(
            "{} errors encountered during consolidation",
            result.errors.len()
        );
        println!("\n⚠️  Errors encountered:");
        for error in &result.errors {
            println!("   - {}", error);
        }
    }
}

fn check_mark(passed: bool) -> &'static str {
    if passed {
        "✅"
    } else {
        "❌"
    }
}

fn format_count(count: Option<u64>) -> String {
    count
        .map(|value| value.to_string())
        .unwrap_or_else(|| "?".to_string())
}
