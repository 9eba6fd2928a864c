use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::constants::State;
use crate::error::Result;
use crate::exporter;
use crate::models::{Bulletin, FullReport};
use crate::registry;

/// Summary of one consolidated report, ready for run output.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationSummary {
    pub state: String,
    pub reference_date: NaiveDate,
    pub county_bulletins: usize,
    pub official_totals: usize,
    pub total_confirmed_cases: Option<u64>,
    pub total_deaths: Option<u64>,
    pub confirmed_cases_check: bool,
    pub death_cases_check: bool,
    pub warnings_slug: String,
    pub warnings: Vec<String>,
    pub output_file: Option<String>,
}

/// Result of a complete consolidation run
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub total_bulletins: usize,
    pub summaries: Vec<ConsolidationSummary>,
    pub errors: Vec<String>,
}

pub struct LoadedBulletins {
    pub bulletins: Vec<Bulletin>,
    pub errors: Vec<String>,
}

/// Load bulletins from a JSON file, or from every `.json` file in a
/// directory. Each file holds an array of records; records that fail to
/// deserialize are reported and skipped, not fatal.
pub fn load_bulletins(input: impl AsRef<Path>) -> Result<LoadedBulletins> {
    let input = input.as_ref();
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in fs::read_dir(input)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();
    } else {
        files.push(input.to_path_buf());
    }

    let mut bulletins = Vec::new();
    let mut errors = Vec::new();
    for file in files {
        let content = fs::read_to_string(&file)?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&content)?;
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Bulletin>(record) {
                Ok(bulletin) => bulletins.push(bulletin),
                Err(e) => {
                    let message = format!("Skipping record {} in {}: {}", index, file.display(), e);
                    warn!("{}", message);
                    errors.push(message);
                }
            }
        }
    }

    debug!(
        "Loaded {} bulletins ({} records skipped)",
        bulletins.len(),
        errors.len()
    );
    Ok(LoadedBulletins { bulletins, errors })
}

/// Group bulletins by state and reference date and reconcile each group into
/// a report. A state without a registered scraper fails its own group only;
/// the rest of the run continues.
#[instrument(skip(bulletins, config))]
pub fn consolidate(
    bulletins: Vec<Bulletin>,
    config: &Config,
    date_filter: Option<NaiveDate>,
    export: bool,
) -> Result<RunResult> {
    let total_bulletins = bulletins.len();
    let mut groups: BTreeMap<(State, NaiveDate), Vec<Bulletin>> = BTreeMap::new();
    for bulletin in bulletins {
        if let Some(date) = date_filter {
            if bulletin.date() != date {
                continue;
            }
        }
        groups
            .entry((bulletin.state(), bulletin.date()))
            .or_default()
            .push(bulletin);
    }

    info!(
        "Consolidating {} report(s) from {} bulletin(s)",
        groups.len(),
        total_bulletins
    );

    let mut summaries = Vec::new();
    let mut errors = Vec::new();
    for ((state, reference_date), group) in groups {
        let Some(qualities) = registry::expected_qualities(state) else {
            let message = format!(
                "No scraper registered for {}: dropping {} bulletin(s) dated {}",
                state,
                group.len(),
                reference_date
            );
            warn!("{}", message);
            errors.push(message);
            continue;
        };

        let published_at =
            reference_date + Duration::days(config.consolidation.publication_delay_days);
        let mut report = FullReport::new(reference_date, published_at, state, qualities.to_vec())?;
        for bulletin in group {
            report.add_new_bulletin(bulletin);
        }

        let warnings_slug = report.warnings_slug();
        let output_file = if export {
            let path = exporter::export_report(&mut report, &config.export.output_dir)?;
            Some(path.to_string_lossy().to_string())
        } else {
            None
        };

        debug!("Consolidated {}", report);
        summaries.push(build_summary(&report, warnings_slug, output_file));
    }

    Ok(RunResult {
        total_bulletins,
        summaries,
        errors,
    })
}

/// Load, consolidate and optionally export in one go.
pub fn run(
    input: impl AsRef<Path>,
    config: &Config,
    date_filter: Option<NaiveDate>,
    export: bool,
) -> Result<RunResult> {
    let loaded = load_bulletins(input)?;
    let result = consolidate(loaded.bulletins, config, date_filter, export)?;

    let mut errors = loaded.errors;
    errors.extend(result.errors);
    Ok(RunResult { errors, ..result })
}

fn build_summary(
    report: &FullReport,
    warnings_slug: String,
    output_file: Option<String>,
) -> ConsolidationSummary {
    let warnings = report
        .warnings()
        .map(|warning| match &warning.description {
            Some(description) => format!("{}: {}", warning.kind.as_slug(), description),
            None => warning.kind.as_slug().to_string(),
        })
        .collect();

    ConsolidationSummary {
        state: report.state.to_string(),
        reference_date: report.reference_date,
        county_bulletins: report.county_bulletin_count(),
        official_totals: report.official_total_bulletins().len(),
        total_confirmed_cases: report.total_bulletin().confirmed_cases,
        total_deaths: report.total_bulletin().deaths,
        confirmed_cases_check: report.check_total_confirmed_cases(),
        death_cases_check: report.check_total_death_cases(),
        warnings_slug,
        warnings,
        output_file,
    }
}
