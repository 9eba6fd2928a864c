use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::models::FullReport;

/// Write a report to `<output_dir>/<STATE>-<reference_date><warnings_slug>.csv`
/// and return the path. The slug makes troubled reports stand out in the
/// output directory.
pub fn export_report(report: &mut FullReport, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let slug = report.warnings_slug();
    let filename = format!("{}-{}{}.csv", report.state, report.reference_date, slug);
    let path = output_dir.join(filename);

    let mut writer = csv::Writer::from_path(&path)?;
    for row in report.to_rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Exported {} to {}", report, path.display());
    Ok(path)
}
