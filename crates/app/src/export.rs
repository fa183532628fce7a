//! Report artifact writer.
//!
//! Spreadsheet rendering and mail delivery are downstream collaborators;
//! this binary's obligation ends at well-formed JSON artifacts, one per
//! window. A degraded (empty) result is still written - its `complete`
//! flag is false, so downstream rendering can label it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use transtat_domain::{AggregateResult, ReportError, Result};

/// Write the monthly and year-to-date artifacts into `output_dir`.
///
/// Returns the written paths in (monthly, ytd) order.
pub fn write_reports(
    output_dir: &Path,
    monthly: &AggregateResult,
    ytd: &AggregateResult,
    generated_at: DateTime<Utc>,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir).map_err(|err| {
        ReportError::Io(format!("cannot create {}: {err}", output_dir.display()))
    })?;

    let stamp = generated_at.format("%Y%m%d");
    let monthly_path =
        output_dir.join(format!("transtat_monthly_{}_{stamp}.json", monthly.window.end));
    let ytd_path = output_dir.join(format!("transtat_ytd_{}_{stamp}.json", ytd.window.end));

    write_artifact(&monthly_path, monthly)?;
    write_artifact(&ytd_path, ytd)?;

    Ok((monthly_path, ytd_path))
}

fn write_artifact(path: &Path, result: &AggregateResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|err| ReportError::Internal(format!("failed to serialize report: {err}")))?;
    fs::write(path, json)
        .map_err(|err| ReportError::Io(format!("failed to write {}: {err}", path.display())))
}
