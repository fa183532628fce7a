//! Command-line interface definitions.

use std::path::PathBuf;

use clap::Parser;
use transtat_domain::{MonthWindow, ReportError, Result};

/// Generate monthly and year-to-date translation-volume reports.
#[derive(Debug, Parser)]
#[command(name = "transtat", version, about)]
pub struct Args {
    /// Path to a config file (JSON or TOML). Without it, environment
    /// variables and probed standard locations are used.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report month as "YYYY-MM". Defaults to the previous calendar
    /// month.
    #[arg(long)]
    pub month: Option<String>,

    /// Override the configured output directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Skip the preflight connectivity/writability checks.
    #[arg(long)]
    pub skip_preflight: bool,
}

impl Args {
    /// Resolve the monthly and year-to-date windows for this run.
    pub fn windows(&self, now: chrono::DateTime<chrono::Utc>) -> Result<(MonthWindow, MonthWindow)> {
        match &self.month {
            Some(month) => {
                validate_month(month)?;
                Ok((MonthWindow::single(month.clone()), MonthWindow::ytd_through(month)))
            }
            None => Ok((MonthWindow::previous_month(now), MonthWindow::year_to_date(now))),
        }
    }
}

/// Accept only zero-padded "YYYY-MM"; anything else would silently break
/// the lexical window comparison.
fn validate_month(month: &str) -> Result<()> {
    let bytes = month.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || b.is_ascii_digit())
        && matches!(
            &month[5..],
            "01" | "02" | "03" | "04" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "12"
        );

    if well_formed {
        Ok(())
    } else {
        Err(ReportError::InvalidInput(format!(
            "--month must be \"YYYY-MM\" with a zero-padded month, got {month:?}"
        )))
    }
}
