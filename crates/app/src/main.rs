//! transtat binary: monthly + year-to-date translation-volume report.
//!
//! Wires the pieces together: config, preflight, the two aggregation
//! runs, and the JSON artifacts. A fatal listing failure degrades to an
//! empty, labeled report instead of aborting - downstream distribution
//! always has something to pick up.

mod cli;
mod export;
mod logging;

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use transtat_core::AggregationService;
use transtat_domain::{AggregateResult, MonthWindow};
use transtat_infra::config::loader;
use transtat_infra::{PreflightChecker, XtmClient};

fn main() -> anyhow::Result<()> {
    // Single-threaded runtime: the pipeline is strictly sequential and
    // only uses async for network timeouts and backoff sleeps.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::Args::parse();
    logging::init();

    let mut config = match &args.config {
        Some(path) => loader::load_from_file(Some(path.clone())),
        None => loader::load(),
    }
    .context("failed to load configuration")?;

    if let Some(output_dir) = &args.output_dir {
        config.report.output_dir.clone_from(output_dir);
    }

    let now = Utc::now();
    let (monthly_window, ytd_window) = args.windows(now)?;
    info!(
        monthly = %monthly_window.label(),
        ytd = %ytd_window.label(),
        "starting report generation"
    );

    let client = Arc::new(XtmClient::new(
        &config.api,
        &config.retry,
        config.report.excluded_users.clone(),
    )?);

    if args.skip_preflight {
        info!("preflight skipped by request");
    } else {
        PreflightChecker::new(&client, &config.report, &monthly_window, &ytd_window)
            .run_checks()
            .await;
    }

    let service = AggregationService::new(client);
    let monthly = aggregate_or_degraded(&service, &monthly_window).await;
    let ytd = aggregate_or_degraded(&service, &ytd_window).await;

    let (monthly_path, ytd_path) =
        export::write_reports(&config.report.output_dir, &monthly, &ytd, now)?;

    info!(
        monthly = %monthly_path.display(),
        ytd = %ytd_path.display(),
        monthly_words = monthly.total_words(),
        ytd_words = ytd.total_words(),
        "report generation completed"
    );

    Ok(())
}

/// Run one aggregation; on a fatal listing failure fall back to an
/// empty, clearly-labeled result so the artifact still gets written.
async fn aggregate_or_degraded(
    service: &AggregationService,
    window: &MonthWindow,
) -> AggregateResult {
    match service.aggregate(window).await {
        Ok(result) => result,
        Err(err) => {
            error!(
                window = %window.label(),
                error = %err,
                "project listing failed, emitting empty report"
            );
            AggregateResult::degraded(window.clone())
        }
    }
}
