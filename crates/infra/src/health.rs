//! Preflight checks run before a long aggregation.
//!
//! Advisory only: the run proceeds whatever the outcome. The value is
//! the diagnostic log trail produced *before* spending minutes talking
//! to the API, so an obvious misconfiguration (dead endpoint, read-only
//! output directory) is visible up front.

use std::fs;
use std::path::Path;

use sysinfo::Disks;
use tracing::{info, warn};
use transtat_domain::{MonthWindow, ReportConfig};

use crate::http::HttpClient;
use crate::xtm::XtmClient;

/// Health status of an individual preflight component.
#[derive(Debug, Clone)]
pub struct ComponentHealth {
    /// Component identifier (e.g., "api", "output_dir")
    pub name: String,

    /// Whether the component is healthy
    pub is_healthy: bool,

    /// Optional message describing health state or error
    pub message: Option<String>,
}

impl ComponentHealth {
    /// Create a healthy component status
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    /// Create an unhealthy component status with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}

/// Overall preflight outcome: the AND of every component.
#[derive(Debug, Clone, Default)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub components: Vec<ComponentHealth>,
}

impl HealthStatus {
    /// Create a new health status with no components.
    pub fn new() -> Self {
        Self { is_healthy: true, components: Vec::new() }
    }

    /// Add a component health check to the status
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Recompute the aggregate flag from the components.
    pub fn finalize(&mut self) {
        self.is_healthy = self.components.iter().all(|c| c.is_healthy);
    }
}

/// Preflight checker for the aggregation run.
pub struct PreflightChecker<'a> {
    client: &'a XtmClient,
    config: &'a ReportConfig,
    monthly: &'a MonthWindow,
    ytd: &'a MonthWindow,
}

impl<'a> PreflightChecker<'a> {
    /// Create a checker over the run's client, config and windows.
    pub fn new(
        client: &'a XtmClient,
        config: &'a ReportConfig,
        monthly: &'a MonthWindow,
        ytd: &'a MonthWindow,
    ) -> Self {
        Self { client, config, monthly, ytd }
    }

    /// Run every check and log the outcome.
    ///
    /// Returns `true` when all pass/fail checks pass. Callers proceed
    /// regardless of the result.
    pub async fn run_checks(&self) -> bool {
        let mut status = HealthStatus::new()
            .add_component(self.check_api().await)
            .add_component(self.check_output_dir())
            .add_component(self.check_disk_space())
            .add_component(check_http_stack())
            .add_component(self.check_windows());
        status.finalize();

        for component in &status.components {
            if component.is_healthy {
                info!(check = %component.name, message = ?component.message, "preflight check passed");
            } else {
                warn!(check = %component.name, message = ?component.message, "preflight check failed");
            }
        }
        if !status.is_healthy {
            warn!("preflight reported problems; the run will continue anyway");
        }

        status.is_healthy
    }

    /// (a) One lightweight API call succeeds.
    async fn check_api(&self) -> ComponentHealth {
        match self.client.ping().await {
            Ok(()) => ComponentHealth::healthy("api"),
            Err(err) => ComponentHealth::unhealthy("api", err.to_string()),
        }
    }

    /// (b) Output directory exists or can be created, and is writable.
    fn check_output_dir(&self) -> ComponentHealth {
        let dir = &self.config.output_dir;
        if let Err(err) = fs::create_dir_all(dir) {
            return ComponentHealth::unhealthy(
                "output_dir",
                format!("cannot create {}: {err}", dir.display()),
            );
        }

        let probe = dir.join(".transtat-preflight");
        match fs::write(&probe, b"probe") {
            Ok(()) => {
                let _ = fs::remove_file(&probe);
                ComponentHealth::healthy("output_dir")
            }
            Err(err) => ComponentHealth::unhealthy(
                "output_dir",
                format!("{} is not writable: {err}", dir.display()),
            ),
        }
    }

    /// (c) Free disk space above the low-water mark.
    ///
    /// Warning only: a low-disk result logs but reports healthy, so it
    /// never flips the aggregate preflight outcome.
    fn check_disk_space(&self) -> ComponentHealth {
        let Some(available) = available_space_for(&self.config.output_dir) else {
            return ComponentHealth {
                name: "disk_space".to_string(),
                is_healthy: true,
                message: Some("could not determine free disk space".to_string()),
            };
        };

        let threshold = self.config.min_free_disk_mb.saturating_mul(1024 * 1024);
        if available < threshold {
            warn!(
                available_mb = available / (1024 * 1024),
                min_mb = self.config.min_free_disk_mb,
                "low disk space for report output"
            );
            return ComponentHealth {
                name: "disk_space".to_string(),
                is_healthy: true,
                message: Some(format!(
                    "only {}MB free (low-water mark {}MB)",
                    available / (1024 * 1024),
                    self.config.min_free_disk_mb
                )),
            };
        }

        ComponentHealth::healthy("disk_space")
    }

    /// (e) The computed report windows are usable.
    fn check_windows(&self) -> ComponentHealth {
        let windows = [self.monthly, self.ytd];
        if windows.iter().any(|w| w.start.is_empty() || w.end.is_empty()) {
            ComponentHealth::unhealthy("report_windows", "computed window string is empty")
        } else {
            ComponentHealth::healthy("report_windows")
        }
    }
}

/// (d) The HTTP stack (TLS backend included) initializes.
fn check_http_stack() -> ComponentHealth {
    match HttpClient::builder().build() {
        Ok(_) => ComponentHealth::healthy("http_stack"),
        Err(err) => ComponentHealth::unhealthy("http_stack", err.to_string()),
    }
}

/// Free bytes on the disk holding `path`, best effort.
fn available_space_for(path: &Path) -> Option<u64> {
    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .filter(|disk| target.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(sysinfo::Disk::available_space)
}
