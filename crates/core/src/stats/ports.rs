//! Port interfaces for the statistics pipeline.
//!
//! These traits define the boundary between the aggregation logic and
//! the API infrastructure.

use async_trait::async_trait;
use transtat_domain::{LanguageStatistic, Project, ProjectStatus, Result};

/// Read access to the remote project-management API.
#[async_trait]
pub trait ProjectsGateway: Send + Sync {
    /// List projects, optionally filtered by status server-side.
    async fn list_projects(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>>;

    /// Per-language statistics for one project, with excluded accounts
    /// already filtered out by the implementation.
    async fn project_statistics(&self, project_id: i64) -> Result<Vec<LanguageStatistic>>;
}
