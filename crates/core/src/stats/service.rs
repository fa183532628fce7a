//! Aggregation service - walks every project and merges window totals.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};
use transtat_domain::{
    AggregateResult, LanguageStatistic, MonthWindow, Project, ProjectStatus, ProjectSummary,
    Result, UserLanguageStats, WorkflowLanguageStats,
};

use super::languages::language_name;
use super::normalizer::{normalize, NormalizedProject};
use super::ports::ProjectsGateway;

/// Orchestrates the per-project fetch → normalize → merge loop.
///
/// Owns nothing but the gateway handle; the aggregate tables live in the
/// [`AggregateResult`] built fresh per call, so repeated runs never see
/// each other's state.
pub struct AggregationService {
    gateway: Arc<dyn ProjectsGateway>,
}

impl AggregationService {
    /// Create a new aggregation service
    pub fn new(gateway: Arc<dyn ProjectsGateway>) -> Self {
        Self { gateway }
    }

    /// Aggregate every project's statistics over `window`.
    ///
    /// Failure to list projects is fatal and propagates; the caller is
    /// expected to substitute [`AggregateResult::degraded`] so the report
    /// artifact still gets produced. Failures on individual projects are
    /// logged and skipped - one bad project cannot sink the run.
    pub async fn aggregate(&self, window: &MonthWindow) -> Result<AggregateResult> {
        let projects = self.gateway.list_projects(None).await?;
        info!(window = %window.label(), projects = projects.len(), "aggregating projects");

        let mut result = AggregateResult::empty(window.clone());

        for project in &projects {
            let Some(project_id) = project.id else {
                warn!(name = %project.name, "project without id, skipping");
                continue;
            };

            let stats = match self.gateway.project_statistics(project_id).await {
                Ok(stats) => stats,
                Err(err) => {
                    warn!(
                        project_id,
                        error = %err,
                        "failed to fetch project statistics, skipping project"
                    );
                    continue;
                }
            };

            let normalized = normalize(&stats, window);
            if !normalized.had_qualifying_work {
                // No qualifying work in this window: the project is
                // invisible to every table and count.
                continue;
            }

            merge_project(&mut result, project, project_id, &stats, &normalized);
        }

        info!(
            window = %window.label(),
            total = result.project_counts.total,
            words = result.total_words(),
            "aggregation finished"
        );
        Ok(result)
    }
}

fn merge_project(
    result: &mut AggregateResult,
    project: &Project,
    project_id: i64,
    stats: &[LanguageStatistic],
    normalized: &NormalizedProject,
) {
    result.project_counts.total += 1;
    match project.status {
        ProjectStatus::Finished => result.project_counts.completed += 1,
        ProjectStatus::InProgress | ProjectStatus::Started => {
            result.project_counts.in_progress += 1;
        }
        ProjectStatus::Other => result.project_counts.pending += 1,
    }

    let mut project_total: u64 = 0;

    for ((step, language), words) in &normalized.step_language_words {
        let key = AggregateResult::workflow_key(step, language);
        let entry = result.workflow_by_language.entry(key).or_insert_with(|| {
            WorkflowLanguageStats {
                workflow_step: step.clone(),
                language: language.clone(),
                ..WorkflowLanguageStats::default()
            }
        });
        entry.words_done += words;
        // The normalized map holds each pair at most once per project,
        // so this is "one project, one tick" per pair it touched.
        entry.projects += 1;
        project_total += words;
    }

    for ((username, step, language), words) in &normalized.user_step_language_words {
        let key = AggregateResult::user_key(username, language);
        let entry = result.user_statistics.entry(key).or_insert_with(|| UserLanguageStats {
            username: username.clone(),
            language: language.clone(),
            workflow_steps: BTreeMap::new(),
        });
        *entry.workflow_steps.entry(step.clone()).or_default() += words;
    }

    let mut target_languages: Vec<String> = Vec::new();
    for lang in stats {
        let name = language_name(&lang.target_language).to_string();
        if !target_languages.contains(&name) {
            target_languages.push(name);
        }
    }

    result.projects.push(ProjectSummary {
        id: project_id,
        name: project.name.clone(),
        status: project.status,
        target_languages,
        total_words: project_total,
    });
}
