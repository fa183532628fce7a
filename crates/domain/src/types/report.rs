//! Aggregated report model handed to export collaborators.
//!
//! The maps use `BTreeMap` with composite string keys so that two runs
//! over identical input serialize to identical artifacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::project::ProjectStatus;
use super::window::MonthWindow;

/// Project tallies for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCounts {
    pub total: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub pending: u64,
}

/// Words processed for one (canonical workflow step, language) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowLanguageStats {
    pub workflow_step: String,
    pub language: String,
    pub words_done: u64,
    /// Number of projects that contributed qualifying work to this pair.
    /// A project counts once per pair no matter how many jobs it had.
    pub projects: u64,
}

/// Per-user breakdown for one (user, language) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLanguageStats {
    pub username: String,
    pub language: String,
    /// Words per canonical workflow step.
    pub workflow_steps: BTreeMap<String, u64>,
}

impl UserLanguageStats {
    /// Total words across every workflow step of this pair.
    pub fn total_words(&self) -> u64 {
        self.workflow_steps.values().sum()
    }
}

/// One line of the per-project appendix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: i64,
    pub name: String,
    pub status: ProjectStatus,
    /// Display names of the target languages with qualifying work.
    pub target_languages: Vec<String>,
    pub total_words: u64,
}

/// Fully reduced statistics for one reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub window: MonthWindow,
    pub project_counts: ProjectCounts,
    /// Keyed `"{step} - {language}"`.
    pub workflow_by_language: BTreeMap<String, WorkflowLanguageStats>,
    /// Keyed `"{username}||{language}"`.
    pub user_statistics: BTreeMap<String, UserLanguageStats>,
    pub projects: Vec<ProjectSummary>,
    /// False when the project listing itself failed and this result is a
    /// placeholder, so the downstream export still produces a (clearly
    /// labeled) artifact.
    pub complete: bool,
}

impl AggregateResult {
    /// Fresh, empty result for `window`.
    pub fn empty(window: MonthWindow) -> Self {
        Self {
            window,
            project_counts: ProjectCounts::default(),
            workflow_by_language: BTreeMap::new(),
            user_statistics: BTreeMap::new(),
            projects: Vec::new(),
            complete: true,
        }
    }

    /// Placeholder emitted when the project listing failed outright.
    pub fn degraded(window: MonthWindow) -> Self {
        Self { complete: false, ..Self::empty(window) }
    }

    /// Composite key for the workflow-by-language table.
    pub fn workflow_key(step: &str, language: &str) -> String {
        format!("{step} - {language}")
    }

    /// Composite key for the user-statistics table.
    pub fn user_key(username: &str, language: &str) -> String {
        format!("{username}||{language}")
    }

    /// Grand total of words across every (step, language) pair.
    pub fn total_words(&self) -> u64 {
        self.workflow_by_language.values().map(|entry| entry.words_done).sum()
    }
}
