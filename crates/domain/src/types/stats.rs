//! Per-project statistics payload: language → user → step → job.
//!
//! Mirrors the nested shape of the statistics endpoint. Everything is
//! `#[serde(default)]` so a missing or null field decodes to "no data"
//! instead of failing the whole project.

use serde::{Deserialize, Serialize};

/// Statistics for one target language of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageStatistic {
    /// Locale code, e.g. `fr_FR`.
    pub target_language: String,
    pub users_statistics: Vec<UserStatistic>,
}

/// Statistics for one user within a target language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStatistic {
    pub username: String,
    pub steps_statistics: Vec<StepStatistic>,
}

/// Statistics for one workflow step of a user.
///
/// The raw step name may carry a numeric pass suffix ("translate1");
/// digit stripping happens during normalization, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepStatistic {
    pub workflow_step_name: String,
    pub jobs_statistics: Vec<JobStatistic>,
}

/// Statistics for one job of a workflow step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStatistic {
    /// Completion time, epoch milliseconds. A job without one has not
    /// finished and contributes nothing to any window.
    pub completed_date: Option<i64>,
    pub source_statistics: WordCounts,
}

/// The eleven word-count buckets of a job.
///
/// The buckets are mutually exclusive categories of the same underlying
/// statistic, so summing them never double-counts a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordCounts {
    pub ice_match: u64,
    pub leveraged: u64,
    pub repeats: u64,
    pub machine_translation: u64,
    pub low_fuzzy_match: u64,
    pub medium_fuzzy_match: u64,
    pub high_fuzzy_match: u64,
    pub low_fuzzy_repeats: u64,
    pub medium_fuzzy_repeats: u64,
    pub high_fuzzy_repeats: u64,
    pub no_match: u64,
}

impl WordCounts {
    /// Total words across all eleven buckets.
    pub fn total(&self) -> u64 {
        self.ice_match
            + self.leveraged
            + self.repeats
            + self.machine_translation
            + self.low_fuzzy_match
            + self.medium_fuzzy_match
            + self.high_fuzzy_match
            + self.low_fuzzy_repeats
            + self.medium_fuzzy_repeats
            + self.high_fuzzy_repeats
            + self.no_match
    }
}
