//! Per-project statistics reduction.
//!
//! Turns one project's nested language → user → step → job payload into
//! flat word totals, filtered by the reporting window.

use std::collections::BTreeMap;

use transtat_domain::types::window::month_of_epoch_millis;
use transtat_domain::{LanguageStatistic, MonthWindow};

use super::languages::language_name;

/// Word totals for one project after window filtering.
///
/// The maps are sparse: a key with zero qualifying words is absent, not
/// present-with-zero. Absence means "no qualifying work", which is how
/// the aggregation decides whether a project is visible at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedProject {
    /// (canonical step, language display name) → words.
    pub step_language_words: BTreeMap<(String, String), u64>,
    /// (username, canonical step, language display name) → words.
    pub user_step_language_words: BTreeMap<(String, String, String), u64>,
    /// True iff at least one step total is positive.
    pub had_qualifying_work: bool,
}

/// Strip digits from a raw workflow step name.
///
/// "translate1" and "translate2" are numbered passes of the same logical
/// step and must land in one bucket. A name that is all digits collapses
/// to the empty string, which remains a valid step key.
pub fn canonical_step_name(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Reduce one project's statistics over `window`.
///
/// A job qualifies when it has a completion timestamp whose month falls
/// inside the window (inclusive on both ends). Everything else is
/// skipped entirely, never zero-filled. Qualifying jobs contribute the
/// sum of their eleven word-count buckets.
pub fn normalize(language_stats: &[LanguageStatistic], window: &MonthWindow) -> NormalizedProject {
    let mut out = NormalizedProject::default();

    for lang in language_stats {
        let language = language_name(&lang.target_language).to_string();

        for user in &lang.users_statistics {
            for step in &user.steps_statistics {
                let step_name = canonical_step_name(&step.workflow_step_name);

                let mut step_words: u64 = 0;
                for job in &step.jobs_statistics {
                    let Some(month) = job.completed_date.and_then(month_of_epoch_millis) else {
                        // Unfinished job: no completion date, no words.
                        continue;
                    };
                    if !window.contains(&month) {
                        continue;
                    }
                    step_words += job.source_statistics.total();
                }

                if step_words == 0 {
                    continue;
                }

                out.had_qualifying_work = true;
                *out.step_language_words
                    .entry((step_name.clone(), language.clone()))
                    .or_default() += step_words;
                *out.user_step_language_words
                    .entry((user.username.clone(), step_name.clone(), language.clone()))
                    .or_default() += step_words;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use transtat_domain::{JobStatistic, StepStatistic, UserStatistic, WordCounts};

    use super::*;

    fn millis(year: i32, month: u32, day: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn job(completed: Option<i64>, words: WordCounts) -> JobStatistic {
        JobStatistic { completed_date: completed, source_statistics: words }
    }

    fn leveraged(words: u64) -> WordCounts {
        WordCounts { leveraged: words, ..WordCounts::default() }
    }

    fn lang(
        locale: &str,
        username: &str,
        step: &str,
        jobs: Vec<JobStatistic>,
    ) -> LanguageStatistic {
        LanguageStatistic {
            target_language: locale.to_string(),
            users_statistics: vec![UserStatistic {
                username: username.to_string(),
                steps_statistics: vec![StepStatistic {
                    workflow_step_name: step.to_string(),
                    jobs_statistics: jobs,
                }],
            }],
        }
    }

    #[test]
    fn canonical_step_name_strips_digits() {
        assert_eq!(canonical_step_name("translate1"), "translate");
        assert_eq!(canonical_step_name("translate7"), "translate");
        assert_eq!(canonical_step_name("final review"), "final review");
        assert_eq!(canonical_step_name("123"), "");
    }

    /// Boundary + exclusion law: jobs outside the window or without a
    /// completion timestamp contribute nothing.
    #[test]
    fn jobs_outside_window_are_skipped() {
        let window = MonthWindow::new("2025-03", "2025-04");
        let stats = vec![lang(
            "fr_FR",
            "user@example.com",
            "translate",
            vec![
                job(Some(millis(2025, 2, 28)), leveraged(100)), // before
                job(Some(millis(2025, 3, 1)), leveraged(10)),   // start boundary
                job(Some(millis(2025, 4, 30)), leveraged(20)),  // end boundary
                job(Some(millis(2025, 5, 1)), leveraged(100)),  // after
                job(None, leveraged(100)),                      // unfinished
            ],
        )];

        let normalized = normalize(&stats, &window);
        assert_eq!(
            normalized.step_language_words.get(&("translate".into(), "French".into())),
            Some(&30)
        );
        assert!(normalized.had_qualifying_work);
    }

    /// Digit-collapse law: numbered passes of a step merge into one
    /// canonical bucket.
    #[test]
    fn numbered_step_passes_merge() {
        let window = MonthWindow::single("2025-06");
        let stats = vec![LanguageStatistic {
            target_language: "fr_FR".to_string(),
            users_statistics: vec![UserStatistic {
                username: "user@example.com".to_string(),
                steps_statistics: vec![
                    StepStatistic {
                        workflow_step_name: "translate1".to_string(),
                        jobs_statistics: vec![job(Some(millis(2025, 6, 5)), leveraged(10))],
                    },
                    StepStatistic {
                        workflow_step_name: "translate7".to_string(),
                        jobs_statistics: vec![job(Some(millis(2025, 6, 6)), leveraged(5))],
                    },
                ],
            }],
        }];

        let normalized = normalize(&stats, &window);
        assert_eq!(normalized.step_language_words.len(), 1);
        assert_eq!(
            normalized.step_language_words.get(&("translate".into(), "French".into())),
            Some(&15)
        );
        assert_eq!(
            normalized
                .user_step_language_words
                .get(&("user@example.com".into(), "translate".into(), "French".into())),
            Some(&15)
        );
    }

    /// Sum law: a qualifying job contributes the sum of all eleven
    /// buckets.
    #[test]
    fn all_buckets_sum_into_job_words() {
        let window = MonthWindow::single("2025-06");
        let counts = WordCounts {
            ice_match: 1,
            leveraged: 2,
            repeats: 3,
            machine_translation: 4,
            low_fuzzy_match: 5,
            medium_fuzzy_match: 6,
            high_fuzzy_match: 7,
            low_fuzzy_repeats: 8,
            medium_fuzzy_repeats: 9,
            high_fuzzy_repeats: 10,
            no_match: 11,
        };
        let stats = vec![lang(
            "de_DE",
            "user@example.com",
            "correct",
            vec![job(Some(millis(2025, 6, 10)), counts)],
        )];

        let normalized = normalize(&stats, &window);
        assert_eq!(
            normalized.step_language_words.get(&("correct".into(), "German".into())),
            Some(&66)
        );
    }

    /// Sparse representation: zero step totals are omitted and a project
    /// with none has no qualifying work.
    #[test]
    fn zero_totals_are_absent_not_zero() {
        let window = MonthWindow::single("2025-06");
        let stats = vec![lang(
            "fr_FR",
            "user@example.com",
            "translate",
            vec![job(Some(millis(2025, 1, 5)), leveraged(100))],
        )];

        let normalized = normalize(&stats, &window);
        assert!(normalized.step_language_words.is_empty());
        assert!(normalized.user_step_language_words.is_empty());
        assert!(!normalized.had_qualifying_work);
    }

    /// An all-digits step name stays a valid (empty-named) step.
    #[test]
    fn empty_canonical_step_is_kept() {
        let window = MonthWindow::single("2025-06");
        let stats = vec![lang(
            "fr_FR",
            "user@example.com",
            "42",
            vec![job(Some(millis(2025, 6, 5)), leveraged(7))],
        )];

        let normalized = normalize(&stats, &window);
        assert_eq!(
            normalized.step_language_words.get(&(String::new(), "French".into())),
            Some(&7)
        );
    }

    /// Unknown locale codes keep their raw form in the output keys.
    #[test]
    fn unknown_locale_passes_through_to_keys() {
        let window = MonthWindow::single("2025-06");
        let stats = vec![lang(
            "xx_XX",
            "user@example.com",
            "translate",
            vec![job(Some(millis(2025, 6, 5)), leveraged(3))],
        )];

        let normalized = normalize(&stats, &window);
        assert_eq!(
            normalized.step_language_words.get(&("translate".into(), "xx_XX".into())),
            Some(&3)
        );
    }

    /// Two users on the same step/language stay separate in the per-user
    /// map but merge in the step map.
    #[test]
    fn per_user_totals_stay_separate() {
        let window = MonthWindow::single("2025-06");
        let stats = vec![LanguageStatistic {
            target_language: "fr_FR".to_string(),
            users_statistics: vec![
                UserStatistic {
                    username: "alice@example.com".to_string(),
                    steps_statistics: vec![StepStatistic {
                        workflow_step_name: "translate".to_string(),
                        jobs_statistics: vec![job(Some(millis(2025, 6, 1)), leveraged(10))],
                    }],
                },
                UserStatistic {
                    username: "bob@example.com".to_string(),
                    steps_statistics: vec![StepStatistic {
                        workflow_step_name: "translate".to_string(),
                        jobs_statistics: vec![job(Some(millis(2025, 6, 2)), leveraged(20))],
                    }],
                },
            ],
        }];

        let normalized = normalize(&stats, &window);
        assert_eq!(
            normalized.step_language_words.get(&("translate".into(), "French".into())),
            Some(&30)
        );
        assert_eq!(
            normalized
                .user_step_language_words
                .get(&("alice@example.com".into(), "translate".into(), "French".into())),
            Some(&10)
        );
        assert_eq!(
            normalized
                .user_step_language_words
                .get(&("bob@example.com".into(), "translate".into(), "French".into())),
            Some(&20)
        );
    }
}
