//! Dashboard assembly.
//!
//! Pulls filtered records out of a [`RecordStore`] and runs the stats
//! functions over them, producing the figures the dashboard, analytics, and
//! reports views render. Recomputes from scratch on every call; there is no
//! caching and no incremental state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::{
    self, Bucket, CategoryStats, DifficultyStats, SubjectStats, WeekBucket,
};
use crate::store::{RecordStore, StoreResult, TestFilter};

/// Configuration for dashboard assembly.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Number of 7-day windows in the weekly trend.
    pub weeks: usize,
    /// Whether the per-subject breakdown keeps zero-test subjects.
    pub include_empty_subjects: bool,
    /// Chunk size for the legacy index-chunked trend series.
    pub chunk_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            weeks: 4,
            include_empty_subjects: true,
            chunk_size: 3,
        }
    }
}

/// Progress toward one goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    pub target: f64,
    pub current: f64,
    /// `current / target`, 0 when the target is not positive.
    pub ratio: f64,
    pub completed: bool,
}

/// Everything the dashboard and analytics views render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_tests: usize,
    pub average: f64,
    pub best: f64,
    pub worst: f64,
    /// Point-form trend over the date-ordered filtered tests.
    pub trend_points: f64,
    /// Rate-form trend over the same ordering.
    pub trend_rate: f64,
    pub consistency: f64,
    pub subjects: Vec<SubjectStats>,
    pub weekly: Vec<WeekBucket>,
    pub chunked: Vec<Bucket>,
    pub by_category: Vec<CategoryStats>,
    pub by_difficulty: Vec<DifficultyStats>,
    pub goals: Vec<GoalProgress>,
}

/// The dashboard engine: a thin orchestrator over a record store.
pub struct Dashboard<'a> {
    store: &'a dyn RecordStore,
    config: DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(store: &'a dyn RecordStore, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    /// Compute a full summary for the tests matching `filter`, with weekly
    /// windows counting back from `today`.
    pub fn summarize(&self, filter: &TestFilter, today: NaiveDate) -> StoreResult<DashboardSummary> {
        let mut tests = self.store.list_tests(filter)?;
        let subjects = self.store.list_subjects()?;
        let goals = self.store.list_goals()?;

        // Trend and chunked series need date order; the store makes no
        // ordering promise, so sort our own copy here.
        tests.sort_by_key(|t| t.date);

        let subjects_stats = if self.config.include_empty_subjects {
            stats::subject_breakdown(&tests, &subjects)
        } else {
            stats::subject_breakdown_with_data(&tests, &subjects)
        };

        tracing::debug!(
            tests = tests.len(),
            subjects = subjects.len(),
            "assembled dashboard summary"
        );

        Ok(DashboardSummary {
            total_tests: tests.len(),
            average: stats::average(&tests),
            best: stats::best(&tests),
            worst: stats::worst(&tests),
            trend_points: stats::trend_points(&tests),
            trend_rate: stats::trend_rate(&tests),
            consistency: stats::consistency(&tests),
            subjects: subjects_stats,
            weekly: stats::week_buckets(&tests, today, self.config.weeks),
            chunked: stats::chunk_buckets(&tests, self.config.chunk_size),
            by_category: stats::category_breakdown(&tests),
            by_difficulty: stats::difficulty_breakdown(&tests),
            goals: goals
                .iter()
                .map(|g| GoalProgress {
                    goal_id: g.id.clone(),
                    name: g.name.clone(),
                    target: g.target,
                    current: g.current,
                    ratio: g.progress(),
                    completed: g.status == crate::model::GoalStatus::Completed,
                })
                .collect(),
        })
    }
}
