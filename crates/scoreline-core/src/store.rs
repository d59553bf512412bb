//! The record store seam.
//!
//! `RecordStore` is the storage trait the aggregation layer is written
//! against. Backends live in the `scoreline-store` crate; everything here is
//! synchronous, single-writer, with operations immediately visible to
//! subsequent reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{
    CalendarEvent, Goal, GoalPatch, NewEvent, NewGoal, NewSubject, NewTest, NewTopic, Subject,
    SubjectPatch, Test, TestCategory, TestPatch, Topic, TopicPatch,
};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Filter for listing tests. All fields are conjunctive; `None` means
/// "no constraint".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestFilter {
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub category: Option<TestCategory>,
    /// Inclusive lower date bound.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl TestFilter {
    /// Whether a test satisfies every set constraint.
    pub fn matches(&self, test: &Test) -> bool {
        if let Some(subject_id) = &self.subject_id {
            if &test.subject_id != subject_id {
                return false;
            }
        }
        if let Some(category) = self.category {
            if test.category != category {
                return false;
            }
        }
        if let Some(from) = self.from {
            if test.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if test.date > to {
                return false;
            }
        }
        true
    }
}

/// CRUD over the flat record collections.
///
/// Ids are opaque unique strings generated by the store at creation time.
/// No transactional guarantees: each operation stands alone.
pub trait RecordStore: Send + Sync {
    // Tests
    fn list_tests(&self, filter: &TestFilter) -> StoreResult<Vec<Test>>;
    fn get_test(&self, id: &str) -> StoreResult<Test>;
    /// Validates the draft and computes `percentage` before storing.
    fn create_test(&self, new: NewTest) -> StoreResult<Test>;
    /// Recomputes `percentage` when `score` or `total_marks` changes.
    fn update_test(&self, id: &str, patch: TestPatch) -> StoreResult<Test>;
    fn delete_test(&self, id: &str) -> StoreResult<()>;

    // Subjects
    fn list_subjects(&self) -> StoreResult<Vec<Subject>>;
    fn get_subject(&self, id: &str) -> StoreResult<Subject>;
    /// Rejects a duplicate subject name.
    fn create_subject(&self, new: NewSubject) -> StoreResult<Subject>;
    fn update_subject(&self, id: &str, patch: SubjectPatch) -> StoreResult<Subject>;
    /// Cascades: deletes every topic owned by this subject.
    fn delete_subject(&self, id: &str) -> StoreResult<()>;

    // Topics
    /// Lists all topics, or only those of one subject.
    fn list_topics(&self, subject_id: Option<&str>) -> StoreResult<Vec<Topic>>;
    /// Rejects an unknown `subject_id`.
    fn create_topic(&self, new: NewTopic) -> StoreResult<Topic>;
    fn update_topic(&self, id: &str, patch: TopicPatch) -> StoreResult<Topic>;
    fn delete_topic(&self, id: &str) -> StoreResult<()>;

    // Calendar events
    fn list_events(&self) -> StoreResult<Vec<CalendarEvent>>;
    fn create_event(&self, new: NewEvent) -> StoreResult<CalendarEvent>;
    fn delete_event(&self, id: &str) -> StoreResult<()>;

    // Goals
    fn list_goals(&self) -> StoreResult<Vec<Goal>>;
    fn create_goal(&self, new: NewGoal) -> StoreResult<Goal>;
    fn update_goal(&self, id: &str, patch: GoalPatch) -> StoreResult<Goal>;
    fn delete_goal(&self, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCategory;

    fn test_on(date: &str, subject_id: &str, category: TestCategory) -> Test {
        Test {
            id: "t".into(),
            name: "t".into(),
            subject_id: subject_id.into(),
            category,
            score: 50.0,
            total_marks: 100.0,
            percentage: 50.0,
            date: date.parse().unwrap(),
            difficulty: None,
            time_spent_min: None,
            topics: vec![],
            notes: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TestFilter::default();
        assert!(filter.matches(&test_on("2024-01-01", "s1", TestCategory::Mock)));
    }

    #[test]
    fn filter_by_subject_and_category() {
        let filter = TestFilter {
            subject_id: Some("s1".into()),
            category: Some(TestCategory::Mock),
            ..Default::default()
        };
        assert!(filter.matches(&test_on("2024-01-01", "s1", TestCategory::Mock)));
        assert!(!filter.matches(&test_on("2024-01-01", "s2", TestCategory::Mock)));
        assert!(!filter.matches(&test_on("2024-01-01", "s1", TestCategory::Full)));
    }

    #[test]
    fn filter_date_bounds_are_inclusive() {
        let filter = TestFilter {
            from: Some("2024-01-01".parse().unwrap()),
            to: Some("2024-01-31".parse().unwrap()),
            ..Default::default()
        };
        assert!(filter.matches(&test_on("2024-01-01", "s1", TestCategory::Mock)));
        assert!(filter.matches(&test_on("2024-01-31", "s1", TestCategory::Mock)));
        assert!(!filter.matches(&test_on("2023-12-31", "s1", TestCategory::Mock)));
        assert!(!filter.matches(&test_on("2024-02-01", "s1", TestCategory::Mock)));
    }
}
