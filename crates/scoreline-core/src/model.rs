//! Core record types for scoreline.
//!
//! These are the fundamental types the whole system tracks: test attempts,
//! subjects and their topics, calendar events, and study goals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// A single recorded test attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Test {
    /// Unique identifier, generated at creation time.
    pub id: String,
    /// Human-readable name (e.g. "Mock #3").
    pub name: String,
    /// Id of the owning subject.
    pub subject_id: String,
    /// What kind of test this was.
    pub category: TestCategory,
    /// Marks obtained.
    pub score: f64,
    /// Maximum obtainable marks. Always strictly positive.
    pub total_marks: f64,
    /// Derived: `round(score / total_marks * 100)`.
    ///
    /// Recomputed on every create and on every update that touches `score`
    /// or `total_marks`. Not clamped: a score above `total_marks` yields a
    /// percentage above 100.
    pub percentage: f64,
    /// Date the test was taken.
    pub date: NaiveDate,
    /// Perceived difficulty, if recorded.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Time spent in minutes, if recorded.
    #[serde(default)]
    pub time_spent_min: Option<u32>,
    /// Free-form topic labels covered by this test.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fields for creating a new [`Test`]. The store generates the id and
/// computes `percentage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTest {
    pub name: String,
    pub subject_id: String,
    pub category: TestCategory,
    pub score: f64,
    pub total_marks: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub time_spent_min: Option<u32>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTest {
    /// Validate required fields before the store accepts the record.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("test name must not be empty"));
        }
        if self.subject_id.trim().is_empty() {
            return Err(StoreError::validation("test subject_id must not be empty"));
        }
        if !self.total_marks.is_finite() || self.total_marks <= 0.0 {
            return Err(StoreError::validation(
                "total_marks must be a positive number",
            ));
        }
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(StoreError::validation(
                "score must be a non-negative number",
            ));
        }
        Ok(())
    }
}

/// Partial update for a [`Test`]. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub category: Option<TestCategory>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub total_marks: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub time_spent_min: Option<u32>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Derived percentage for a score out of `total_marks`.
///
/// Callers must guard `total_marks > 0` before storing a record; this
/// returns 0 for a non-positive total rather than dividing by zero.
pub fn percentage_of(score: f64, total_marks: f64) -> f64 {
    if total_marks <= 0.0 {
        return 0.0;
    }
    (score / total_marks * 100.0).round()
}

/// A subject being studied (e.g. "Physics").
///
/// Figures like tests count and average score are never stored on the
/// subject; they are computed from the test collection on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    /// Unique per store.
    pub name: String,
    /// Display color (hex string, e.g. "#2563eb").
    #[serde(default)]
    pub color: String,
    /// Display icon name.
    #[serde(default)]
    pub icon: String,
}

/// Fields for creating a new [`Subject`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

impl NewSubject {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("subject name must not be empty"));
        }
        Ok(())
    }
}

/// Partial update for a [`Subject`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A topic within a subject. Owned by exactly one subject; deleting the
/// subject cascades to its topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Completion progress, 0-100.
    pub progress: u8,
    #[serde(default)]
    pub last_studied: Option<NaiveDate>,
}

/// Fields for creating a new [`Topic`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTopic {
    pub subject_id: String,
    pub name: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub last_studied: Option<NaiveDate>,
}

impl NewTopic {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("topic name must not be empty"));
        }
        if self.progress > 100 {
            return Err(StoreError::validation("topic progress must be 0-100"));
        }
        Ok(())
    }
}

/// Partial update for a [`Topic`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub last_studied: Option<NaiveDate>,
}

/// A scheduled study or test event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    pub date: NaiveDate,
    /// Optional time of day ("HH:MM").
    #[serde(default)]
    pub time: Option<String>,
    /// Optional association with a subject.
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields for creating a new [`CalendarEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub kind: EventKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::validation("event title must not be empty"));
        }
        Ok(())
    }
}

/// A study goal tracked against a numeric target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub period: GoalPeriod,
    pub target: f64,
    pub current: f64,
    pub status: GoalStatus,
}

impl Goal {
    /// Completion ratio in [0, inf). Returns 0 for a non-positive target.
    pub fn progress(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        self.current / self.target
    }
}

/// Fields for creating a new [`Goal`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub period: GoalPeriod,
    pub target: f64,
    #[serde(default)]
    pub current: f64,
}

impl NewGoal {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("goal name must not be empty"));
        }
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(StoreError::validation("goal target must be positive"));
        }
        Ok(())
    }
}

/// Partial update for a [`Goal`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
}

/// Kind of test attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCategory {
    Mock,
    Practice,
    Sectional,
    Full,
}

impl TestCategory {
    /// All variants, in display order.
    pub const ALL: [TestCategory; 4] = [
        TestCategory::Mock,
        TestCategory::Practice,
        TestCategory::Sectional,
        TestCategory::Full,
    ];
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestCategory::Mock => write!(f, "mock"),
            TestCategory::Practice => write!(f, "practice"),
            TestCategory::Sectional => write!(f, "sectional"),
            TestCategory::Full => write!(f, "full"),
        }
    }
}

impl FromStr for TestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(TestCategory::Mock),
            "practice" => Ok(TestCategory::Practice),
            "sectional" => Ok(TestCategory::Sectional),
            "full" => Ok(TestCategory::Full),
            other => Err(format!("unknown test category: {other}")),
        }
    }
}

/// Perceived difficulty of a test or topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All variants, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Kind of calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Test,
    Study,
    Revision,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Test => write!(f, "test"),
            EventKind::Study => write!(f, "study"),
            EventKind::Revision => write!(f, "revision"),
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(EventKind::Test),
            "study" => Ok(EventKind::Study),
            "revision" | "reminder" => Ok(EventKind::Revision),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// Recurrence period of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalPeriod::Weekly => write!(f, "weekly"),
            GoalPeriod::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(GoalPeriod::Weekly),
            "monthly" => Ok(GoalPeriod::Monthly),
            other => Err(format!("unknown goal period: {other}")),
        }
    }
}

/// Lifecycle state of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_test() -> NewTest {
        NewTest {
            name: "Mock #1".into(),
            subject_id: "subj-1".into(),
            category: TestCategory::Mock,
            score: 85.0,
            total_marks: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            difficulty: None,
            time_spent_min: None,
            topics: vec![],
            notes: None,
        }
    }

    #[test]
    fn category_display_and_parse() {
        assert_eq!(TestCategory::Mock.to_string(), "mock");
        assert_eq!("mock".parse::<TestCategory>().unwrap(), TestCategory::Mock);
        assert_eq!(
            "Sectional".parse::<TestCategory>().unwrap(),
            TestCategory::Sectional
        );
        assert!("quiz".parse::<TestCategory>().is_err());
    }

    #[test]
    fn event_kind_accepts_legacy_reminder() {
        assert_eq!("reminder".parse::<EventKind>().unwrap(), EventKind::Revision);
        assert_eq!("revision".parse::<EventKind>().unwrap(), EventKind::Revision);
    }

    #[test]
    fn percentage_rounds() {
        assert_eq!(percentage_of(85.0, 100.0), 85.0);
        assert_eq!(percentage_of(2.0, 3.0), 67.0);
        assert_eq!(percentage_of(1.0, 3.0), 33.0);
    }

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage_of(50.0, 0.0), 0.0);
        assert_eq!(percentage_of(50.0, -10.0), 0.0);
    }

    #[test]
    fn percentage_not_clamped() {
        assert_eq!(percentage_of(110.0, 100.0), 110.0);
    }

    #[test]
    fn new_test_validation() {
        assert!(new_test().validate().is_ok());

        let mut t = new_test();
        t.name = "  ".into();
        assert!(t.validate().is_err());

        let mut t = new_test();
        t.total_marks = 0.0;
        assert!(t.validate().is_err());

        let mut t = new_test();
        t.score = f64::NAN;
        assert!(t.validate().is_err());
    }

    #[test]
    fn goal_progress_guards_zero_target() {
        let goal = Goal {
            id: "g1".into(),
            name: "Weekly mocks".into(),
            period: GoalPeriod::Weekly,
            target: 0.0,
            current: 3.0,
            status: GoalStatus::Active,
        };
        assert_eq!(goal.progress(), 0.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let test = Test {
            id: "t1".into(),
            name: "Mock #1".into(),
            subject_id: "subj-1".into(),
            category: TestCategory::Mock,
            score: 85.0,
            total_marks: 100.0,
            percentage: 85.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            difficulty: Some(Difficulty::Medium),
            time_spent_min: Some(90),
            topics: vec!["kinematics".into()],
            notes: None,
        };
        let json = serde_json::to_string(&test).unwrap();
        let back: Test = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "t1");
        assert_eq!(back.category, TestCategory::Mock);
        assert_eq!(back.difficulty, Some(Difficulty::Medium));
    }
}
