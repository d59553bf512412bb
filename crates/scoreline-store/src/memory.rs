//! In-memory record store.
//!
//! `StoreData` holds the flat collections and implements every mutation;
//! `MemoryStore` wraps it in a mutex behind the `RecordStore` trait. The
//! JSON-file backend reuses the same `StoreData` and layers persistence on
//! top.

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scoreline_core::error::StoreError;
use scoreline_core::model::{
    percentage_of, CalendarEvent, Goal, GoalPatch, GoalStatus, NewEvent, NewGoal, NewSubject,
    NewTest, NewTopic, Subject, SubjectPatch, Test, TestPatch, Topic, TopicPatch,
};
use scoreline_core::store::{RecordStore, StoreResult, TestFilter};

/// The flat record collections, serializable as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl StoreData {
    pub(crate) fn create_test(&mut self, new: NewTest) -> StoreResult<Test> {
        new.validate()?;
        if !self.subjects.iter().any(|s| s.id == new.subject_id) {
            return Err(StoreError::not_found("subject", new.subject_id));
        }
        let test = Test {
            id: new_id(),
            percentage: percentage_of(new.score, new.total_marks),
            name: new.name,
            subject_id: new.subject_id,
            category: new.category,
            score: new.score,
            total_marks: new.total_marks,
            date: new.date,
            difficulty: new.difficulty,
            time_spent_min: new.time_spent_min,
            topics: new.topics,
            notes: new.notes,
        };
        self.tests.push(test.clone());
        Ok(test)
    }

    pub(crate) fn update_test(&mut self, id: &str, patch: TestPatch) -> StoreResult<Test> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(StoreError::validation("test name must not be empty"));
            }
        }
        if let Some(total) = patch.total_marks {
            if !total.is_finite() || total <= 0.0 {
                return Err(StoreError::validation(
                    "total_marks must be a positive number",
                ));
            }
        }
        if let Some(score) = patch.score {
            if !score.is_finite() || score < 0.0 {
                return Err(StoreError::validation(
                    "score must be a non-negative number",
                ));
            }
        }
        if let Some(subject_id) = &patch.subject_id {
            if !self.subjects.iter().any(|s| &s.id == subject_id) {
                return Err(StoreError::not_found("subject", subject_id.clone()));
            }
        }

        let test = self
            .tests
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("test", id))?;

        let marks_changed = patch.score.is_some() || patch.total_marks.is_some();
        if let Some(name) = patch.name {
            test.name = name;
        }
        if let Some(subject_id) = patch.subject_id {
            test.subject_id = subject_id;
        }
        if let Some(category) = patch.category {
            test.category = category;
        }
        if let Some(score) = patch.score {
            test.score = score;
        }
        if let Some(total) = patch.total_marks {
            test.total_marks = total;
        }
        if let Some(date) = patch.date {
            test.date = date;
        }
        if let Some(difficulty) = patch.difficulty {
            test.difficulty = Some(difficulty);
        }
        if let Some(minutes) = patch.time_spent_min {
            test.time_spent_min = Some(minutes);
        }
        if let Some(topics) = patch.topics {
            test.topics = topics;
        }
        if let Some(notes) = patch.notes {
            test.notes = Some(notes);
        }
        if marks_changed {
            test.percentage = percentage_of(test.score, test.total_marks);
        }
        Ok(test.clone())
    }

    pub(crate) fn delete_test(&mut self, id: &str) -> StoreResult<()> {
        let before = self.tests.len();
        self.tests.retain(|t| t.id != id);
        if self.tests.len() == before {
            return Err(StoreError::not_found("test", id));
        }
        Ok(())
    }

    pub(crate) fn create_subject(&mut self, new: NewSubject) -> StoreResult<Subject> {
        new.validate()?;
        if self.subjects.iter().any(|s| s.name == new.name) {
            return Err(StoreError::validation(format!(
                "subject '{}' already exists",
                new.name
            )));
        }
        let subject = Subject {
            id: new_id(),
            name: new.name,
            color: new.color,
            icon: new.icon,
        };
        self.subjects.push(subject.clone());
        Ok(subject)
    }

    pub(crate) fn update_subject(&mut self, id: &str, patch: SubjectPatch) -> StoreResult<Subject> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(StoreError::validation("subject name must not be empty"));
            }
            if self.subjects.iter().any(|s| &s.name == name && s.id != id) {
                return Err(StoreError::validation(format!(
                    "subject '{name}' already exists"
                )));
            }
        }
        let subject = self
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("subject", id))?;
        if let Some(name) = patch.name {
            subject.name = name;
        }
        if let Some(color) = patch.color {
            subject.color = color;
        }
        if let Some(icon) = patch.icon {
            subject.icon = icon;
        }
        Ok(subject.clone())
    }

    pub(crate) fn delete_subject(&mut self, id: &str) -> StoreResult<()> {
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id != id);
        if self.subjects.len() == before {
            return Err(StoreError::not_found("subject", id));
        }
        // Topics are owned by their subject.
        self.topics.retain(|t| t.subject_id != id);
        Ok(())
    }

    pub(crate) fn create_topic(&mut self, new: NewTopic) -> StoreResult<Topic> {
        new.validate()?;
        if !self.subjects.iter().any(|s| s.id == new.subject_id) {
            return Err(StoreError::not_found("subject", new.subject_id));
        }
        let topic = Topic {
            id: new_id(),
            subject_id: new.subject_id,
            name: new.name,
            difficulty: new.difficulty,
            progress: new.progress,
            last_studied: new.last_studied,
        };
        self.topics.push(topic.clone());
        Ok(topic)
    }

    pub(crate) fn update_topic(&mut self, id: &str, patch: TopicPatch) -> StoreResult<Topic> {
        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(StoreError::validation("topic progress must be 0-100"));
            }
        }
        let topic = self
            .topics
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("topic", id))?;
        if let Some(name) = patch.name {
            topic.name = name;
        }
        if let Some(difficulty) = patch.difficulty {
            topic.difficulty = Some(difficulty);
        }
        if let Some(progress) = patch.progress {
            topic.progress = progress;
        }
        if let Some(date) = patch.last_studied {
            topic.last_studied = Some(date);
        }
        Ok(topic.clone())
    }

    pub(crate) fn delete_topic(&mut self, id: &str) -> StoreResult<()> {
        let before = self.topics.len();
        self.topics.retain(|t| t.id != id);
        if self.topics.len() == before {
            return Err(StoreError::not_found("topic", id));
        }
        Ok(())
    }

    pub(crate) fn create_event(&mut self, new: NewEvent) -> StoreResult<CalendarEvent> {
        new.validate()?;
        let event = CalendarEvent {
            id: new_id(),
            title: new.title,
            kind: new.kind,
            date: new.date,
            time: new.time,
            subject_id: new.subject_id,
            description: new.description,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    pub(crate) fn delete_event(&mut self, id: &str) -> StoreResult<()> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(StoreError::not_found("event", id));
        }
        Ok(())
    }

    pub(crate) fn create_goal(&mut self, new: NewGoal) -> StoreResult<Goal> {
        new.validate()?;
        let goal = Goal {
            id: new_id(),
            name: new.name,
            period: new.period,
            target: new.target,
            current: new.current,
            status: GoalStatus::Active,
        };
        self.goals.push(goal.clone());
        Ok(goal)
    }

    pub(crate) fn update_goal(&mut self, id: &str, patch: GoalPatch) -> StoreResult<Goal> {
        if let Some(target) = patch.target {
            if !target.is_finite() || target <= 0.0 {
                return Err(StoreError::validation("goal target must be positive"));
            }
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found("goal", id))?;
        if let Some(name) = patch.name {
            goal.name = name;
        }
        if let Some(target) = patch.target {
            goal.target = target;
        }
        if let Some(current) = patch.current {
            goal.current = current;
        }
        if let Some(status) = patch.status {
            goal.status = status;
        }
        Ok(goal.clone())
    }

    pub(crate) fn delete_goal(&mut self, id: &str) -> StoreResult<()> {
        let before = self.goals.len();
        self.goals.retain(|g| g.id != id);
        if self.goals.len() == before {
            return Err(StoreError::not_found("goal", id));
        }
        Ok(())
    }
}

/// An in-memory record store. Starts empty; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-seeded data (useful for tests).
    pub fn with_data(data: StoreData) -> Self {
        Self {
            inner: Mutex::new(data),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreData>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::persistence("store lock poisoned"))
    }
}

impl RecordStore for MemoryStore {
    fn list_tests(&self, filter: &TestFilter) -> StoreResult<Vec<Test>> {
        let data = self.lock()?;
        Ok(data
            .tests
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    fn get_test(&self, id: &str) -> StoreResult<Test> {
        let data = self.lock()?;
        data.tests
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("test", id))
    }

    fn create_test(&self, new: NewTest) -> StoreResult<Test> {
        self.lock()?.create_test(new)
    }

    fn update_test(&self, id: &str, patch: TestPatch) -> StoreResult<Test> {
        self.lock()?.update_test(id, patch)
    }

    fn delete_test(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete_test(id)
    }

    fn list_subjects(&self) -> StoreResult<Vec<Subject>> {
        Ok(self.lock()?.subjects.clone())
    }

    fn get_subject(&self, id: &str) -> StoreResult<Subject> {
        let data = self.lock()?;
        data.subjects
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("subject", id))
    }

    fn create_subject(&self, new: NewSubject) -> StoreResult<Subject> {
        self.lock()?.create_subject(new)
    }

    fn update_subject(&self, id: &str, patch: SubjectPatch) -> StoreResult<Subject> {
        self.lock()?.update_subject(id, patch)
    }

    fn delete_subject(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete_subject(id)
    }

    fn list_topics(&self, subject_id: Option<&str>) -> StoreResult<Vec<Topic>> {
        let data = self.lock()?;
        Ok(data
            .topics
            .iter()
            .filter(|t| subject_id.map_or(true, |s| t.subject_id == s))
            .cloned()
            .collect())
    }

    fn create_topic(&self, new: NewTopic) -> StoreResult<Topic> {
        self.lock()?.create_topic(new)
    }

    fn update_topic(&self, id: &str, patch: TopicPatch) -> StoreResult<Topic> {
        self.lock()?.update_topic(id, patch)
    }

    fn delete_topic(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete_topic(id)
    }

    fn list_events(&self) -> StoreResult<Vec<CalendarEvent>> {
        Ok(self.lock()?.events.clone())
    }

    fn create_event(&self, new: NewEvent) -> StoreResult<CalendarEvent> {
        self.lock()?.create_event(new)
    }

    fn delete_event(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete_event(id)
    }

    fn list_goals(&self) -> StoreResult<Vec<Goal>> {
        Ok(self.lock()?.goals.clone())
    }

    fn create_goal(&self, new: NewGoal) -> StoreResult<Goal> {
        self.lock()?.create_goal(new)
    }

    fn update_goal(&self, id: &str, patch: GoalPatch) -> StoreResult<Goal> {
        self.lock()?.update_goal(id, patch)
    }

    fn delete_goal(&self, id: &str) -> StoreResult<()> {
        self.lock()?.delete_goal(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scoreline_core::engine::{Dashboard, DashboardConfig};
    use scoreline_core::model::TestCategory;

    fn store_with_subject(name: &str) -> (MemoryStore, String) {
        let store = MemoryStore::new();
        let subject = store
            .create_subject(NewSubject {
                name: name.into(),
                color: "#2563eb".into(),
                icon: "book".into(),
            })
            .unwrap();
        (store, subject.id)
    }

    fn new_test(subject_id: &str, score: f64, total: f64, date: &str) -> NewTest {
        NewTest {
            name: format!("test-{score}"),
            subject_id: subject_id.into(),
            category: TestCategory::Mock,
            score,
            total_marks: total,
            date: date.parse().unwrap(),
            difficulty: None,
            time_spent_min: None,
            topics: vec![],
            notes: None,
        }
    }

    #[test]
    fn create_computes_percentage() {
        let (store, sid) = store_with_subject("Physics");
        let test = store
            .create_test(new_test(&sid, 85.0, 100.0, "2024-01-15"))
            .unwrap();
        assert_eq!(test.percentage, 85.0);
    }

    #[test]
    fn update_score_recomputes_percentage() {
        let (store, sid) = store_with_subject("Physics");
        let test = store
            .create_test(new_test(&sid, 85.0, 100.0, "2024-01-15"))
            .unwrap();

        let updated = store
            .update_test(
                &test.id,
                TestPatch {
                    score: Some(90.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.score, 90.0);
        assert_eq!(updated.total_marks, 100.0);
        assert_eq!(updated.percentage, 90.0);
    }

    #[test]
    fn update_without_marks_keeps_percentage() {
        let (store, sid) = store_with_subject("Physics");
        let test = store
            .create_test(new_test(&sid, 2.0, 3.0, "2024-01-15"))
            .unwrap();
        assert_eq!(test.percentage, 67.0);

        let updated = store
            .update_test(
                &test.id,
                TestPatch {
                    name: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.percentage, 67.0);
    }

    #[test]
    fn create_rejects_zero_total_marks() {
        let (store, sid) = store_with_subject("Physics");
        let err = store
            .create_test(new_test(&sid, 10.0, 0.0, "2024-01-15"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn create_rejects_unknown_subject() {
        let store = MemoryStore::new();
        let err = store
            .create_test(new_test("nope", 10.0, 20.0, "2024-01-15"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_test("missing", TestPatch::default())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                collection: "test",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_subject_name_rejected() {
        let (store, _) = store_with_subject("Physics");
        let err = store
            .create_subject(NewSubject {
                name: "Physics".into(),
                color: String::new(),
                icon: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }

    #[test]
    fn delete_subject_cascades_topics() {
        let (store, sid) = store_with_subject("Physics");
        store
            .create_topic(NewTopic {
                subject_id: sid.clone(),
                name: "Kinematics".into(),
                difficulty: None,
                progress: 30,
                last_studied: None,
            })
            .unwrap();
        assert_eq!(store.list_topics(None).unwrap().len(), 1);

        store.delete_subject(&sid).unwrap();
        assert!(store.list_topics(None).unwrap().is_empty());
        assert!(store.list_subjects().unwrap().is_empty());
    }

    #[test]
    fn deleted_subject_gone_from_breakdown() {
        let (store, sid) = store_with_subject("Physics");
        store
            .create_test(new_test(&sid, 70.0, 100.0, "2024-01-10"))
            .unwrap();
        store.delete_subject(&sid).unwrap();

        let dashboard = Dashboard::new(&store, DashboardConfig::default());
        let summary = dashboard
            .summarize(&TestFilter::default(), "2024-01-31".parse().unwrap())
            .unwrap();
        // No zero-count placeholder: the subject record itself is gone.
        assert!(summary.subjects.is_empty());
    }

    #[test]
    fn list_tests_applies_filter() {
        let (store, physics) = store_with_subject("Physics");
        let chemistry = store
            .create_subject(NewSubject {
                name: "Chemistry".into(),
                color: String::new(),
                icon: String::new(),
            })
            .unwrap()
            .id;
        store
            .create_test(new_test(&physics, 60.0, 100.0, "2024-01-01"))
            .unwrap();
        store
            .create_test(new_test(&chemistry, 90.0, 100.0, "2024-01-05"))
            .unwrap();

        let filter = TestFilter {
            subject_id: Some(physics),
            ..Default::default()
        };
        let tests = store.list_tests(&filter).unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].percentage, 60.0);
    }

    #[test]
    fn dashboard_summary_over_memory_store() {
        let (store, physics) = store_with_subject("Physics");
        let chemistry = store
            .create_subject(NewSubject {
                name: "Chemistry".into(),
                color: String::new(),
                icon: String::new(),
            })
            .unwrap()
            .id;
        store
            .create_test(new_test(&physics, 60.0, 100.0, "2024-01-01"))
            .unwrap();
        store
            .create_test(new_test(&physics, 80.0, 100.0, "2024-01-08"))
            .unwrap();
        store
            .create_test(new_test(&chemistry, 90.0, 100.0, "2024-01-05"))
            .unwrap();

        let today: NaiveDate = "2024-01-28".parse().unwrap();
        let dashboard = Dashboard::new(&store, DashboardConfig::default());
        let summary = dashboard.summarize(&TestFilter::default(), today).unwrap();

        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.average, 77.0);
        assert_eq!(summary.best, 90.0);
        assert_eq!(summary.worst, 60.0);
        assert_eq!(summary.trend_points, 20.0);
        assert_eq!(summary.subjects.len(), 2);
        assert_eq!(summary.weekly.len(), 4);
    }

    #[test]
    fn goal_lifecycle() {
        let store = MemoryStore::new();
        let goal = store
            .create_goal(NewGoal {
                name: "Weekly mocks".into(),
                period: scoreline_core::model::GoalPeriod::Weekly,
                target: 3.0,
                current: 0.0,
            })
            .unwrap();
        assert_eq!(goal.status, GoalStatus::Active);

        let updated = store
            .update_goal(
                &goal.id,
                GoalPatch {
                    current: Some(3.0),
                    status: Some(GoalStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, GoalStatus::Completed);
        assert_eq!(updated.progress(), 1.0);

        store.delete_goal(&goal.id).unwrap();
        assert!(store.list_goals().unwrap().is_empty());
    }
}
