//! JSON-file record store.
//!
//! One JSON document holds all collections. The file is read once on open
//! and rewritten after every successful mutation; reads are served from
//! memory. Single-process, single-writer by design.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use scoreline_core::error::StoreError;
use scoreline_core::model::{
    CalendarEvent, Goal, GoalPatch, NewEvent, NewGoal, NewSubject, NewTest, NewTopic, Subject,
    SubjectPatch, Test, TestPatch, Topic, TopicPatch,
};
use scoreline_core::store::{RecordStore, StoreResult, TestFilter};

use crate::memory::StoreData;

/// A record store persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: Mutex<StoreData>,
}

impl JsonStore {
    /// Open a store at `path`. A missing file starts an empty store; the
    /// file is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                StoreError::persistence(format!("failed to read {}: {e}", path.display()))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                StoreError::persistence(format!("failed to parse {}: {e}", path.display()))
            })?
        } else {
            tracing::debug!("no store file at {}, starting empty", path.display());
            StoreData::default()
        };
        Ok(Self {
            path,
            inner: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, StoreData>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::persistence("store lock poisoned"))
    }

    fn persist(&self, data: &StoreData) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::persistence(format!("failed to serialize store: {e}")))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::persistence(format!(
                        "failed to create {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        std::fs::write(&self.path, json).map_err(|e| {
            StoreError::persistence(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    /// Run a mutation against the in-memory data and persist on success.
    fn mutate<T>(&self, op: impl FnOnce(&mut StoreData) -> StoreResult<T>) -> StoreResult<T> {
        let mut data = self.lock()?;
        let result = op(&mut data)?;
        self.persist(&data)?;
        Ok(result)
    }
}

impl RecordStore for JsonStore {
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
        self.mutate(|data| data.create_test(new))
    }

    fn update_test(&self, id: &str, patch: TestPatch) -> StoreResult<Test> {
        self.mutate(|data| data.update_test(id, patch))
    }

    fn delete_test(&self, id: &str) -> StoreResult<()> {
        self.mutate(|data| data.delete_test(id))
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
        self.mutate(|data| data.create_subject(new))
    }

    fn update_subject(&self, id: &str, patch: SubjectPatch) -> StoreResult<Subject> {
        self.mutate(|data| data.update_subject(id, patch))
    }

    fn delete_subject(&self, id: &str) -> StoreResult<()> {
        self.mutate(|data| data.delete_subject(id))
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
        self.mutate(|data| data.create_topic(new))
    }

    fn update_topic(&self, id: &str, patch: TopicPatch) -> StoreResult<Topic> {
        self.mutate(|data| data.update_topic(id, patch))
    }

    fn delete_topic(&self, id: &str) -> StoreResult<()> {
        self.mutate(|data| data.delete_topic(id))
    }

    fn list_events(&self) -> StoreResult<Vec<CalendarEvent>> {
        Ok(self.lock()?.events.clone())
    }

    fn create_event(&self, new: NewEvent) -> StoreResult<CalendarEvent> {
        self.mutate(|data| data.create_event(new))
    }

    fn delete_event(&self, id: &str) -> StoreResult<()> {
        self.mutate(|data| data.delete_event(id))
    }

    fn list_goals(&self) -> StoreResult<Vec<Goal>> {
        Ok(self.lock()?.goals.clone())
    }

    fn create_goal(&self, new: NewGoal) -> StoreResult<Goal> {
        self.mutate(|data| data.create_goal(new))
    }

    fn update_goal(&self, id: &str, patch: GoalPatch) -> StoreResult<Goal> {
        self.mutate(|data| data.update_goal(id, patch))
    }

    fn delete_goal(&self, id: &str) -> StoreResult<()> {
        self.mutate(|data| data.delete_goal(id))
    }
}
