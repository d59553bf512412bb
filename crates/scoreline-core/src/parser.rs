//! TOML dataset parser.
//!
//! Loads record datasets from TOML files and directories, validates them,
//! and applies them to a record store. Datasets reference subjects by name,
//! since they are written by hand; the import step resolves names to ids.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{
    Difficulty, EventKind, GoalPeriod, NewEvent, NewGoal, NewSubject, NewTest, NewTopic,
    TestCategory,
};
use crate::store::{RecordStore, StoreResult};

/// Intermediate TOML structure for parsing dataset files.
#[derive(Debug, Deserialize)]
struct TomlDatasetFile {
    dataset: TomlDatasetHeader,
    #[serde(default)]
    subjects: Vec<TomlSubject>,
    #[serde(default)]
    tests: Vec<TomlTest>,
    #[serde(default)]
    topics: Vec<TomlTopic>,
    #[serde(default)]
    events: Vec<TomlEvent>,
    #[serde(default)]
    goals: Vec<TomlGoal>,
}

#[derive(Debug, Deserialize)]
struct TomlDatasetHeader {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlSubject {
    name: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct TomlTest {
    name: String,
    subject: String,
    category: String,
    score: f64,
    total_marks: f64,
    date: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    time_spent_min: Option<u32>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlTopic {
    subject: String,
    name: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    progress: u8,
    #[serde(default)]
    last_studied: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlEvent {
    title: String,
    kind: String,
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlGoal {
    name: String,
    period: String,
    target: f64,
    #[serde(default)]
    current: f64,
}

/// A parsed dataset, typed but not yet resolved against a store.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub description: String,
    pub subjects: Vec<DatasetSubject>,
    pub tests: Vec<DatasetTest>,
    pub topics: Vec<DatasetTopic>,
    pub events: Vec<DatasetEvent>,
    pub goals: Vec<DatasetGoal>,
}

#[derive(Debug, Clone)]
pub struct DatasetSubject {
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone)]
pub struct DatasetTest {
    pub name: String,
    /// Subject name, resolved to an id at import time.
    pub subject: String,
    pub category: TestCategory,
    pub score: f64,
    pub total_marks: f64,
    pub date: NaiveDate,
    pub difficulty: Option<Difficulty>,
    pub time_spent_min: Option<u32>,
    pub topics: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatasetTopic {
    pub subject: String,
    pub name: String,
    pub difficulty: Option<Difficulty>,
    pub progress: u8,
    pub last_studied: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct DatasetEvent {
    pub title: String,
    pub kind: EventKind,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatasetGoal {
    pub name: String,
    pub period: GoalPeriod,
    pub target: f64,
    pub current: f64,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {s}"))
}

/// Parse a single TOML file into a [`Dataset`].
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse a TOML string into a [`Dataset`] (useful for testing).
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Dataset> {
    let parsed: TomlDatasetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let subjects = parsed
        .subjects
        .into_iter()
        .map(|s| DatasetSubject {
            name: s.name,
            color: s.color,
            icon: s.icon,
        })
        .collect();

    let tests = parsed
        .tests
        .into_iter()
        .map(|t| {
            Ok(DatasetTest {
                category: t
                    .category
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("test '{}': {e}", t.name))?,
                difficulty: t
                    .difficulty
                    .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
                    .transpose()?,
                date: parse_date(&t.date)?,
                name: t.name,
                subject: t.subject,
                score: t.score,
                total_marks: t.total_marks,
                time_spent_min: t.time_spent_min,
                topics: t.topics,
                notes: t.notes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let topics = parsed
        .topics
        .into_iter()
        .map(|t| {
            Ok(DatasetTopic {
                difficulty: t
                    .difficulty
                    .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
                    .transpose()?,
                last_studied: t.last_studied.as_deref().map(parse_date).transpose()?,
                subject: t.subject,
                name: t.name,
                progress: t.progress,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let events = parsed
        .events
        .into_iter()
        .map(|e| {
            Ok(DatasetEvent {
                kind: e
                    .kind
                    .parse()
                    .map_err(|err: String| anyhow::anyhow!("event '{}': {err}", e.title))?,
                date: parse_date(&e.date)?,
                title: e.title,
                time: e.time,
                subject: e.subject,
                description: e.description,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let goals = parsed
        .goals
        .into_iter()
        .map(|g| {
            Ok(DatasetGoal {
                period: g
                    .period
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!("goal '{}': {e}", g.name))?,
                name: g.name,
                target: g.target,
                current: g.current,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset {
        name: parsed.dataset.name,
        description: parsed.dataset.description,
        subjects,
        tests,
        topics,
        events,
        goals,
    })
}

/// Recursively load all `.toml` dataset files from a directory, skipping
/// (and logging) files that fail to parse.
pub fn load_dataset_directory(dir: &Path) -> Result<Vec<Dataset>> {
    let mut datasets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            datasets.extend(load_dataset_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_dataset(&path) {
                Ok(ds) => datasets.push(ds),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(datasets)
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The offending entry name, if applicable.
    pub entry: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a dataset for common issues.
pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate subject names
    let mut seen = HashSet::new();
    for subject in &dataset.subjects {
        if !seen.insert(subject.name.as_str()) {
            warnings.push(ValidationWarning {
                entry: Some(subject.name.clone()),
                message: format!("duplicate subject name: {}", subject.name),
            });
        }
    }

    let declared: HashSet<&str> = dataset.subjects.iter().map(|s| s.name.as_str()).collect();

    for test in &dataset.tests {
        if test.name.trim().is_empty() {
            warnings.push(ValidationWarning {
                entry: Some(test.subject.clone()),
                message: "test name is empty".into(),
            });
        }
        if !declared.contains(test.subject.as_str()) {
            warnings.push(ValidationWarning {
                entry: Some(test.name.clone()),
                message: format!(
                    "subject '{}' is not declared; it will be created on import",
                    test.subject
                ),
            });
        }
        if test.total_marks <= 0.0 {
            warnings.push(ValidationWarning {
                entry: Some(test.name.clone()),
                message: "total_marks must be positive; this test will be rejected".into(),
            });
        } else if test.score > test.total_marks {
            warnings.push(ValidationWarning {
                entry: Some(test.name.clone()),
                message: "score exceeds total_marks; percentage will be above 100".into(),
            });
        }
    }

    for topic in &dataset.topics {
        if !declared.contains(topic.subject.as_str()) {
            warnings.push(ValidationWarning {
                entry: Some(topic.name.clone()),
                message: format!(
                    "subject '{}' is not declared; it will be created on import",
                    topic.subject
                ),
            });
        }
        if topic.progress > 100 {
            warnings.push(ValidationWarning {
                entry: Some(topic.name.clone()),
                message: format!("progress {} is out of range 0-100", topic.progress),
            });
        }
    }

    for goal in &dataset.goals {
        if goal.target <= 0.0 {
            warnings.push(ValidationWarning {
                entry: Some(goal.name.clone()),
                message: "goal target must be positive; this goal will be rejected".into(),
            });
        }
    }

    warnings
}

/// Counts of records created by an import.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub subjects_created: usize,
    pub tests_created: usize,
    pub topics_created: usize,
    pub events_created: usize,
    pub goals_created: usize,
}

/// Apply a dataset to a store, resolving subject names to ids and creating
/// subjects that do not exist yet. Records that fail store validation abort
/// the import with the store's error.
pub fn apply_dataset(store: &dyn RecordStore, dataset: &Dataset) -> StoreResult<ImportSummary> {
    let mut summary = ImportSummary::default();

    // Subject name -> id, seeded from the store so re-imports reuse ids.
    let mut subject_ids: HashMap<String, String> = store
        .list_subjects()?
        .into_iter()
        .map(|s| (s.name, s.id))
        .collect();

    for subject in &dataset.subjects {
        if subject_ids.contains_key(&subject.name) {
            continue;
        }
        let created = store.create_subject(NewSubject {
            name: subject.name.clone(),
            color: subject.color.clone(),
            icon: subject.icon.clone(),
        })?;
        subject_ids.insert(created.name.clone(), created.id);
        summary.subjects_created += 1;
    }

    for test in &dataset.tests {
        let subject_id = resolve_subject(store, &mut subject_ids, &mut summary, &test.subject)?;
        store.create_test(NewTest {
            name: test.name.clone(),
            subject_id,
            category: test.category,
            score: test.score,
            total_marks: test.total_marks,
            date: test.date,
            difficulty: test.difficulty,
            time_spent_min: test.time_spent_min,
            topics: test.topics.clone(),
            notes: test.notes.clone(),
        })?;
        summary.tests_created += 1;
    }

    for topic in &dataset.topics {
        let subject_id = resolve_subject(store, &mut subject_ids, &mut summary, &topic.subject)?;
        store.create_topic(NewTopic {
            subject_id,
            name: topic.name.clone(),
            difficulty: topic.difficulty,
            progress: topic.progress,
            last_studied: topic.last_studied,
        })?;
        summary.topics_created += 1;
    }

    for event in &dataset.events {
        let subject_id = match &event.subject {
            Some(name) => Some(resolve_subject(store, &mut subject_ids, &mut summary, name)?),
            None => None,
        };
        store.create_event(NewEvent {
            title: event.title.clone(),
            kind: event.kind,
            date: event.date,
            time: event.time.clone(),
            subject_id,
            description: event.description.clone(),
        })?;
        summary.events_created += 1;
    }

    for goal in &dataset.goals {
        store.create_goal(NewGoal {
            name: goal.name.clone(),
            period: goal.period,
            target: goal.target,
            current: goal.current,
        })?;
        summary.goals_created += 1;
    }

    tracing::info!(
        subjects = summary.subjects_created,
        tests = summary.tests_created,
        "applied dataset '{}'",
        dataset.name
    );

    Ok(summary)
}

/// Look up a subject id by name, creating the subject if it is new.
fn resolve_subject(
    store: &dyn RecordStore,
    subject_ids: &mut HashMap<String, String>,
    summary: &mut ImportSummary,
    name: &str,
) -> StoreResult<String> {
    if let Some(id) = subject_ids.get(name) {
        return Ok(id.clone());
    }
    let created = store.create_subject(NewSubject {
        name: name.to_string(),
        color: String::new(),
        icon: String::new(),
    })?;
    summary.subjects_created += 1;
    let id = created.id.clone();
    subject_ids.insert(created.name, created.id);
    Ok(id)
}
