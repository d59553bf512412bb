//! The `scoreline add` command.

use std::path::PathBuf;

use anyhow::Result;

use scoreline_core::model::{Difficulty, NewSubject, NewTest, TestCategory};
use scoreline_core::store::RecordStore;

use super::{open_store, parse_date_arg};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    name: String,
    subject: String,
    category: String,
    score: f64,
    total_marks: f64,
    date: Option<String>,
    difficulty: Option<String>,
    time_spent: Option<u32>,
    notes: Option<String>,
    create_subject: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;

    let category: TestCategory = category.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let difficulty: Option<Difficulty> = difficulty
        .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()?;
    let date = match date {
        Some(s) => parse_date_arg(&s)?,
        None => chrono::Utc::now().date_naive(),
    };

    let subject_id = match store.list_subjects()?.iter().find(|s| s.name == subject) {
        Some(existing) => existing.id.clone(),
        None if create_subject => {
            let created = store.create_subject(NewSubject {
                name: subject.clone(),
                color: String::new(),
                icon: String::new(),
            })?;
            println!("Created subject: {}", created.name);
            created.id
        }
        None => anyhow::bail!("unknown subject '{subject}' (use --create-subject to add it)"),
    };

    let test = store.create_test(NewTest {
        name,
        subject_id,
        category,
        score,
        total_marks,
        date,
        difficulty,
        time_spent_min: time_spent,
        topics: vec![],
        notes,
    })?;

    println!(
        "Recorded {}: {}/{} ({}%) on {}",
        test.name, test.score, test.total_marks, test.percentage, test.date
    );

    Ok(())
}
