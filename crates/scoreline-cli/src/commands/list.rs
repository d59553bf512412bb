//! The `scoreline list` command.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use scoreline_core::store::RecordStore;

use super::{build_filter, open_store};

pub fn execute(
    subject: Option<String>,
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let filter = build_filter(&store, subject, category, from, to)?;

    let mut tests = store.list_tests(&filter)?;
    tests.sort_by_key(|t| t.date);

    if tests.is_empty() {
        println!("No tests recorded.");
        return Ok(());
    }

    let subject_names: HashMap<String, String> = store
        .list_subjects()?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut table = Table::new();
    table.set_header(vec!["Date", "Name", "Subject", "Category", "Score", "%"]);
    for t in &tests {
        let subject = subject_names
            .get(&t.subject_id)
            .map(String::as_str)
            .unwrap_or("(deleted)");
        table.add_row(vec![
            Cell::new(t.date),
            Cell::new(&t.name),
            Cell::new(subject),
            Cell::new(t.category),
            Cell::new(format!("{}/{}", t.score, t.total_marks)),
            Cell::new(format!("{:.0}%", t.percentage)),
        ]);
    }

    println!("{table}");
    println!("{} test(s)", tests.len());

    Ok(())
}
