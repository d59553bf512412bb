//! The `scoreline import` command.

use std::path::PathBuf;

use anyhow::Result;

use scoreline_core::parser::{apply_dataset, load_dataset_directory, parse_dataset, validate_dataset};

use super::open_store;

pub fn execute(path: PathBuf, dry_run: bool, config_path: Option<PathBuf>) -> Result<()> {
    let datasets = if path.is_dir() {
        load_dataset_directory(&path)?
    } else {
        vec![parse_dataset(&path)?]
    };

    let mut total_warnings = 0;
    for dataset in &datasets {
        println!(
            "Dataset: {} ({} subjects, {} tests)",
            dataset.name,
            dataset.subjects.len(),
            dataset.tests.len()
        );
        let warnings = validate_dataset(dataset);
        for w in &warnings {
            let prefix = w
                .entry
                .as_ref()
                .map(|e| format!("  [{e}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if dry_run {
        if total_warnings == 0 {
            println!("All datasets valid.");
        } else {
            println!("\n{total_warnings} warning(s) found.");
        }
        return Ok(());
    }

    let (_, store) = open_store(config_path)?;
    for dataset in &datasets {
        let summary = apply_dataset(&store, dataset)?;
        println!(
            "Imported '{}': {} subjects, {} tests, {} topics, {} events, {} goals",
            dataset.name,
            summary.subjects_created,
            summary.tests_created,
            summary.topics_created,
            summary.events_created,
            summary.goals_created
        );
    }

    Ok(())
}
