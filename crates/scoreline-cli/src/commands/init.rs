//! The `scoreline init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create scoreline.toml
    if std::path::Path::new("scoreline.toml").exists() {
        println!("scoreline.toml already exists, skipping.");
    } else {
        std::fs::write("scoreline.toml", SAMPLE_CONFIG)?;
        println!("Created scoreline.toml");
    }

    // Create example dataset
    std::fs::create_dir_all("datasets")?;
    let example_path = std::path::Path::new("datasets/example.toml");
    if example_path.exists() {
        println!("datasets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: scoreline import datasets/example.toml --dry-run");
    println!("  2. Run: scoreline import datasets/example.toml");
    println!("  3. Run: scoreline summary");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# scoreline configuration

data_file = "scoreline-data.json"
report_dir = "./scoreline-reports"
weeks = 4
decline_threshold = 2.0
include_empty_subjects = true
"#;

const EXAMPLE_DATASET: &str = r##"[dataset]
name = "Example term"
description = "A small example dataset to get started"

[[subjects]]
name = "Physics"
color = "#2563eb"
icon = "atom"

[[subjects]]
name = "Chemistry"
color = "#16a34a"
icon = "flask"

[[tests]]
name = "Mock #1"
subject = "Physics"
category = "mock"
score = 60
total_marks = 100
date = "2024-01-01"
difficulty = "medium"
topics = ["kinematics"]

[[tests]]
name = "Mock #2"
subject = "Physics"
category = "mock"
score = 80
total_marks = 100
date = "2024-01-08"

[[tests]]
name = "Organic quiz"
subject = "Chemistry"
category = "practice"
score = 45
total_marks = 50
date = "2024-01-05"

[[topics]]
subject = "Physics"
name = "Kinematics"
difficulty = "medium"
progress = 60
last_studied = "2024-01-05"

[[events]]
title = "Mock #3"
kind = "test"
date = "2024-02-01"
time = "09:00"
subject = "Physics"

[[goals]]
name = "Weekly mocks"
period = "weekly"
target = 3
current = 1
"##;
