//! The `scoreline summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use scoreline_core::engine::{Dashboard, DashboardConfig, DashboardSummary};

use super::{build_filter, open_store};

pub fn execute(
    subject: Option<String>,
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
    weeks: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let filter = build_filter(&store, subject, category, from, to)?;

    let dashboard_config = DashboardConfig {
        weeks: weeks.unwrap_or(config.weeks),
        include_empty_subjects: config.include_empty_subjects,
        ..Default::default()
    };
    let dashboard = Dashboard::new(&store, dashboard_config);
    let summary = dashboard.summarize(&filter, chrono::Utc::now().date_naive())?;

    if summary.total_tests == 0 {
        println!("No tests recorded yet.");
        return Ok(());
    }

    print_overview(&summary);
    print_subjects(&summary);
    print_weekly(&summary);

    Ok(())
}

fn print_overview(summary: &DashboardSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        "Tests",
        "Average",
        "Best",
        "Worst",
        "Trend",
        "Consistency",
    ]);
    table.add_row(vec![
        Cell::new(summary.total_tests),
        Cell::new(format!("{:.0}%", summary.average)),
        Cell::new(format!("{:.0}%", summary.best)),
        Cell::new(format!("{:.0}%", summary.worst)),
        Cell::new(format!("{:+.0} pts", summary.trend_points)),
        Cell::new(format!("{:.0}", summary.consistency)),
    ]);
    println!("{table}");
}

fn print_subjects(summary: &DashboardSummary) {
    if summary.subjects.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Subject", "Tests", "Average", "Best", "Worst"]);
    for s in &summary.subjects {
        table.add_row(vec![
            Cell::new(&s.name),
            Cell::new(s.count),
            Cell::new(format!("{:.0}%", s.average)),
            Cell::new(format!("{:.0}%", s.best)),
            Cell::new(format!("{:.0}%", s.worst)),
        ]);
    }
    println!("\nBy subject:\n{table}");
}

fn print_weekly(summary: &DashboardSummary) {
    if summary.weekly.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Week", "Tests", "Average"]);
    for w in &summary.weekly {
        let average = match w.average {
            Some(avg) => format!("{avg:.0}%"),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(format!("{} .. {}", w.start, w.end)),
            Cell::new(w.count),
            Cell::new(average),
        ]);
    }
    println!("\nWeekly trend:\n{table}");
}
