//! The `scoreline report` command.

use std::path::PathBuf;

use anyhow::Result;

use scoreline_core::engine::{Dashboard, DashboardConfig};
use scoreline_core::report::{PerformanceReport, ReportPeriod};

use super::{build_filter, open_store};

pub fn execute(
    output: Option<PathBuf>,
    label: String,
    from: Option<String>,
    to: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let filter = build_filter(&store, None, None, from, to)?;

    let dashboard_config = DashboardConfig {
        weeks: config.weeks,
        include_empty_subjects: config.include_empty_subjects,
        ..Default::default()
    };
    let dashboard = Dashboard::new(&store, dashboard_config);
    let summary = dashboard.summarize(&filter, chrono::Utc::now().date_naive())?;

    let report = PerformanceReport::new(
        ReportPeriod {
            from: filter.from,
            to: filter.to,
            label,
        },
        summary,
    );

    let path = match output {
        Some(path) => path,
        None => {
            let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
            config.report_dir.join(format!("report-{timestamp}.json"))
        }
    };

    report.save_json(&path)?;
    println!("Report saved to: {}", path.display());

    Ok(())
}
