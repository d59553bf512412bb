//! Performance report snapshots with JSON persistence and progress
//! comparison between two snapshots.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::DashboardSummary;

/// A point-in-time snapshot of the dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was generated.
    pub created_at: DateTime<Utc>,
    /// The period the report covers.
    pub period: ReportPeriod,
    /// The computed figures.
    pub summary: DashboardSummary,
}

/// Date range a report covers. Open bounds mean "everything on record".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPeriod {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Human-readable label (e.g. "January 2024").
    #[serde(default)]
    pub label: String,
}

impl PerformanceReport {
    pub fn new(period: ReportPeriod, summary: DashboardSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            period,
            summary,
        }
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: PerformanceReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against an earlier baseline. A subject whose
    /// average moved by more than `threshold` points lands in improvements
    /// or declines; the rest count as unchanged.
    pub fn compare(&self, baseline: &PerformanceReport, threshold: f64) -> ProgressReport {
        let mut improvements = Vec::new();
        let mut declines = Vec::new();
        let mut unchanged = 0usize;
        let mut new_subjects = 0usize;

        for current in &self.summary.subjects {
            let Some(base) = baseline
                .summary
                .subjects
                .iter()
                .find(|s| s.subject_id == current.subject_id)
            else {
                new_subjects += 1;
                continue;
            };
            let delta = current.average - base.average;
            let shift = SubjectShift {
                subject_id: current.subject_id.clone(),
                name: current.name.clone(),
                baseline_average: base.average,
                current_average: current.average,
                delta,
            };
            if delta > threshold {
                improvements.push(shift);
            } else if delta < -threshold {
                declines.push(shift);
            } else {
                unchanged += 1;
            }
        }

        let dropped_subjects = baseline
            .summary
            .subjects
            .iter()
            .filter(|b| {
                !self
                    .summary
                    .subjects
                    .iter()
                    .any(|c| c.subject_id == b.subject_id)
            })
            .count();

        ProgressReport {
            overall_delta: self.summary.average - baseline.summary.average,
            improvements,
            declines,
            unchanged,
            new_subjects,
            dropped_subjects,
        }
    }
}

/// Result of comparing two performance reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Overall average delta in percentage points.
    pub overall_delta: f64,
    /// Subjects whose average went up.
    pub improvements: Vec<SubjectShift>,
    /// Subjects whose average went down.
    pub declines: Vec<SubjectShift>,
    /// Subjects with no significant change.
    pub unchanged: usize,
    /// Subjects in current but not baseline.
    pub new_subjects: usize,
    /// Subjects in baseline but not current.
    pub dropped_subjects: usize,
}

/// A subject whose average moved between two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectShift {
    pub subject_id: String,
    pub name: String,
    pub baseline_average: f64,
    pub current_average: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** overall {:+.0} pts, {} improved, {} declined, {} unchanged\n\n",
            self.overall_delta,
            self.improvements.len(),
            self.declines.len(),
            self.unchanged
        ));

        if !self.declines.is_empty() {
            md.push_str("### Declines\n\n");
            md.push_str("| Subject | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for d in &self.declines {
                md.push_str(&format!(
                    "| {} | {:.0}% | {:.0}% | {:+.0} |\n",
                    d.name, d.baseline_average, d.current_average, d.delta
                ));
            }
            md.push('\n');
        }

        if !self.improvements.is_empty() {
            md.push_str("### Improvements\n\n");
            md.push_str("| Subject | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for i in &self.improvements {
                md.push_str(&format!(
                    "| {} | {:.0}% | {:.0}% | {:+.0} |\n",
                    i.name, i.baseline_average, i.current_average, i.delta
                ));
            }
        }

        md
    }

    /// Returns true if any subject declined.
    pub fn has_declines(&self) -> bool {
        !self.declines.is_empty()
    }
}
