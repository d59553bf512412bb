//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level scoreline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorelineConfig {
    /// Path of the JSON store file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Number of 7-day windows in the weekly trend.
    #[serde(default = "default_weeks")]
    pub weeks: usize,
    /// Percentage-point delta below which a subject counts as unchanged
    /// when comparing reports.
    #[serde(default = "default_decline_threshold")]
    pub decline_threshold: f64,
    /// Whether per-subject breakdowns keep zero-test subjects.
    #[serde(default = "default_true")]
    pub include_empty_subjects: bool,
    /// Output directory for generated reports.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("scoreline-data.json")
}
fn default_weeks() -> usize {
    4
}
fn default_decline_threshold() -> f64 {
    2.0
}
fn default_true() -> bool {
    true
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./scoreline-reports")
}

impl Default for ScorelineConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            weeks: default_weeks(),
            decline_threshold: default_decline_threshold(),
            include_empty_subjects: true,
            report_dir: default_report_dir(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `scoreline.toml` in the current directory
/// 2. `~/.config/scoreline/config.toml`
///
/// Environment variable override: `SCORELINE_DATA_FILE`.
pub fn load_config_from(path: Option<&Path>) -> Result<ScorelineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("scoreline.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ScorelineConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ScorelineConfig::default(),
    };

    if let Ok(data_file) = std::env::var("SCORELINE_DATA_FILE") {
        config.data_file = PathBuf::from(data_file);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("scoreline"))
}
