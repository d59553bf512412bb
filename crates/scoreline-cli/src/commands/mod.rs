pub mod add;
pub mod compare;
pub mod import;
pub mod init;
pub mod list;
pub mod report;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use scoreline_core::model::TestCategory;
use scoreline_core::store::TestFilter;
use scoreline_store::config::{load_config_from, ScorelineConfig};
use scoreline_store::JsonStore;

/// Load config and open the JSON store it points at.
pub(crate) fn open_store(config_path: Option<PathBuf>) -> Result<(ScorelineConfig, JsonStore)> {
    let config = load_config_from(config_path.as_deref())?;
    let store = JsonStore::open(&config.data_file)
        .with_context(|| format!("failed to open store: {}", config.data_file.display()))?;
    Ok((config, store))
}

pub(crate) fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Build a test filter from CLI arguments, resolving a subject name to its
/// id against the store.
pub(crate) fn build_filter(
    store: &JsonStore,
    subject: Option<String>,
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<TestFilter> {
    use scoreline_core::store::RecordStore;

    let subject_id = match subject {
        Some(name) => {
            let subjects = store.list_subjects()?;
            let found = subjects
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| anyhow::anyhow!("unknown subject: {name}"))?;
            Some(found.id.clone())
        }
        None => None,
    };

    let category = category
        .map(|c| {
            c.parse::<TestCategory>()
                .map_err(|e| anyhow::anyhow!("{e}"))
        })
        .transpose()?;

    Ok(TestFilter {
        subject_id,
        category,
        from: from.as_deref().map(parse_date_arg).transpose()?,
        to: to.as_deref().map(parse_date_arg).transpose()?,
    })
}
