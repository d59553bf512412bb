//! The `scoreline compare` command.

use std::path::PathBuf;

use anyhow::Result;

use scoreline_core::report::PerformanceReport;
use scoreline_store::config::load_config_from;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_decline: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let baseline = PerformanceReport::load_json(&baseline_path)?;
    let current = PerformanceReport::load_json(&current_path)?;

    let config = load_config_from(config_path.as_deref())?;
    let threshold = threshold.unwrap_or(config.decline_threshold);

    let progress = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", progress.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        _ => {
            // text format
            println!(
                "Progress: overall {:+.0} pts, {} improved, {} declined, {} unchanged",
                progress.overall_delta,
                progress.improvements.len(),
                progress.declines.len(),
                progress.unchanged
            );

            if !progress.declines.is_empty() {
                println!("\nDeclined:");
                for d in &progress.declines {
                    println!(
                        "  {} {:.0}% -> {:.0}% ({:+.0})",
                        d.name, d.baseline_average, d.current_average, d.delta
                    );
                }
            }

            if !progress.improvements.is_empty() {
                println!("\nImproved:");
                for i in &progress.improvements {
                    println!(
                        "  {} {:.0}% -> {:.0}% ({:+.0})",
                        i.name, i.baseline_average, i.current_average, i.delta
                    );
                }
            }

            if progress.new_subjects > 0 {
                println!("\n{} new subject(s)", progress.new_subjects);
            }
            if progress.dropped_subjects > 0 {
                println!("{} dropped subject(s)", progress.dropped_subjects);
            }
        }
    }

    if fail_on_decline && progress.has_declines() {
        std::process::exit(1);
    }

    Ok(())
}
