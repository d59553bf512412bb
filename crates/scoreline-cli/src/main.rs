//! scoreline CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "scoreline", version, about = "Exam performance tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one test result
    Add {
        /// Test name (e.g. "Mock #3")
        #[arg(long)]
        name: String,

        /// Subject name
        #[arg(long)]
        subject: String,

        /// Category: mock, practice, sectional, full
        #[arg(long, default_value = "practice")]
        category: String,

        /// Marks obtained
        #[arg(long)]
        score: f64,

        /// Maximum obtainable marks
        #[arg(long)]
        total_marks: f64,

        /// Test date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Difficulty: easy, medium, hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Time spent in minutes
        #[arg(long)]
        time_spent: Option<u32>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Create the subject if it does not exist
        #[arg(long)]
        create_subject: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recorded tests
    List {
        /// Filter by subject name
        #[arg(long)]
        subject: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the dashboard summary
    Summary {
        /// Filter by subject name
        #[arg(long)]
        subject: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Number of weekly trend windows
        #[arg(long)]
        weeks: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Import a TOML dataset file or directory
    Import {
        /// Path to a .toml dataset or directory of datasets
        path: PathBuf,

        /// Validate only, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a performance report snapshot as JSON
    Report {
        /// Output file (default: <report_dir>/report-<timestamp>.json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report label
        #[arg(long, default_value = "")]
        label: String,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two report snapshots
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Percentage-point delta below which a subject is unchanged
        /// (default: decline_threshold from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Exit code 1 if any subject declined
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scoreline=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            name,
            subject,
            category,
            score,
            total_marks,
            date,
            difficulty,
            time_spent,
            notes,
            create_subject,
            config,
        } => commands::add::execute(
            name,
            subject,
            category,
            score,
            total_marks,
            date,
            difficulty,
            time_spent,
            notes,
            create_subject,
            config,
        ),
        Commands::List {
            subject,
            category,
            from,
            to,
            config,
        } => commands::list::execute(subject, category, from, to, config),
        Commands::Summary {
            subject,
            category,
            from,
            to,
            weeks,
            config,
        } => commands::summary::execute(subject, category, from, to, weeks, config),
        Commands::Import {
            path,
            dry_run,
            config,
        } => commands::import::execute(path, dry_run, config),
        Commands::Report {
            output,
            label,
            from,
            to,
            config,
        } => commands::report::execute(output, label, from, to, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
            config,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
