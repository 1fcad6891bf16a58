//! # auditlens
//!
//! Command-line interface for the transaction audit toolkit.

mod loader;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use audit::{
    reference_table, AuditConfig, AuditReport, Auditor, Contamination, Dataset, DatasetSummary,
    DigitDistribution, OutlierResult, ZeroPolicy,
};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::loader::{load_csv_file, save_csv_file};

#[derive(Parser)]
#[command(name = "auditlens")]
#[command(about = "Transaction audit CLI: Benford first-digit test and isolation forest outliers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List columns and their inferred kinds
    Columns {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Row count, column count and the total of one column
    Summary {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Monetary column to total
        #[arg(short, long)]
        column: String,
    },

    /// Compare leading digits of a column against Benford's Law
    Benford {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Monetary column to analyse
        #[arg(short, long)]
        column: String,

        #[command(flatten)]
        tuning: Tuning,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flag outlying amounts with an isolation forest
    Scan {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Monetary column to analyse
        #[arg(short, long)]
        column: String,

        #[command(flatten)]
        tuning: Tuning,

        /// Write the analysed rows with score and label columns to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run both checks on a column
    Audit {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Monetary column to analyse
        #[arg(short, long)]
        column: String,

        #[command(flatten)]
        tuning: Tuning,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Benford expected distribution
    Reference,
}

/// Configuration file plus per-run overrides.
#[derive(Args, Debug, Default)]
struct Tuning {
    /// JSON audit configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// MAD above which the digit distribution is high risk
    #[arg(long)]
    threshold: Option<f64>,

    /// Expected share of outliers in (0, 0.5], or "auto"
    #[arg(long)]
    contamination: Option<Contamination>,

    /// Random seed for the isolation forest
    #[arg(long)]
    seed: Option<u64>,

    /// Number of isolation trees
    #[arg(long)]
    trees: Option<usize>,

    /// Subsample size per tree
    #[arg(long)]
    max_samples: Option<usize>,

    /// Treatment of zero amounts (exclude, retain)
    #[arg(long)]
    zero_policy: Option<ZeroPolicy>,
}

impl Tuning {
    /// Build the run configuration: file first, then flags.
    fn resolve(&self) -> anyhow::Result<AuditConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                AuditConfig::from_json(&json)?
            }
            None => AuditConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.benford.risk_threshold = threshold;
        }
        if let Some(contamination) = self.contamination {
            config.isolation.contamination = contamination;
        }
        if let Some(seed) = self.seed {
            config.isolation.seed = seed;
        }
        if let Some(trees) = self.trees {
            config.isolation.n_trees = trees;
        }
        if let Some(max_samples) = self.max_samples {
            config.isolation.max_samples = max_samples;
        }
        if let Some(policy) = self.zero_policy {
            config.zero_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }

    fn auditor(&self) -> anyhow::Result<Auditor> {
        Ok(Auditor::new(self.resolve()?)?)
    }
}

fn load(input: &Path) -> anyhow::Result<Dataset> {
    let dataset = load_csv_file(input)?;
    info!(
        rows = dataset.len(),
        columns = dataset.column_count(),
        "loaded {:?}",
        input.file_name().unwrap_or_default()
    );
    Ok(dataset)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

fn run_columns(input: PathBuf) -> anyhow::Result<()> {
    let dataset = load(&input)?;
    println!("{:<24} KIND", "COLUMN");
    for name in dataset.columns() {
        let kind = dataset.column_kind(name)?;
        println!("{:<24} {:?}", name, kind);
    }
    Ok(())
}

fn run_summary(input: PathBuf, column: String) -> anyhow::Result<()> {
    let dataset = load(&input)?;
    let summary = DatasetSummary::of(&dataset, &column)?;
    print_summary(&column, &summary);
    Ok(())
}

fn print_summary(column: &str, summary: &DatasetSummary) {
    println!("Rows: {}", summary.row_count);
    println!("Columns: {}", summary.column_count);
    println!("Numeric columns: {}", summary.numeric_columns.join(", "));
    println!("Total {}: {:.2}", column, summary.column_total);
}

fn run_benford(input: PathBuf, column: String, tuning: Tuning, json: bool) -> anyhow::Result<()> {
    let dataset = load(&input)?;
    let auditor = tuning.auditor()?;
    let dist = auditor.digits(&dataset, &column)?;

    if json {
        return print_json(&dist);
    }
    print_digits(&dist, auditor.config().benford.risk_threshold);
    Ok(())
}

fn print_digits(dist: &DigitDistribution, threshold: f64) {
    println!("Values analysed: {}", dist.total);
    println!("DIGIT  EXPECTED  OBSERVED   COUNT");
    for d in &dist.digits {
        println!(
            "{:>5}  {:>7.2}%  {:>7.2}%  {:>6}",
            d.digit,
            d.expected * 100.0,
            d.observed * 100.0,
            d.count
        );
    }
    println!("MAD: {:.4} (threshold {})", dist.mad, threshold);
    println!("Verdict: {}", dist.verdict(threshold));
}

fn run_scan(
    input: PathBuf,
    column: String,
    tuning: Tuning,
    output: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let dataset = load(&input)?;
    let auditor = tuning.auditor()?;
    let result = auditor.outliers(&dataset, &column)?;

    if let Some(path) = &output {
        let augmented = result.augment(&dataset)?;
        save_csv_file(path, &augmented)?;
        info!("scored rows written to {:?}", path);
    }

    if json {
        return print_json(&result);
    }
    print_outliers(&result);
    Ok(())
}

fn print_outliers(result: &OutlierResult) {
    println!("Rows scored: {}", result.rows.len());
    println!("Score threshold: {:.4}", result.threshold);
    println!("Anomalies found: {}", result.anomaly_count());

    if result.anomaly_count() > 0 {
        println!("\nAnomaly details:");
        for row in result.anomalies() {
            println!(
                "  Row {}: value={:.2}, score={:.4}",
                row.row_index, row.value, row.score
            );
        }
    }
}

fn run_audit(input: PathBuf, column: String, tuning: Tuning, json: bool) -> anyhow::Result<()> {
    let dataset = load(&input)?;
    let auditor = tuning.auditor()?;
    let report = auditor.run(&dataset, &column)?;

    if json {
        return print_json(&report);
    }
    print_report(&report, auditor.config().benford.risk_threshold);
    Ok(())
}

fn print_report(report: &AuditReport, threshold: f64) {
    print_summary(&report.column, &report.summary);
    println!("Rows analysed: {}", report.analysed_rows);

    println!("\n== Benford first-digit test ==");
    match report.digits.as_completed() {
        Some(dist) => print_digits(dist, threshold),
        None => print_failure(report.digits.error()),
    }

    println!("\n== Isolation forest ==");
    match report.outliers.as_completed() {
        Some(result) => print_outliers(result),
        None => print_failure(report.outliers.error()),
    }
}

fn print_failure(error: Option<&audit::AuditError>) {
    if let Some(e) = error {
        println!("Not computed: {}", e);
    }
}

fn run_reference() -> anyhow::Result<()> {
    println!("DIGIT  EXPECTED");
    for (digit, percent) in reference_table() {
        println!("{:>5}  {:>7.2}%", digit, percent);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auditlens=info,audit_core=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Columns { input } => run_columns(input),

        Commands::Summary { input, column } => run_summary(input, column),

        Commands::Benford {
            input,
            column,
            tuning,
            json,
        } => run_benford(input, column, tuning, json),

        Commands::Scan {
            input,
            column,
            tuning,
            output,
            json,
        } => run_scan(input, column, tuning, output, json),

        Commands::Audit {
            input,
            column,
            tuning,
            json,
        } => run_audit(input, column, tuning, json),

        Commands::Reference => run_reference(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
