//! rankdup CLI - retrieval evaluation and duplicate detection
//!
//! This binary provides the command-line interface for the rankdup tools.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use rankdup::{duplicates, evaluation, report};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rankdup_core::config::Config;
use rankdup_core::tsv::create_file;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rankdup")]
#[command(about = "Ranked-retrieval evaluation and shingle-based duplicate detection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every configured run and rank configurations by MRR
    Evaluate {
        /// Only evaluate runs on this dataset
        #[arg(long)]
        dataset: Option<String>,
        /// Write all metric records to this file as JSON
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Grade precomputed search engine results with precision and recall at k
    Grade {
        #[arg(long, value_name = "FILE")]
        ground_truth: PathBuf,
        /// One ranked results file per engine
        #[arg(long, value_name = "FILE", num_args = 1.., required = true)]
        results: Vec<PathBuf>,
        /// Cutoff, overriding grading.k
        #[arg(long)]
        k: Option<usize>,
    },
    /// Shingle a corpus and write the shingle-id table
    Shingles {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Count exact duplicates in a shingle-id table
    ExactDuplicates {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Write the duplicate pairs to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Compute every near-duplicate pair by brute force
    NearDuplicates {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Minimum Jaccard similarity, overriding near_duplicates.threshold
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Score predicted near duplicates against a ground-truth table
    Detection {
        #[arg(short, long, value_name = "FILE")]
        ground_truth: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        pred: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let Some(command) = cli.command else {
        println!("Run 'rankdup evaluate' to score configured runs, or --help for more options");
        return Ok(());
    };

    let mut config = load_config(cli.config.as_deref())?;

    match command {
        Commands::Evaluate { dataset, output } => {
            evaluate(&config, dataset.as_deref(), output.as_deref())
        }
        Commands::Grade {
            ground_truth,
            results,
            k,
        } => {
            if let Some(k) = k {
                config.grading.k = k;
            }
            config.validate()?;
            let grades = evaluation::grade_engines(&ground_truth, &results, &config.grading)?;
            println!("{}", report::grade_report(&grades, config.grading.k));
            Ok(())
        }
        Commands::Shingles { input, output } => {
            let rows =
                duplicates::build_shingle_file(&input, &output, &config.corpus, &config.shingling)?;
            println!("Wrote {rows} shingle sets to {}", output.display());
            Ok(())
        }
        Commands::ExactDuplicates { input, output } => {
            let pairs = duplicates::exact_duplicates(&input, output.as_deref())?;
            println!("Found {pairs} duplicates");
            Ok(())
        }
        Commands::NearDuplicates {
            input,
            threshold,
            output,
        } => {
            if let Some(threshold) = threshold {
                config.near_duplicates.threshold = threshold;
            }
            config.validate()?;
            let rows =
                duplicates::near_duplicates(&input, config.near_duplicates.threshold, &output)?;
            println!("Wrote {rows} near-duplicate pairs to {}", output.display());
            Ok(())
        }
        Commands::Detection { ground_truth, pred } => {
            let detection = duplicates::detection(&ground_truth, &pred)?;
            println!("{}", report::detection_report(&detection));
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "rankdup={level},rankdup_core={level},rankdup_eval={level},rankdup_dedup={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn evaluate(config: &Config, dataset: Option<&str>, output: Option<&Path>) -> Result<()> {
    let records = evaluation::evaluate_runs(config, dataset)?;

    for record in &records {
        println!("{}\n", record.report());
    }
    let top = evaluation::top_per_dataset(&records, config.evaluation.top_n);
    println!("{}", report::top_configurations(&top));

    if let Some(output) = output {
        let file = create_file(output)?;
        serde_json::to_writer_pretty(file, &records)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Saved {} metric records to {}", records.len(), output.display());
    }

    Ok(())
}
