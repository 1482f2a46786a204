//! # CLI Module
//!
//! Command-line interface for the directory tree checksummer.
//!
//! ## Usage
//! ```bash
//! # Checksum every file under a directory
//! dirhash scan ~/data
//!
//! # More workers, faster algorithm
//! dirhash scan ~/data --workers 16 --algorithm xxh3
//!
//! # JSON output
//! dirhash scan ~/data --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use dirhash::core::hasher::ChecksumAlgorithmKind;
use dirhash::core::pipeline::{Pipeline, PipelineReport};
use dirhash::core::worker::HashOutcome;
use dirhash::error::Result;
use dirhash::events::{CrawlEvent, Event, EventChannel, HashEvent, PipelineEvent};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;

/// dirhash - checksum a directory tree concurrently
#[derive(Parser, Debug)]
#[command(name = "dirhash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recursively checksum every regular file under a root directory
    Scan {
        /// Root directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Number of hashing workers
        #[arg(short, long, default_value = "10")]
        workers: usize,

        /// Checksum algorithm to use
        #[arg(short, long, default_value = "blake3")]
        algorithm: Algorithm,

        /// Task queue capacity (bounds crawler memory)
        #[arg(long, default_value = "128")]
        queue_capacity: usize,

        /// Follow symbolic links
        #[arg(long)]
        follow_symlinks: bool,

        /// Maximum directory depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Print per-file checksums in pretty output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// BLAKE3 - cryptographic, collision-resistant (default)
    Blake3,
    /// XXH3 - non-cryptographic, fastest
    Xxh3,
}

impl From<Algorithm> for ChecksumAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Blake3 => ChecksumAlgorithmKind::Blake3,
            Algorithm::Xxh3 => ChecksumAlgorithmKind::Xxh3,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// One `<checksum>  <path>` line per file
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    dirhash::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            workers,
            algorithm,
            queue_capacity,
            follow_symlinks,
            max_depth,
            output,
            verbose,
        } => run_scan(
            path,
            workers,
            algorithm.into(),
            queue_capacity,
            follow_symlinks,
            max_depth,
            output,
            verbose,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scan(
    path: PathBuf,
    workers: usize,
    algorithm: ChecksumAlgorithmKind,
    queue_capacity: usize,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("dirhash").bold().cyan(),
            style(format!("({}, {workers} workers)", algorithm.description())).dim()
        ))
        .ok();
    }

    let pipeline = Pipeline::builder()
        .root(path)
        .workers(workers)
        .algorithm(algorithm)
        .queue_capacity(queue_capacity)
        .follow_symlinks(follow_symlinks)
        .max_depth(max_depth)
        .build();

    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output; the bar's length grows as the
    // crawler discovers files while workers advance the position
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else { continue };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{phase}"));
                }
                Event::Crawl(CrawlEvent::FileFound { .. }) => {
                    pb.inc_length(1);
                }
                Event::Hash(HashEvent::FileHashed { .. }) | Event::Hash(HashEvent::Error { .. }) => {
                    pb.inc(1);
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let report = pipeline.run_with_events(&sender)?;

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &report, verbose),
        OutputFormat::Json => print_json_results(&report),
        OutputFormat::Minimal => print_minimal_results(&report),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, report: &PipelineReport, verbose: bool) {
    term.write_line("").ok();

    if report.interrupted {
        term.write_line(&format!("{}", style("Scan interrupted").yellow().bold()))
            .ok();
    }

    term.write_line(&format!(
        "{} discovered, {} hashed, {} failed ({} bytes)",
        style(report.files_discovered).bold(),
        style(report.files_hashed).green(),
        if report.files_failed > 0 {
            style(report.files_failed).red()
        } else {
            style(report.files_failed).dim()
        },
        report.bytes_hashed,
    ))
    .ok();

    term.write_line(&format!(
        "crawl {:.2}s, hash {:.2}s",
        report.crawl_duration.as_secs_f64(),
        report.hash_duration.as_secs_f64(),
    ))
    .ok();

    if report.walk_errors > 0 {
        term.write_line(&format!(
            "{} unreadable director{} skipped",
            style(report.walk_errors).yellow(),
            if report.walk_errors == 1 { "y" } else { "ies" }
        ))
        .ok();
    }

    if verbose {
        term.write_line("").ok();
        for result in &report.results {
            if let HashOutcome::Hashed { checksum, .. } = &result.outcome {
                println!("{}  {}", checksum.to_hex(), result.task.path.display());
            }
        }
    }

    // Failures always shown; a failed file is not a file never attempted
    for result in &report.results {
        if let HashOutcome::Failed { error } = &result.outcome {
            term.write_line(&format!(
                "{} {}: {}",
                style("failed").red(),
                result.task.path.display(),
                error
            ))
            .ok();
        }
    }
}

fn print_json_results(report: &PipelineReport) {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        summary: dirhash::events::PipelineSummary,
        interrupted: bool,
        results: &'a [dirhash::core::worker::HashResult],
    }

    let json = JsonReport {
        summary: report.summary(),
        interrupted: report.interrupted,
        results: &report.results,
    };

    match serde_json::to_string_pretty(&json) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}

fn print_minimal_results(report: &PipelineReport) {
    for result in &report.results {
        match &result.outcome {
            HashOutcome::Hashed { checksum, .. } => {
                println!("{}  {}", checksum.to_hex(), result.task.path.display());
            }
            HashOutcome::Failed { error } => {
                eprintln!("failed  {}: {}", result.task.path.display(), error);
            }
        }
    }
}
