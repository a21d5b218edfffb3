use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trekker_tokens_core::{append_changelog, build, BuildConfig, BuildReport, DiffOutcome};

#[derive(Parser)]
#[command(name = "trekker-tokens", version)]
#[command(about = "Build tokens.json from design-tool exports and keep its changelog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build tokens.json from extracted variable collections and text styles
    Build {
        /// JSON array of variable collections
        variables_json: PathBuf,
        /// JSON array of text styles
        styles_json: PathBuf,
        /// Where to write tokens.json; an existing file is backed up first
        output_json: PathBuf,
        /// JSON file overriding the grouping policy
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Diff two tokens.json files and append a changelog entry to the new one
    Diff {
        old_tokens_json: PathBuf,
        new_tokens_json: PathBuf,
        /// Free text stored with the entry
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Progress goes to stderr; stdout carries only the results.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "trekker_tokens=info,trekker_tokens_core=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `--help` and `--version` succeed; any other parse failure is a usage error
/// and exits with 1 rather than clap's 2.
fn exit_code_for(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(exit_code_for(&err));
        }
    };
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Build {
            variables_json,
            styles_json,
            output_json,
            config,
        } => {
            let config = match config {
                Some(path) => BuildConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => BuildConfig::default(),
            };
            tracing::debug!(?config, "grouping policy");
            let report = build(&variables_json, &styles_json, &output_json, &config)
                .context("Failed to build tokens")?;
            print_build_summary(&report);
        }
        Commands::Diff {
            old_tokens_json,
            new_tokens_json,
            notes,
        } => {
            let outcome = append_changelog(
                &old_tokens_json,
                &new_tokens_json,
                notes.as_deref(),
                chrono::Utc::now(),
            )
            .context("Failed to diff tokens")?;
            match outcome {
                DiffOutcome::Unchanged => {
                    println!("Added: 0, Changed: 0, Removed: 0");
                    println!("No changes detected, skipping changelog entry.");
                }
                DiffOutcome::Recorded { entry, position } => {
                    let summary = entry.summary;
                    println!(
                        "Added: {}, Changed: {}, Removed: {}",
                        summary.added, summary.changed, summary.removed
                    );
                    println!(
                        "Appended changelog entry #{position} to {}",
                        new_tokens_json.display()
                    );
                }
            }
        }
    }
    Ok(())
}

fn print_build_summary(report: &BuildReport) {
    if let Some(backup) = &report.backup {
        println!("Backed up previous tokens to {}", backup.path.display());
        if !backup.pruned.is_empty() {
            println!("Pruned {} old backup(s)", backup.pruned.len());
        }
    }
    if let Some(count) = report.preserved_entries {
        println!("Preserved {count} changelog entries");
    }
    println!("\nSummary:");
    println!(
        "{}",
        report
            .collections
            .iter()
            .map(|c| format!("  {}: {} groups, {} tokens", c.name, c.groups, c.tokens))
            .join("\n")
    );
    println!("\nExported to {}", report.output.display());
}
