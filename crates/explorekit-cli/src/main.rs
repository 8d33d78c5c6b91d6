//! Explorekit CLI - author and grade file explorer exercises
//!
//! Usage:
//!   explorekit diff before.json after.json            # Print categorized changes
//!   explorekit author before.json after.json -o ex.json   # Export an exercise
//!   explorekit validate ex.json                       # Check the task list
//!   explorekit check ex.json state.json               # Score a student state

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use explorekit::diff::diff_snapshots;
use explorekit::eval::evaluate_tasks;
use explorekit::fs::Snapshot;
use explorekit::task::{generate_tasks, Task};
use explorekit::{ExerciseConfig, ExerciseMeta};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Explorekit - simulated file explorer exercises
#[derive(Parser, Debug)]
#[command(name = "explorekit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log at debug level (EXPLOREKIT_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Diff two snapshots and print the change records as JSON
    Diff {
        /// Snapshot before the changes
        before: PathBuf,
        /// Snapshot after the changes
        after: PathBuf,
    },

    /// Turn the changes between two snapshots into an exported exercise
    Author {
        /// Start state handed to the student
        before: PathBuf,
        /// Target state the student should reach
        after: PathBuf,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the task list of an exercise file
    Validate {
        config: PathBuf,
    },

    /// Score a student state against an exercise
    Check {
        config: PathBuf,
        /// Student snapshot
        state: PathBuf,

        /// Exit with status 1 unless every task is completed
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logger(args.verbose);

    match args.command {
        Commands::Diff { before, after } => {
            let records = diff_snapshots(&load_snapshot(&before)?, &load_snapshot(&after)?)
                .context("Failed to diff snapshots")?;
            print_json(&records)?;
        }
        Commands::Author {
            before,
            after,
            title,
            description,
            output,
        } => {
            let initial = load_snapshot(&before)?;
            let records = diff_snapshots(&initial, &load_snapshot(&after)?)
                .context("Failed to diff snapshots")?;
            let tasks: Vec<Task> = generate_tasks(&records).into_iter().map(Task::from).collect();
            tracing::info!(records = records.len(), tasks = tasks.len(), "synthesized tasks");

            let draft = ExerciseConfig::new(ExerciseMeta { title, description }, initial, tasks);
            let exported = draft.export().context("Failed to export exercise")?;
            match output {
                Some(path) => exported
                    .save(&path)
                    .with_context(|| format!("Failed to write exercise: {}", path.display()))?,
                None => println!("{}", exported.to_json_pretty()?),
            }
        }
        Commands::Validate { config } => {
            let validation = load_config(&config)?.validation();
            if !validation.valid {
                for error in &validation.errors {
                    eprintln!("{error}");
                }
                std::process::exit(1);
            }
            println!("ok");
        }
        Commands::Check {
            config,
            state,
            strict,
        } => {
            let exercise = load_config(&config)?;
            let report = evaluate_tasks(&exercise.tasks, &load_snapshot(&state)?);
            print_json(&report)?;
            if strict && !report.all_completed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("Failed to read snapshot: {}", path.display()))
}

fn load_config(path: &Path) -> Result<ExerciseConfig> {
    ExerciseConfig::load(path).with_context(|| format!("Failed to read exercise: {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
