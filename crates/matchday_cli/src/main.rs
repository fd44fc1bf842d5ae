//! Matchday CLI
//!
//! Runs single matches (paced or instant) and seeded batches from JSON inputs.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use matchday_core::{
    cancel_pair, simulate_batch, EngineError, MatchEngine, MatchRecord, MinuteTick, RunPolicy,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Simulate football matches minute by minute", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate one match, printing events as they happen
    Run {
        /// Roster JSON file (array of players)
        #[arg(long)]
        roster: PathBuf,

        /// Settings JSON file
        #[arg(long)]
        settings: PathBuf,

        /// RNG seed for a reproducible match
        #[arg(long)]
        seed: Option<u64>,

        /// Skip pacing and play every minute back to back
        #[arg(long, default_value = "false")]
        instant: bool,

        /// Tuning file (JSON or YAML); falls back to MATCHDAY_TUNING_PATH
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Opponent name stored in the match record
        #[arg(long, default_value = "Opponent")]
        opponent: String,

        /// Append the result to this JSON history file
        #[arg(long)]
        record: Option<PathBuf>,

        /// Reject an empty roster
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Simulate many seeded matches in parallel and summarise them
    Batch {
        /// Roster JSON file (array of players)
        #[arg(long)]
        roster: PathBuf,

        /// Settings JSON file
        #[arg(long)]
        settings: PathBuf,

        /// Number of matches
        #[arg(long, default_value = "100")]
        runs: u32,

        /// Seed of the first match; match i uses seed + i
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Tuning file (JSON or YAML); falls back to MATCHDAY_TUNING_PATH
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print JSON Schemas for the roster and settings files
    Schema,
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match execute(cli.command).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::ExitCode::from(matchday_cli::exit_code(&e))
        }
    }
}

#[cfg(feature = "cli")]
async fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            roster,
            settings,
            seed,
            instant,
            tuning,
            opponent,
            record,
            strict,
        } => {
            let roster = matchday_cli::load_roster(&roster)?;
            let settings = matchday_cli::load_settings(&settings)?;
            let tuning = matchday_cli::load_tuning(tuning.as_deref())?;
            let policy = if strict { RunPolicy::strict() } else { RunPolicy::permissive() };

            let mut builder = MatchEngine::builder(&roster, settings).tuning(tuning).policy(policy);
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            let engine = builder.build()?;

            println!("Kick-off: {} players vs {}", roster.len(), opponent);
            let print_tick = |tick: &MinuteTick| {
                for event in &tick.events {
                    println!("{}", matchday_cli::format_event(event));
                }
            };

            let outcome = if instant {
                engine.run_instant(print_tick)
            } else {
                let (handle, token) = cancel_pair();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        handle.cancel();
                    }
                });
                engine.run_with_cancel(print_tick, &token).await
            };

            let result = match outcome {
                Ok(result) => result,
                Err(EngineError::Cancelled { minute }) => {
                    println!("\nMatch abandoned after {} minutes", minute);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            print!("{}", matchday_cli::format_result(&result));

            if let Some(path) = record {
                let played_on = chrono::Local::now().date_naive();
                let entry = MatchRecord::from_result(opponent, played_on, &result);
                let total = matchday_cli::append_record(&path, entry)?;
                tracing::info!(path = %path.display(), total, "match recorded");
            }
        }

        Commands::Batch {
            roster,
            settings,
            runs,
            seed,
            tuning,
            json,
        } => {
            let roster = matchday_cli::load_roster(&roster)?;
            let settings = matchday_cli::load_settings(&settings)?;
            let tuning = matchday_cli::load_tuning(tuning.as_deref())?;

            let summary = tokio::task::spawn_blocking(move || {
                simulate_batch(&roster, &settings, &tuning, seed, runs)
            })
            .await??;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", matchday_cli::format_summary(&summary));
            }
        }

        Commands::Schema => {
            println!("{}", matchday_cli::input_schemas()?);
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
}
