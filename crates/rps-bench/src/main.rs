use std::path::PathBuf;

use clap::Parser;

use rps_bench::arena::ArenaRunner;
use rps_bench::config::{BenchmarkConfig, ResolvedOutputs};
use rps_bench::logging::init_logging;
use rps_core::AppInfo;

/// Match harness for the rock/paper/scissors strategy selector.
#[derive(Debug, Parser)]
#[command(
    name = "rps-bench",
    author,
    version,
    about = "Deterministic rock/paper/scissors match harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/rps.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the maximum number of rounds per match.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed used for random opponents.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// End each match once a side reaches this many points.
    #[arg(long, value_name = "POINTS")]
    first_to: Option<u32>,

    /// Override the selector's memory horizon (0 disables forgetting).
    #[arg(long, value_name = "ROUNDS")]
    memory_horizon: Option<usize>,

    /// Emit a per-round policy trace regardless of config.
    #[arg(long)]
    trace: bool,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.matches.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.matches.seed = Some(seed);
    }

    if let Some(first_to) = cli.first_to {
        config.matches.first_to = Some(first_to);
    }

    if let Some(horizon) = cli.memory_horizon {
        config.selector.memory_horizon = horizon;
    }

    if cli.trace {
        config.selector.trace = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let opponent_count = config.opponents.len();
    let run_id = config.run_id.clone();
    let rounds = config.matches.rounds;
    let horizon = config.selector.memory_horizon;

    println!(
        "{} {}: loaded configuration '{run_id}' with {opponent_count} opponent{} (up to {rounds} rounds, memory horizon {horizon})",
        AppInfo::name(),
        AppInfo::version(),
        if opponent_count == 1 { "" } else { "s" }
    );

    let logging_guard = init_logging(&config.logging, config.selector.trace, &outputs)?;
    let runner = ArenaRunner::new(config, outputs)?;

    if cli.validate_only {
        for blueprint in runner.opponents() {
            println!("  opponent {:<16} {:?}", blueprint.name, blueprint.kind);
        }
        println!("Validation-only mode: no matches played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} matches, {} rounds → {} rows at {}",
        summary.matches_played,
        summary.rounds_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for result in &summary.results {
        println!(
            "  {:<16} {:>4} W {:>4} L {:>4} T  win rate {:.3}",
            result.opponent,
            result.wins,
            result.losses,
            result.ties,
            result.win_rate()
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
