mod summary;

pub use summary::write_markdown;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use rps_bot::policy::PolicySpec;
use rps_bot::selector::{PolicyStanding, SelectorError, StrategySelector};
use rps_core::game::{MatchError, MatchState, Side};
use rps_core::model::{Move, Outcome};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::opponents::{OpponentBlueprint, OpponentError};

/// Plays the configured selector against every practice opponent.
pub struct ArenaRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    roster: Vec<PolicySpec>,
    opponents: Vec<OpponentBlueprint>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub results: Vec<MatchResult>,
}

/// Final tally of one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub opponent: String,
    pub rounds: usize,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Side ahead on points when play stopped, `None` when level.
    pub leader: Option<Side>,
    /// Set only when the match ended on its `first_to` target.
    pub winner: Option<Side>,
    /// How often each policy supplied the selector's move.
    pub selections: BTreeMap<String, usize>,
}

impl MatchResult {
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            return 0.0;
        }
        f64::from(self.wins) / self.rounds as f64
    }

    pub fn most_selected(&self) -> Option<(&str, usize)> {
        self.selections
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, count)| (name.as_str(), *count))
    }
}

#[derive(Serialize)]
struct RoundRow<'a> {
    run_id: &'a str,
    opponent: &'a str,
    round: usize,
    own_move: Move,
    opponent_move: Move,
    outcome: Outcome,
    selected: &'a str,
    standings: Vec<StandingRow<'a>>,
}

#[derive(Serialize)]
struct StandingRow<'a> {
    policy: &'a str,
    net_wins: i64,
    score: f64,
    proposed: Move,
}

impl<'a> From<&'a PolicyStanding> for StandingRow<'a> {
    fn from(standing: &'a PolicyStanding) -> Self {
        Self {
            policy: &standing.name,
            net_wins: standing.net_wins,
            score: standing.score,
            proposed: standing.proposed,
        }
    }
}

impl ArenaRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let opponents = OpponentBlueprint::from_configs(&config.opponents)?;
        let roster = config.roster();
        // Surface an unusable roster before any file is touched.
        StrategySelector::from_specs(&roster, config.selector_config())?;

        Ok(Self {
            config,
            outputs,
            roster,
            opponents,
        })
    }

    pub fn opponents(&self) -> &[OpponentBlueprint] {
        &self.opponents
    }

    /// Play every match, streaming one JSONL row per round to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut results = Vec::with_capacity(self.opponents.len());
        let mut rows_written = 0usize;

        for blueprint in &self.opponents {
            let seed = rng.next_u64();
            let result = self.play_match(blueprint, seed, &mut writer)?;
            rows_written += result.rounds;

            event!(
                target: "rps_bench::arena",
                Level::INFO,
                run_id = %self.config.run_id,
                opponent = %result.opponent,
                rounds = result.rounds,
                wins = result.wins,
                losses = result.losses,
                ties = result.ties,
                win_rate = result.win_rate(),
                "match_complete"
            );
            results.push(result);
        }

        writer.flush()?;
        write_markdown(&self.outputs.summary_md, &self.config.run_id, &results)?;

        Ok(RunSummary {
            matches_played: results.len(),
            rounds_played: results.iter().map(|r| r.rounds).sum(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            results,
        })
    }

    fn play_match<W: Write>(
        &self,
        blueprint: &OpponentBlueprint,
        seed: u64,
        writer: &mut W,
    ) -> Result<MatchResult, RunnerError> {
        let mut selector = StrategySelector::from_specs(&self.roster, self.config.selector_config())?;
        let mut bot = blueprint.build(seed);
        let mut state = MatchState::new(self.config.matches.first_to);
        let mut selections: BTreeMap<String, usize> = BTreeMap::new();

        while state.rounds_played() < self.config.matches.rounds && !state.is_over() {
            let round = state.rounds_played();
            let report = selector.select(state.own_history(), state.opponent_history())?;
            let own_move = report.chosen;
            let opponent_move = bot
                .choose(state.opponent_history(), state.own_history())
                .map_err(|source| RunnerError::Opponent {
                    name: blueprint.name.clone(),
                    source,
                })?;
            let outcome = state.record(own_move, opponent_move)?;
            let selected = report.selected_standing();
            *selections.entry(selected.name.clone()).or_default() += 1;

            let row = RoundRow {
                run_id: &self.config.run_id,
                opponent: &blueprint.name,
                round,
                own_move,
                opponent_move,
                outcome,
                selected: &selected.name,
                standings: report.standings.iter().map(StandingRow::from).collect(),
            };
            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;

            event!(
                target: "rps_bench::arena",
                Level::DEBUG,
                opponent = %blueprint.name,
                round,
                own = %own_move,
                theirs = %opponent_move,
                outcome = %outcome,
                opponent_outcome = %outcome.flip(),
                selected = %selected.name,
                "round_played"
            );
        }

        Ok(MatchResult {
            opponent: blueprint.name.clone(),
            rounds: state.rounds_played(),
            wins: state.points(Side::Own),
            losses: state.points(Side::Opponent),
            ties: state.ties(),
            leader: state.leader(),
            winner: state.winner(),
            selections,
        })
    }
}

fn ensure_parent(parent: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = parent {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode round row: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Blueprint(#[from] OpponentError),
    #[error("opponent '{name}' failed to move: {source}")]
    Opponent {
        name: String,
        #[source]
        source: SelectorError,
    },
}
