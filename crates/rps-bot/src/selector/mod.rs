mod memory;

pub use memory::{OutcomeMemory, Snapshot};

use crate::policy::{Policy, PolicyContext, PolicyKind, PolicySpec};
use rps_core::model::{Move, beats};
use thiserror::Error;
use tracing::{Level, event};

pub const DEFAULT_MEMORY_HORIZON: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Rounds that influence a windowed score; `0` disables forgetting.
    pub memory_horizon: usize,
    /// Emit a per-round trace of every policy's standing.
    pub trace: bool,
}

impl SelectorConfig {
    pub const fn new(memory_horizon: usize) -> Self {
        Self {
            memory_horizon,
            trace: false,
        }
    }

    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_HORIZON)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("strategy selector needs at least one policy")]
    EmptyRoster,
    #[error("history length mismatch: own has {own} moves, opponent has {opponent}")]
    HistoryMismatch { own: usize, opponent: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyStanding {
    pub name: String,
    pub kind: PolicyKind,
    pub net_wins: i64,
    pub score: f64,
    pub proposed: Move,
}

/// What the selector saw and decided in one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub round: usize,
    pub selected: usize,
    pub chosen: Move,
    pub standings: Vec<PolicyStanding>,
}

impl RoundReport {
    pub fn selected_standing(&self) -> &PolicyStanding {
        &self.standings[self.selected]
    }
}

/// Picks, every round, the move of the policy with the best recent record.
pub struct StrategySelector {
    policies: Vec<Box<dyn Policy>>,
    memory: OutcomeMemory,
    config: SelectorConfig,
    last_report: Option<RoundReport>,
}

impl StrategySelector {
    pub fn new(
        policies: Vec<Box<dyn Policy>>,
        config: SelectorConfig,
    ) -> Result<Self, SelectorError> {
        if policies.is_empty() {
            return Err(SelectorError::EmptyRoster);
        }
        Ok(Self {
            policies,
            memory: OutcomeMemory::new(config.memory_horizon),
            config,
            last_report: None,
        })
    }

    pub fn from_specs(specs: &[PolicySpec], config: SelectorConfig) -> Result<Self, SelectorError> {
        Self::new(specs.iter().map(PolicySpec::build).collect(), config)
    }

    /// Standard roster with the default memory horizon.
    pub fn standard() -> Self {
        Self::standard_with(SelectorConfig::default())
    }

    /// Standard roster; cannot fail since the roster is never empty.
    pub fn standard_with(config: SelectorConfig) -> Self {
        Self {
            policies: PolicySpec::standard_roster()
                .iter()
                .map(PolicySpec::build)
                .collect(),
            memory: OutcomeMemory::new(config.memory_horizon),
            config,
            last_report: None,
        }
    }

    pub fn config(&self) -> SelectorConfig {
        self.config
    }

    pub fn policies(&self) -> &[Box<dyn Policy>] {
        &self.policies
    }

    pub fn memory(&self) -> &OutcomeMemory {
        &self.memory
    }

    pub fn last_report(&self) -> Option<&RoundReport> {
        self.last_report.as_ref()
    }

    /// Choose the move for the upcoming round. Called once per round with
    /// both complete histories; `own.len()` is the number of rounds played.
    pub fn select_move(&mut self, own: &[Move], opponent: &[Move]) -> Result<Move, SelectorError> {
        self.select(own, opponent).map(|report| report.chosen)
    }

    /// Same as [`StrategySelector::select_move`], returning the full report.
    pub fn select(&mut self, own: &[Move], opponent: &[Move]) -> Result<&RoundReport, SelectorError> {
        if own.len() != opponent.len() {
            return Err(SelectorError::HistoryMismatch {
                own: own.len(),
                opponent: opponent.len(),
            });
        }

        let rounds = own.len();
        if let Some(&theirs) = opponent.last() {
            let snapshot = self.score_previous_round(theirs, rounds);
            if let Some(expired) = self.memory.remember(snapshot) {
                self.forget(&expired, rounds);
            }
        }

        let ctx = PolicyContext::new(own, opponent);
        let proposals: Vec<Move> = self
            .policies
            .iter_mut()
            .map(|policy| policy.propose(&ctx))
            .collect();

        let scores: Vec<f64> = self
            .policies
            .iter()
            .map(|policy| self.score_of(policy.as_ref(), rounds))
            .collect();
        let selected = select_best(&scores);
        let chosen = proposals[selected];

        let report = RoundReport {
            round: rounds,
            selected,
            chosen,
            standings: self
                .policies
                .iter()
                .zip(scores)
                .zip(proposals)
                .map(|((policy, score), proposed)| PolicyStanding {
                    name: policy.name().to_string(),
                    kind: policy.kind(),
                    net_wins: policy.net_wins(),
                    score,
                    proposed,
                })
                .collect(),
        };
        if self.config.trace {
            trace_round(&report);
        }

        let report: &RoundReport = self.last_report.insert(report);
        Ok(report)
    }

    fn score_previous_round(&mut self, theirs: Move, rounds: usize) -> Snapshot {
        self.policies
            .iter_mut()
            .map(|policy| {
                let won = beats(policy.last_move(), Some(theirs));
                policy.apply_outcome(won, rounds);
                won
            })
            .collect()
    }

    fn forget(&mut self, expired: &Snapshot, rounds: usize) {
        for (policy, &won) in self.policies.iter_mut().zip(expired.wins()) {
            if policy.uses_memory() {
                policy.apply_outcome(!won, rounds);
            }
        }
    }

    fn score_of(&self, policy: &dyn Policy, rounds: usize) -> f64 {
        if policy.uses_memory() {
            policy.score(self.memory.scored_rounds(rounds))
        } else {
            policy.score(rounds)
        }
    }
}

/// Index of the strictly greatest score; ties keep the earliest entry.
pub fn select_best(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = index;
        }
    }
    best
}

fn trace_round(report: &RoundReport) {
    for standing in &report.standings {
        event!(
            target: "rps_bot::selector",
            Level::DEBUG,
            round = report.round,
            policy = %standing.name,
            net_wins = standing.net_wins,
            score = standing.score,
            proposed = %standing.proposed,
            "policy_standing"
        );
    }
    let selected = report.selected_standing();
    event!(
        target: "rps_bot::selector",
        Level::INFO,
        round = report.round,
        selected = %selected.name,
        score = selected.score,
        chosen = %report.chosen,
        "policy_selected"
    );
}
