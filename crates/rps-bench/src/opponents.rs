use rand::SeedableRng;
use rand::rngs::StdRng;
use rps_bot::policy::{CounterSwitch, MirrorSwitch, Policy, PolicyContext};
use rps_bot::selector::{DEFAULT_MEMORY_HORIZON, SelectorConfig, SelectorError, StrategySelector};
use rps_core::model::Move;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{OpponentConfig, OpponentKind};

/// Validated recipe for a practice opponent; a fresh bot is built per match.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentBlueprint {
    pub name: String,
    pub kind: OpponentKind,
    plan: Plan,
}

#[derive(Debug, Clone, PartialEq)]
enum Plan {
    Constant(Move),
    Cycle(Vec<Move>),
    Random,
    MirrorSwitch(Move),
    CounterSwitch(Move),
    Selector(usize),
}

#[derive(Debug, Deserialize)]
struct ConstantParams {
    #[serde(rename = "move")]
    mv: Move,
}

#[derive(Debug, Deserialize)]
struct CycleParams {
    sequence: Vec<Move>,
}

#[derive(Debug, Deserialize)]
struct SwitchParams {
    #[serde(default = "default_switch_move")]
    default: Move,
}

#[derive(Debug, Deserialize)]
struct SelectorParams {
    #[serde(default = "default_memory_horizon")]
    memory_horizon: usize,
}

fn default_switch_move() -> Move {
    Move::Rock
}

fn default_memory_horizon() -> usize {
    DEFAULT_MEMORY_HORIZON
}

impl OpponentBlueprint {
    pub fn from_configs(configs: &[OpponentConfig]) -> Result<Vec<Self>, OpponentError> {
        configs.iter().map(Self::from_config).collect()
    }

    pub fn from_config(config: &OpponentConfig) -> Result<Self, OpponentError> {
        let params = match &config.params {
            serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
            other => other.clone(),
        };
        let invalid = |source: serde_yaml::Error| OpponentError::InvalidParams {
            name: config.name.clone(),
            source,
        };
        let plan = match config.kind {
            OpponentKind::Constant => {
                let params: ConstantParams = serde_yaml::from_value(params).map_err(invalid)?;
                Plan::Constant(params.mv)
            }
            OpponentKind::Cycle => {
                let params: CycleParams = serde_yaml::from_value(params).map_err(invalid)?;
                if params.sequence.is_empty() {
                    return Err(OpponentError::EmptySequence {
                        name: config.name.clone(),
                    });
                }
                Plan::Cycle(params.sequence)
            }
            OpponentKind::Random => Plan::Random,
            OpponentKind::MirrorSwitch => {
                let params: SwitchParams = serde_yaml::from_value(params).map_err(invalid)?;
                Plan::MirrorSwitch(params.default)
            }
            OpponentKind::CounterSwitch => {
                let params: SwitchParams = serde_yaml::from_value(params).map_err(invalid)?;
                Plan::CounterSwitch(params.default)
            }
            OpponentKind::Selector => {
                let params: SelectorParams = serde_yaml::from_value(params).map_err(invalid)?;
                Plan::Selector(params.memory_horizon)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            plan,
        })
    }

    /// `seed` only matters for the random opponent.
    pub fn build(&self, seed: u64) -> PracticeBot {
        let bot = match &self.plan {
            Plan::Constant(mv) => return PracticeBot::constant(*mv),
            Plan::Cycle(sequence) => Bot::Cycle(sequence.clone()),
            Plan::Random => Bot::Random(StdRng::seed_from_u64(seed)),
            Plan::MirrorSwitch(default) => Bot::Policy(Box::new(MirrorSwitch::new(*default))),
            Plan::CounterSwitch(default) => Bot::Policy(Box::new(CounterSwitch::new(*default))),
            Plan::Selector(horizon) => Bot::Selector(Box::new(StrategySelector::standard_with(
                SelectorConfig::new(*horizon),
            ))),
        };
        PracticeBot(bot)
    }
}

/// The far side of a match. Histories are passed from the bot's own
/// perspective: `own` is what it played, `theirs` what the selector played.
pub struct PracticeBot(Bot);

/// A cycle's sequence is never empty.
enum Bot {
    Constant(Move),
    Cycle(Vec<Move>),
    Random(StdRng),
    Policy(Box<dyn Policy>),
    Selector(Box<StrategySelector>),
}

impl PracticeBot {
    pub fn constant(mv: Move) -> Self {
        PracticeBot(Bot::Constant(mv))
    }

    /// Repeats `sequence` forever; `None` when there is nothing to repeat.
    pub fn cycle(sequence: Vec<Move>) -> Option<Self> {
        if sequence.is_empty() {
            None
        } else {
            Some(PracticeBot(Bot::Cycle(sequence)))
        }
    }

    pub fn choose(&mut self, own: &[Move], theirs: &[Move]) -> Result<Move, SelectorError> {
        match &mut self.0 {
            Bot::Constant(mv) => Ok(*mv),
            Bot::Cycle(sequence) => Ok(sequence[own.len() % sequence.len()]),
            Bot::Random(rng) => Ok(Move::random(rng)),
            Bot::Policy(policy) => Ok(policy.propose(&PolicyContext::new(own, theirs))),
            Bot::Selector(selector) => selector.select_move(own, theirs),
        }
    }
}

#[derive(Debug, Error)]
pub enum OpponentError {
    #[error("opponent '{name}' has invalid params: {source}")]
    InvalidParams {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("opponent '{name}' needs a non-empty move sequence")]
    EmptySequence { name: String },
}
