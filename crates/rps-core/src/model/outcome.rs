use crate::model::moves::Move;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Result of a round from one side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub const fn of(mine: Move, theirs: Move) -> Outcome {
        if mine.beats(theirs) {
            Outcome::Win
        } else if theirs.beats(mine) {
            Outcome::Lose
        } else {
            Outcome::Tie
        }
    }

    /// Same round seen from the other side.
    pub const fn flip(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Win => "Win",
            Outcome::Lose => "Lose",
            Outcome::Tie => "Tie",
        };
        f.write_str(label)
    }
}

/// True iff `mine` defeats `theirs`. A missing move (no round played yet)
/// never wins and is never beaten.
pub fn beats(mine: Option<Move>, theirs: Option<Move>) -> bool {
    match (mine, theirs) {
        (Some(a), Some(b)) => a.beats(b),
        _ => false,
    }
}
