use crate::model::moves::Move;
use crate::model::outcome::Outcome;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Own,
    Opponent,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Side::Own => "Own",
            Side::Opponent => "Opponent",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("match already finished after {rounds} rounds")]
    AlreadyFinished { rounds: usize },
}

/// Move histories and points of a single match, seen from the `Own` side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    own: Vec<Move>,
    opponent: Vec<Move>,
    own_points: u32,
    opponent_points: u32,
    ties: u32,
    first_to: Option<u32>,
}

impl MatchState {
    /// `first_to` ends the match once either side reaches that many points;
    /// `None` (or zero) plays until the caller stops.
    pub fn new(first_to: Option<u32>) -> Self {
        Self {
            own: Vec::new(),
            opponent: Vec::new(),
            own_points: 0,
            opponent_points: 0,
            ties: 0,
            first_to: first_to.filter(|target| *target > 0),
        }
    }

    pub fn record(&mut self, own: Move, opponent: Move) -> Result<Outcome, MatchError> {
        if self.is_over() {
            return Err(MatchError::AlreadyFinished {
                rounds: self.rounds_played(),
            });
        }

        self.own.push(own);
        self.opponent.push(opponent);

        let outcome = Outcome::of(own, opponent);
        match outcome {
            Outcome::Win => self.own_points += 1,
            Outcome::Lose => self.opponent_points += 1,
            Outcome::Tie => self.ties += 1,
        }
        Ok(outcome)
    }

    pub fn own_history(&self) -> &[Move] {
        &self.own
    }

    pub fn opponent_history(&self) -> &[Move] {
        &self.opponent
    }

    pub fn rounds_played(&self) -> usize {
        self.own.len()
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Own => self.own_points,
            Side::Opponent => self.opponent_points,
        }
    }

    pub fn ties(&self) -> u32 {
        self.ties
    }

    pub fn first_to(&self) -> Option<u32> {
        self.first_to
    }

    pub fn winner(&self) -> Option<Side> {
        let target = self.first_to?;
        if self.own_points >= target {
            Some(Side::Own)
        } else if self.opponent_points >= target {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    /// Side with more points regardless of the target, `None` when level.
    pub fn leader(&self) -> Option<Side> {
        match self.own_points.cmp(&self.opponent_points) {
            core::cmp::Ordering::Greater => Some(Side::Own),
            core::cmp::Ordering::Less => Some(Side::Opponent),
            core::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchError, MatchState, Side};
    use crate::model::moves::Move;
    use crate::model::outcome::Outcome;

    #[test]
    fn record_tracks_points_and_histories() {
        let mut state = MatchState::new(None);
        assert_eq!(state.record(Move::Paper, Move::Rock), Ok(Outcome::Win));
        assert_eq!(state.record(Move::Rock, Move::Paper), Ok(Outcome::Lose));
        assert_eq!(state.record(Move::Rock, Move::Rock), Ok(Outcome::Tie));

        assert_eq!(state.rounds_played(), 3);
        assert_eq!(state.points(Side::Own), 1);
        assert_eq!(state.points(Side::Opponent), 1);
        assert_eq!(state.ties(), 1);
        assert_eq!(state.own_history(), &[Move::Paper, Move::Rock, Move::Rock]);
        assert_eq!(state.opponent_history(), &[Move::Rock, Move::Paper, Move::Rock]);
        assert_eq!(state.leader(), None);
    }

    #[test]
    fn first_to_target_finishes_match() {
        let mut state = MatchState::new(Some(3));
        for _ in 0..3 {
            state.record(Move::Scissors, Move::Paper).expect("match open");
        }
        assert!(state.is_over());
        assert_eq!(state.winner(), Some(Side::Own));
        assert_eq!(
            state.record(Move::Rock, Move::Rock),
            Err(MatchError::AlreadyFinished { rounds: 3 })
        );
    }

    #[test]
    fn zero_target_means_open_ended() {
        let mut state = MatchState::new(Some(0));
        for _ in 0..10 {
            state.record(Move::Rock, Move::Paper).expect("never finishes");
        }
        assert_eq!(state.first_to(), None);
        assert_eq!(state.winner(), None);
        assert_eq!(state.leader(), Some(Side::Opponent));
    }
}
