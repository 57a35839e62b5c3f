use core::fmt;
use core::str::FromStr;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Move {
    Rock = 0,
    Paper = 1,
    Scissors = 2,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Move::Rock),
            1 => Some(Move::Paper),
            2 => Some(Move::Scissors),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The move that defeats `self`.
    pub const fn counter(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    pub const fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Paper, Move::Rock) | (Move::Rock, Move::Scissors) | (Move::Scissors, Move::Paper)
        )
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Move {
        Move::ALL[rng.gen_range(0..Move::ALL.len())]
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown move '{0}' (expected rock, paper or scissors)")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Move::Rock),
            "paper" | "p" => Ok(Move::Paper),
            "scissors" | "s" => Ok(Move::Scissors),
            _ => Err(ParseMoveError(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn counter_beats_its_target() {
        for mv in Move::ALL {
            assert!(mv.counter().beats(mv));
            assert!(!mv.beats(mv.counter()));
            assert_eq!(mv.counter().counter().counter(), mv);
        }
    }

    #[test]
    fn index_roundtrip() {
        for (i, mv) in Move::ALL.iter().enumerate() {
            assert_eq!(Move::from_index(i), Some(*mv));
            assert_eq!(mv.index(), i);
        }
        assert_eq!(Move::from_index(3), None);
    }

    #[test]
    fn parses_case_insensitive_names() {
        assert_eq!("Rock".parse::<Move>(), Ok(Move::Rock));
        assert_eq!(" PAPER ".parse::<Move>(), Ok(Move::Paper));
        assert_eq!("s".parse::<Move>(), Ok(Move::Scissors));
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn random_is_reproducible_for_a_seed() {
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        let left: Vec<Move> = (0..32).map(|_| Move::random(&mut a)).collect();
        let right: Vec<Move> = (0..32).map(|_| Move::random(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Move::Scissors).expect("serialize");
        assert_eq!(json, "\"scissors\"");
    }
}
