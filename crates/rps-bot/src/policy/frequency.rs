use super::{Policy, PolicyContext, PolicyKind, Tally};
use core::cmp::{Ordering, Reverse};
use rps_core::model::Move;

pub const DEFAULT_ACTIVATION: usize = 100;
/// Below any attainable win rate, so a dormant exploiter is never picked.
pub const INACTIVE_SCORE: f64 = -1.0e9;
/// Score reported on the round the exploiter becomes eligible.
pub const NEUTRAL_SCORE: f64 = 0.0;

/// Answers the opponent's most frequent move once enough rounds were seen.
///
/// Its statistic is cumulative from the activation point, so it opts out of
/// the selector's sliding window.
#[derive(Debug, Clone)]
pub struct FrequencyExploiter {
    name: String,
    default: Move,
    activation: usize,
    tally: Tally,
}

impl FrequencyExploiter {
    pub fn new(default: Move, activation: usize) -> Self {
        Self::named(PolicyKind::FrequencyExploiter.label(), default, activation)
    }

    pub fn named(name: impl Into<String>, default: Move, activation: usize) -> Self {
        Self {
            name: name.into(),
            default,
            activation,
            tally: Tally::default(),
        }
    }

    pub fn activation(&self) -> usize {
        self.activation
    }

    pub fn is_active(&self, rounds: usize) -> bool {
        rounds > self.activation
    }

    fn next_move(&self, ctx: &PolicyContext) -> Move {
        if !self.is_active(ctx.opponent.len()) {
            return self.default;
        }
        most_frequent(ctx.opponent)
            .map(Move::counter)
            .unwrap_or(self.default)
    }
}

/// Most common move; equal counts go to the move that appeared first.
pub fn most_frequent(history: &[Move]) -> Option<Move> {
    let mut counts = [0usize; 3];
    let mut first_seen = [usize::MAX; 3];
    for (round, mv) in history.iter().enumerate() {
        let slot = mv.index();
        counts[slot] += 1;
        if first_seen[slot] == usize::MAX {
            first_seen[slot] = round;
        }
    }

    Move::ALL
        .iter()
        .copied()
        .filter(|mv| counts[mv.index()] > 0)
        .min_by_key(|mv| (Reverse(counts[mv.index()]), first_seen[mv.index()]))
}

impl Policy for FrequencyExploiter {
    fn kind(&self) -> PolicyKind {
        PolicyKind::FrequencyExploiter
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, ctx: &PolicyContext) -> Move {
        let mv = self.next_move(ctx);
        self.tally = self.tally.produced(mv);
        mv
    }

    fn last_move(&self) -> Option<Move> {
        self.tally.last()
    }

    fn net_wins(&self) -> i64 {
        self.tally.net()
    }

    fn score(&self, rounds: usize) -> f64 {
        match rounds.cmp(&self.activation) {
            Ordering::Less => INACTIVE_SCORE,
            Ordering::Equal => NEUTRAL_SCORE,
            Ordering::Greater => self.tally.net() as f64 / (rounds - self.activation) as f64,
        }
    }

    fn apply_outcome(&mut self, won: bool, rounds: usize) {
        if rounds <= self.activation {
            return;
        }
        self.tally = self.tally.applied(won);
    }

    fn uses_memory(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opponent_rounds(pattern: &[Move], len: usize) -> Vec<Move> {
        pattern.iter().copied().cycle().take(len).collect()
    }

    #[test]
    fn dormant_before_activation() {
        let mut policy = FrequencyExploiter::new(Move::Paper, 5);
        let opponent = opponent_rounds(&[Move::Scissors], 4);
        let own = opponent_rounds(&[Move::Rock], 4);
        assert_eq!(
            policy.propose(&PolicyContext::new(&own, &opponent)),
            Move::Paper
        );
        for rounds in 0..5 {
            assert_eq!(policy.score(rounds), INACTIVE_SCORE);
            assert!(policy.score(rounds) < -1.0);
        }
    }

    #[test]
    fn returns_default_exactly_at_activation() {
        let mut policy = FrequencyExploiter::new(Move::Paper, 5);
        let opponent = opponent_rounds(&[Move::Scissors], 5);
        let own = opponent_rounds(&[Move::Rock], 5);
        assert_eq!(
            policy.propose(&PolicyContext::new(&own, &opponent)),
            Move::Paper
        );
        assert_eq!(policy.score(5), NEUTRAL_SCORE);
    }

    #[test]
    fn counters_most_frequent_move_once_active() {
        let mut policy = FrequencyExploiter::new(Move::Paper, 5);
        let opponent = vec![
            Move::Rock,
            Move::Scissors,
            Move::Scissors,
            Move::Paper,
            Move::Scissors,
            Move::Rock,
        ];
        let own = opponent_rounds(&[Move::Rock], opponent.len());
        assert_eq!(
            policy.propose(&PolicyContext::new(&own, &opponent)),
            Move::Rock
        );
    }

    #[test]
    fn frequency_ties_go_to_first_seen_move() {
        let history = [Move::Scissors, Move::Rock, Move::Rock, Move::Scissors];
        assert_eq!(most_frequent(&history), Some(Move::Scissors));
        assert_eq!(most_frequent(&[]), None);
    }

    #[test]
    fn outcomes_before_activation_are_ignored() {
        let mut policy = FrequencyExploiter::new(Move::Paper, 3);
        for rounds in 1..=3 {
            policy.apply_outcome(false, rounds);
        }
        assert_eq!(policy.net_wins(), 0);

        policy.apply_outcome(true, 4);
        policy.apply_outcome(true, 5);
        policy.apply_outcome(false, 6);
        assert_eq!(policy.net_wins(), 1);
        assert!((policy.score(6) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn opts_out_of_memory() {
        assert!(!FrequencyExploiter::new(Move::Rock, 10).uses_memory());
    }
}
