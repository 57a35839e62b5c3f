use super::{Policy, PolicyContext, PolicyKind, Tally};
use rps_core::model::{Move, beats};

/// Plays against an opponent assumed to run a mirror-switch rule.
///
/// When the opponent failed to beat our last throw it is expected to switch
/// to the counter of that throw, so the target becomes the counter of the
/// counter of our own last move. Note the trigger and the mapping both key
/// off our move, not the opponent's.
#[derive(Debug, Clone)]
pub struct CounterSwitch {
    name: String,
    target: Move,
    tally: Tally,
}

impl CounterSwitch {
    pub fn new(default: Move) -> Self {
        Self::named(PolicyKind::CounterSwitch.label(), default)
    }

    pub fn named(name: impl Into<String>, default: Move) -> Self {
        Self {
            name: name.into(),
            target: default,
            tally: Tally::default(),
        }
    }

    pub fn target(&self) -> Move {
        self.target
    }
}

fn retarget(target: Move, ctx: &PolicyContext) -> Move {
    let Some(mine) = ctx.own_last() else {
        return target;
    };
    if beats(ctx.opponent_last(), Some(mine)) {
        target
    } else {
        mine.counter().counter()
    }
}

impl Policy for CounterSwitch {
    fn kind(&self) -> PolicyKind {
        PolicyKind::CounterSwitch
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn propose(&mut self, ctx: &PolicyContext) -> Move {
        self.target = retarget(self.target, ctx);
        self.tally = self.tally.produced(self.target);
        self.target
    }

    fn last_move(&self) -> Option<Move> {
        self.tally.last()
    }

    fn net_wins(&self) -> i64 {
        self.tally.net()
    }

    fn apply_outcome(&mut self, won: bool, _rounds: usize) {
        self.tally = self.tally.applied(won);
    }
}

#[cfg(test)]
mod tests {
    use super::CounterSwitch;
    use crate::policy::{MirrorSwitch, Policy, PolicyContext};
    use rps_core::model::Move;

    #[test]
    fn round_zero_returns_default() {
        let mut policy = CounterSwitch::new(Move::Scissors);
        assert_eq!(policy.propose(&PolicyContext::new(&[], &[])), Move::Scissors);
    }

    #[test]
    fn anticipates_switch_after_opponent_fails() {
        // We threw Scissors and won; a mirror opponent moves to Rock next,
        // so we answer with Paper.
        let mut policy = CounterSwitch::new(Move::Rock);
        let mv = policy.propose(&PolicyContext::new(&[Move::Scissors], &[Move::Paper]));
        assert_eq!(mv, Move::Paper);

        let mut policy = CounterSwitch::new(Move::Rock);
        assert_eq!(
            policy.propose(&PolicyContext::new(&[Move::Rock], &[Move::Rock])),
            Move::Scissors
        );

        let mut policy = CounterSwitch::new(Move::Paper);
        assert_eq!(
            policy.propose(&PolicyContext::new(&[Move::Paper], &[Move::Rock])),
            Move::Rock
        );
    }

    #[test]
    fn keeps_target_when_opponent_won() {
        let mut policy = CounterSwitch::new(Move::Scissors);
        let mv = policy.propose(&PolicyContext::new(&[Move::Scissors], &[Move::Rock]));
        assert_eq!(mv, Move::Scissors);
    }

    #[test]
    fn stays_ahead_of_a_mirror_switch_opponent_once_ahead() {
        let mut hero = CounterSwitch::new(Move::Scissors);
        let mut villain = MirrorSwitch::new(Move::Paper);
        let mut hero_history = Vec::new();
        let mut villain_history = Vec::new();
        let mut hero_wins = 0;

        for _ in 0..30 {
            let a = hero.propose(&PolicyContext::new(&hero_history, &villain_history));
            let b = villain.propose(&PolicyContext::new(&villain_history, &hero_history));
            if a.beats(b) {
                hero_wins += 1;
            }
            hero_history.push(a);
            villain_history.push(b);
        }

        assert_eq!(hero_wins, 30);
    }
}
