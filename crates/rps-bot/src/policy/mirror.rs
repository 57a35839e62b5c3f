use super::{Policy, PolicyContext, PolicyKind, Tally};
use rps_core::model::{Move, beats};

/// Keeps throwing its target while it wins. After a lost or tied round it
/// switches to the move that would have beaten the opponent's last throw.
#[derive(Debug, Clone)]
pub struct MirrorSwitch {
    name: String,
    target: Move,
    tally: Tally,
}

impl MirrorSwitch {
    pub fn new(default: Move) -> Self {
        Self::named(PolicyKind::MirrorSwitch.label(), default)
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
    let Some(theirs) = ctx.opponent_last() else {
        return target;
    };
    if beats(ctx.own_last(), Some(theirs)) {
        target
    } else {
        theirs.counter()
    }
}

impl Policy for MirrorSwitch {
    fn kind(&self) -> PolicyKind {
        PolicyKind::MirrorSwitch
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
