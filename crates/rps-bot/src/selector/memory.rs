use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Per-policy win flags for one elapsed round, in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    wins: Vec<bool>,
}

impl Snapshot {
    pub fn wins(&self) -> &[bool] {
        &self.wins
    }

    pub fn len(&self) -> usize {
        self.wins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }
}

impl FromIterator<bool> for Snapshot {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            wins: iter.into_iter().collect(),
        }
    }
}

/// Bounded queue of round snapshots. A horizon of zero keeps nothing and
/// never forgets.
#[derive(Debug, Clone)]
pub struct OutcomeMemory {
    horizon: Option<NonZeroUsize>,
    snapshots: VecDeque<Snapshot>,
}

impl OutcomeMemory {
    pub fn new(horizon: usize) -> Self {
        let horizon = NonZeroUsize::new(horizon);
        let capacity = horizon.map_or(0, |h| h.get() + 1);
        Self {
            horizon,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    pub fn horizon(&self) -> Option<usize> {
        self.horizon.map(NonZeroUsize::get)
    }

    /// Store a snapshot and hand back the one that fell out of the window.
    pub fn remember(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        let horizon = self.horizon?;
        self.snapshots.push_back(snapshot);
        if self.snapshots.len() > horizon.get() {
            self.snapshots.pop_front()
        } else {
            None
        }
    }

    /// Rounds that still contribute to a windowed score.
    pub fn scored_rounds(&self, rounds: usize) -> usize {
        match self.horizon {
            Some(horizon) => rounds.min(horizon.get()),
            None => rounds,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{OutcomeMemory, Snapshot};

    fn snap(flags: &[bool]) -> Snapshot {
        flags.iter().copied().collect()
    }

    #[test]
    fn evicts_oldest_past_horizon() {
        let mut memory = OutcomeMemory::new(2);
        assert_eq!(memory.remember(snap(&[true])), None);
        assert_eq!(memory.remember(snap(&[false])), None);
        assert_eq!(memory.remember(snap(&[true, true])), Some(snap(&[true])));
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.remember(snap(&[])), Some(snap(&[false])));
    }

    #[test]
    fn zero_horizon_never_forgets() {
        let mut memory = OutcomeMemory::new(0);
        for _ in 0..50 {
            assert_eq!(memory.remember(snap(&[true])), None);
        }
        assert!(memory.is_empty());
        assert_eq!(memory.horizon(), None);
        assert_eq!(memory.scored_rounds(50), 50);
    }

    #[test]
    fn scored_rounds_clamp_to_window() {
        let memory = OutcomeMemory::new(20);
        assert_eq!(memory.scored_rounds(0), 0);
        assert_eq!(memory.scored_rounds(7), 7);
        assert_eq!(memory.scored_rounds(45), 20);
    }
}
