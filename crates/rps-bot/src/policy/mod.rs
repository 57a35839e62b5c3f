mod counter;
mod frequency;
mod mirror;

pub use counter::CounterSwitch;
pub use frequency::{DEFAULT_ACTIVATION, FrequencyExploiter, INACTIVE_SCORE, NEUTRAL_SCORE};
pub use mirror::MirrorSwitch;

use core::fmt;
use rps_core::model::Move;

/// Both move histories as seen by the player this selector plays for.
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext<'a> {
    pub own: &'a [Move],
    pub opponent: &'a [Move],
}

impl<'a> PolicyContext<'a> {
    pub fn new(own: &'a [Move], opponent: &'a [Move]) -> Self {
        Self { own, opponent }
    }

    /// Rounds already completed.
    pub fn round(&self) -> usize {
        self.own.len()
    }

    pub fn own_last(&self) -> Option<Move> {
        self.own.last().copied()
    }

    pub fn opponent_last(&self) -> Option<Move> {
        self.opponent.last().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    MirrorSwitch,
    CounterSwitch,
    FrequencyExploiter,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 3] = [
        PolicyKind::MirrorSwitch,
        PolicyKind::CounterSwitch,
        PolicyKind::FrequencyExploiter,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PolicyKind::MirrorSwitch => "mirror_switch",
            PolicyKind::CounterSwitch => "counter_switch",
            PolicyKind::FrequencyExploiter => "frequency_exploiter",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Candidate decision rule managed by the strategy selector.
///
/// Every policy is advanced every round, selected or not, so its target
/// tracks the match continuously. The selector owns the scoring calls.
pub trait Policy: Send {
    fn kind(&self) -> PolicyKind;

    /// Stable identifier used in reports and traces.
    fn name(&self) -> &str;

    /// Compute the move for the upcoming round and remember it as the last
    /// produced move. Empty histories yield the configured default.
    fn propose(&mut self, ctx: &PolicyContext) -> Move;

    fn last_move(&self) -> Option<Move>;

    /// Wins minus losses currently on the books.
    fn net_wins(&self) -> i64;

    /// Fitness used for ranking; `rounds` is the number of rounds the
    /// current net count was accumulated over.
    fn score(&self, rounds: usize) -> f64 {
        win_rate(self.net_wins(), rounds)
    }

    fn apply_outcome(&mut self, won: bool, rounds: usize);

    /// Whether old rounds are forgotten once the memory horizon is exceeded.
    fn uses_memory(&self) -> bool {
        true
    }
}

/// `net / rounds`, with every policy fully eligible before any evidence.
pub fn win_rate(net: i64, rounds: usize) -> f64 {
    if rounds == 0 {
        return 1.0;
    }
    net as f64 / rounds as f64
}

/// Net score and last produced move shared by all policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    net: i64,
    last: Option<Move>,
}

impl Tally {
    pub const fn net(self) -> i64 {
        self.net
    }

    pub const fn last(self) -> Option<Move> {
        self.last
    }

    pub const fn applied(self, won: bool) -> Tally {
        Tally {
            net: if won { self.net + 1 } else { self.net - 1 },
            last: self.last,
        }
    }

    pub const fn produced(self, mv: Move) -> Tally {
        Tally {
            net: self.net,
            last: Some(mv),
        }
    }
}

/// Construction recipe for one roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySpec {
    pub kind: PolicyKind,
    pub default: Move,
    /// Opponent rounds observed before the frequency exploiter engages.
    pub activation: usize,
    pub name: Option<String>,
}

impl PolicySpec {
    pub fn new(kind: PolicyKind, default: Move) -> Self {
        Self {
            kind,
            default,
            activation: DEFAULT_ACTIVATION,
            name: None,
        }
    }

    pub fn mirror(default: Move) -> Self {
        Self::new(PolicyKind::MirrorSwitch, default)
    }

    pub fn counter(default: Move) -> Self {
        Self::new(PolicyKind::CounterSwitch, default)
    }

    pub fn frequency(default: Move, activation: usize) -> Self {
        Self {
            activation,
            ..Self::new(PolicyKind::FrequencyExploiter, default)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Roster used when nothing else is configured.
    pub fn standard_roster() -> Vec<PolicySpec> {
        vec![
            PolicySpec::mirror(Move::Paper),
            PolicySpec::counter(Move::Paper),
            PolicySpec::frequency(Move::Paper, DEFAULT_ACTIVATION),
        ]
    }

    pub fn resolved_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}:{}",
                self.kind.label(),
                self.default.to_string().to_ascii_lowercase()
            ),
        }
    }

    pub fn build(&self) -> Box<dyn Policy> {
        let name = self.resolved_name();
        match self.kind {
            PolicyKind::MirrorSwitch => Box::new(MirrorSwitch::named(name, self.default)),
            PolicyKind::CounterSwitch => Box::new(CounterSwitch::named(name, self.default)),
            PolicyKind::FrequencyExploiter => Box::new(FrequencyExploiter::named(
                name,
                self.default,
                self.activation,
            )),
        }
    }
}
