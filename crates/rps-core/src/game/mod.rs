pub mod match_state;

pub use match_state::{MatchError, MatchState, Side};
