pub mod moves;
pub mod outcome;

pub use moves::{Move, ParseMoveError};
pub use outcome::{Outcome, beats};
