pub mod phase;
pub mod state;

pub use phase::{ClaimError, Phase, PhaseError, PhaseState, SelectionState, ALL_PHASES};
pub use state::Game;
