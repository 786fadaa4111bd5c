// Error types for move validation and AI play

use thiserror::Error;

/// Reasons a move can be rejected
///
/// Every variant is recoverable: the game state is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// House number outside 1-6
    #[error("Invalid move: house {house} is out of range, choose a house between 1 and 6")]
    InvalidHouseRange { house: u8 },

    /// Sowing from a house holding no beads
    #[error("Invalid move: house {house} is empty")]
    EmptySource { house: u8 },

    /// Opponent is starved and the chosen house does not feed them
    #[error("Invalid move: opponent's row is empty and house {house} does not feed it (feeding moves: {feeding:?})")]
    FeedingRuleViolation { house: u8, feeding: Vec<u8> },

    /// No move is available to play
    #[error("No legal move available")]
    NoLegalMove,
}
