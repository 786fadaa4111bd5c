// Oware board and game types
// See the rules module for how these values evolve

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of houses on the board
pub const HOUSE_COUNT: usize = 12;

/// Houses owned by each player
pub const HOUSES_PER_SIDE: usize = 6;

/// Beads placed in every house by `start()`
pub const SEEDS_PER_HOUSE: u32 = 4;

/// Total beads in play for a standard start
pub const TOTAL_SEEDS: u32 = SEEDS_PER_HOUSE * HOUSE_COUNT as u32;

/// A score strictly above this wins outright
pub const WIN_THRESHOLD: u32 = TOTAL_SEEDS / 2;

/// Bead counts, index 0-5 bottom houses 1-6, index 6-11 top houses 1-6
pub type Houses = [u32; HOUSE_COUNT];

/// The two sides of the board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    #[serde(rename = "T")]
    Top,
    #[serde(rename = "B")]
    Bottom,
}

impl Player {
    /// Returns both players, bottom first to match board index order
    pub fn all() -> [Player; 2] {
        [Player::Bottom, Player::Top]
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::Top => Player::Bottom,
            Player::Bottom => Player::Top,
        }
    }

    /// Short tag used by the HTTP API and the move log
    pub fn as_str(&self) -> &'static str {
        match self {
            Player::Top => "T",
            Player::Bottom => "B",
        }
    }

    /// Board index of this player's house 1
    pub fn first_index(self) -> usize {
        match self {
            Player::Top => HOUSES_PER_SIDE,
            Player::Bottom => 0,
        }
    }

    /// Board indices owned by this player, in house order
    pub fn indices(self) -> std::ops::Range<usize> {
        let first = self.first_index();
        first..first + HOUSES_PER_SIDE
    }

    /// Whether a board index lies on this player's row
    pub fn owns(self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Board contents plus both score stores
///
/// This is the unit the search copies around; it carries no turn information.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Houses,
    pub top: u32,
    pub bottom: u32,
}

impl Position {
    /// Standard opening position: four beads in every house, empty stores
    pub fn initial() -> Self {
        Position {
            board: [SEEDS_PER_HOUSE; HOUSE_COUNT],
            top: 0,
            bottom: 0,
        }
    }

    pub fn new(board: Houses, top: u32, bottom: u32) -> Self {
        Position { board, top, bottom }
    }

    pub fn score(&self, player: Player) -> u32 {
        match player {
            Player::Top => self.top,
            Player::Bottom => self.bottom,
        }
    }

    pub fn score_mut(&mut self, player: Player) -> &mut u32 {
        match player {
            Player::Top => &mut self.top,
            Player::Bottom => &mut self.bottom,
        }
    }

    /// Beads currently on `player`'s row
    pub fn row_total(&self, player: Player) -> u32 {
        player.indices().map(|i| self.board[i]).sum()
    }

    pub fn row_is_empty(&self, player: Player) -> bool {
        player.indices().all(|i| self.board[i] == 0)
    }

    /// Beads on the board plus both stores; constant across legal play
    pub fn total_beads(&self) -> u32 {
        self.checked_total_beads().unwrap_or(u32::MAX)
    }

    /// Bead total, `None` when it does not fit in a `u32`
    pub fn checked_total_beads(&self) -> Option<u32> {
        self.board
            .iter()
            .chain([&self.top, &self.bottom])
            .try_fold(0u32, |total, &beads| total.checked_add(beads))
    }

    /// Holds no more beads than a game starts with
    pub fn is_well_formed(&self) -> bool {
        matches!(self.checked_total_beads(), Some(total) if total <= TOTAL_SEEDS)
    }

    /// Outcome when comparing stores only
    pub fn compare_scores(&self) -> GameResult {
        if self.top > self.bottom {
            GameResult::TopWins
        } else if self.bottom > self.top {
            GameResult::BottomWins
        } else {
            GameResult::Tie
        }
    }
}

/// Derived outcome of a position; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Ongoing,
    TopWins,
    BottomWins,
    Tie,
}

impl GameResult {
    pub fn is_decided(&self) -> bool {
        *self != GameResult::Ongoing
    }

    /// Winner tag used at the HTTP boundary: `None`, `"T"`, `"B"` or `"Tie"`
    pub fn as_api_str(&self) -> Option<&'static str> {
        match self {
            GameResult::Ongoing => None,
            GameResult::TopWins => Some("T"),
            GameResult::BottomWins => Some("B"),
            GameResult::Tie => Some("Tie"),
        }
    }
}

/// Snapshot taken immediately before a move is applied
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub position: Position,
    pub player: Player,
}

/// Full game state as returned by `GET /get_game_state`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameStateView {
    pub board: Vec<u32>,
    pub top: u32,
    pub bottom: u32,
    pub player: Player,
    pub history_length: usize,
    pub winner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_rows() {
        assert_eq!(Player::Bottom.indices(), 0..6);
        assert_eq!(Player::Top.indices(), 6..12);
        assert!(Player::Top.owns(11));
        assert!(!Player::Top.owns(5));
        assert_eq!(Player::Top.opponent(), Player::Bottom);
    }

    #[test]
    fn test_player_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Player::Top).unwrap(), "\"T\"");
        let parsed: Player = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(parsed, Player::Bottom);
    }

    #[test]
    fn test_initial_position_holds_all_beads() {
        let position = Position::initial();
        assert_eq!(position.total_beads(), TOTAL_SEEDS);
        assert_eq!(position.row_total(Player::Top), 24);
        assert_eq!(position.compare_scores(), GameResult::Tie);
    }

    #[test]
    fn test_oversized_positions_are_not_well_formed() {
        assert!(Position::initial().is_well_formed());

        let mut board = [0; HOUSE_COUNT];
        board[1] = u32::MAX;
        let overflowing = Position::new(board, 0, 1);
        assert_eq!(overflowing.checked_total_beads(), None);
        assert!(!overflowing.is_well_formed());

        let too_many = Position::new([4; HOUSE_COUNT], 1, 0);
        assert_eq!(too_many.total_beads(), TOTAL_SEEDS + 1);
        assert!(!too_many.is_well_formed());
    }

    #[test]
    fn test_result_api_tags() {
        assert_eq!(GameResult::Ongoing.as_api_str(), None);
        assert_eq!(GameResult::TopWins.as_api_str(), Some("T"));
        assert_eq!(GameResult::BottomWins.as_api_str(), Some("B"));
        assert_eq!(GameResult::Tie.as_api_str(), Some("Tie"));
    }
}
