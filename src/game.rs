// Live Oware game: the only owner of the board, stores, turn and history
//
// Callers drive turns explicitly: `make_move` never switches the player,
// and `undo` restores the snapshot exactly (including whose turn it was)
// without switching. One `undo` reverses one half-turn completely.

use log::{info, warn};
use rand::Rng;

use crate::error::MoveError;
use crate::rules;
use crate::types::{GameResult, GameStateView, MoveRecord, Player, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    player: Player,
    history: Vec<MoveRecord>,
}

impl Game {
    /// Creates a game in the opening position with `player` to move
    pub fn new(player: Player) -> Self {
        Game {
            position: Position::initial(),
            player,
            history: Vec::new(),
        }
    }

    /// Creates a game from an arbitrary position with empty history
    pub fn from_position(position: Position, player: Player) -> Self {
        Game {
            position,
            player,
            history: Vec::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Resets to the opening position and picks the first player uniformly at random
    pub fn start(&mut self) {
        let mut rng = rand::rng();
        self.start_with_rng(&mut rng);
    }

    /// `start` with a caller-supplied random source
    pub fn start_with_rng<R: Rng>(&mut self, rng: &mut R) {
        let player = if rng.random_bool(0.5) {
            Player::Top
        } else {
            Player::Bottom
        };
        self.start_with(player);
    }

    /// Resets to the opening position with a fixed first player
    pub fn start_with(&mut self, player: Player) {
        self.position = Position::initial();
        self.player = player;
        self.history.clear();
        info!("New game started, player '{}' goes first", player);
    }

    /// Hands the turn to the other player
    pub fn switch(&mut self) {
        self.player = self.player.opponent();
    }

    /// Plays `house` (1-6) for the player to move
    ///
    /// On success the pre-move snapshot is pushed onto the history. On error
    /// nothing changes. The turn is not switched.
    pub fn make_move(&mut self, house: u8) -> Result<(), MoveError> {
        let next = match rules::simulate_move(house, &self.position, self.player) {
            Ok(next) => next,
            Err(e) => {
                warn!("Player '{}' move {} rejected: {}", self.player, house, e);
                return Err(e);
            }
        };

        self.history.push(MoveRecord {
            position: self.position,
            player: self.player,
        });
        self.position = next;

        info!(
            "Player '{}' sowed house {} (top: {}, bottom: {})",
            self.player, house, self.position.top, self.position.bottom
        );
        Ok(())
    }

    /// Restores the state from before the most recent move
    ///
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(record) => {
                self.position = record.position;
                self.player = record.player;
                info!("Undid last move, player '{}' to move", self.player);
                true
            }
            None => false,
        }
    }

    /// Houses the player to move can sow from
    pub fn get_possible_moves(&self) -> Vec<u8> {
        rules::get_possible_moves(&self.position.board, self.player)
    }

    /// Pure outcome query for the current state
    pub fn evaluate_termination(&self) -> GameResult {
        rules::evaluate_termination(&self.position, self.player)
    }

    /// Applies the end-of-game sweep when the game is over
    ///
    /// Ongoing games are left as they are. Returns the outcome.
    pub fn finalize_starved_side(&mut self) -> GameResult {
        let (position, result) = rules::finalize_position(&self.position, self.player);
        if position != self.position {
            info!(
                "Remaining beads swept into stores (top: {}, bottom: {})",
                position.top, position.bottom
            );
            self.position = position;
        }
        result
    }

    /// Outcome of the game, sweeping remaining beads into the stores when it is over
    ///
    /// This mutates the game on starvation or stalemate; use
    /// `evaluate_termination` for a read-only check.
    pub fn get_winner(&mut self) -> GameResult {
        let result = self.evaluate_termination();
        if result.is_decided() {
            self.finalize_starved_side();
            info!("Game over: {:?}", result);
        }
        result
    }

    /// Serializable snapshot for the HTTP API, using the pure termination query
    pub fn view(&self) -> GameStateView {
        GameStateView {
            board: self.position.board.to_vec(),
            top: self.position.top,
            bottom: self.position.bottom,
            player: self.player,
            history_length: self.history.len(),
            winner: self.evaluate_termination().as_api_str().map(String::from),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Player::Bottom)
    }
}
