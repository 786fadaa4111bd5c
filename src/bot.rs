// Game service: one live Oware game behind a lock
//
// Each public method corresponds to one HTTP endpoint. The Bot owns the
// game; handlers only borrow the Bot from Rocket's managed state.

use log::{info, warn};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::time::Instant;
use thiserror::Error;

use crate::config::Config;
use crate::debug_logger::{DebugLogger, MoveLogEntry, MoveSource};
use crate::error::MoveError;
use crate::game::Game;
use crate::search::{self, SearchResult};
use crate::simple_profiler;
use crate::types::{GameResult, GameStateView, Player};

/// Reasons an AI move request can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiMoveError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("Game is already over")]
    GameOver,

    #[error("Search depth must be at least 1")]
    ZeroDepth,

    /// The game changed while the search ran on a snapshot
    #[error("Game state changed during search, move discarded")]
    StalePosition,

    #[error("Search task failed: {0}")]
    Join(String),
}

/// Oware game service
/// Takes static configuration and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    game: Mutex<Game>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a Bot with a fresh game and no move log
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Self::with_logger(config, DebugLogger::disabled())
    }

    /// Creates a Bot that writes every applied move to `logger`
    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Self::with_game(config, Game::default(), logger)
    }

    /// Creates a Bot around an existing game
    pub fn with_game(config: Config, game: Game, logger: DebugLogger) -> Self {
        if config.profiling.enabled {
            simple_profiler::enable();
        }

        Bot {
            config,
            game: Mutex::new(game),
            logger,
        }
    }

    /// Returns service metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        json!({
            "apiversion": "1",
            "game": "oware",
            "default_depth": self.config.search.default_depth,
            "max_depth": self.config.search.max_depth,
        })
    }

    /// Read-only view of the game; never sweeps the board
    /// Corresponds to GET /get_game_state endpoint
    pub fn state(&self) -> GameStateView {
        self.game.lock().view()
    }

    /// Starts a new game
    /// Corresponds to POST /start endpoint
    pub fn start(&self) {
        let mut game = self.game.lock();
        if self.config.game.random_start {
            game.start();
        } else {
            game.start_with(Player::Bottom);
        }
    }

    /// Corresponds to POST /switch endpoint
    pub fn switch(&self) {
        let mut game = self.game.lock();
        game.switch();
        info!("Turn switched, player '{}' to move", game.player());
    }

    /// Corresponds to POST /undo endpoint
    pub fn undo(&self) -> bool {
        let undone = self.game.lock().undo();
        if !undone {
            warn!("Cannot undo, no moves in history");
        }
        undone
    }

    /// Plays a human move for the player to move, without switching the turn
    /// Corresponds to POST /move/<house> endpoint
    pub fn make_move(&self, house: u8) -> Result<(), MoveError> {
        let entry = {
            let mut game = self.game.lock();
            let before = *game.position();
            let player = game.player();
            game.make_move(house)?;
            MoveLogEntry::new(
                game.history().len(),
                player,
                house,
                MoveSource::Human,
                None,
                before,
                *game.position(),
            )
        };

        self.logger.log_move(entry);
        Ok(())
    }

    /// Decides the game, sweeping remaining beads when it is over
    /// Corresponds to POST /get_winner endpoint
    pub fn get_winner(&self) -> GameResult {
        self.game.lock().get_winner()
    }

    /// Searches for and plays a move for the player to move, then switches the turn
    /// Corresponds to POST /ai_move and POST /ai_move/<depth> endpoints
    ///
    /// The search runs on a blocking thread against a snapshot of the game, so
    /// the lock is not held while searching. If the game changed in the
    /// meantime the result is discarded.
    ///
    /// # Arguments
    /// * `depth` - Requested search depth; `None` uses the configured default.
    ///   Depths above `max_depth` are clamped.
    pub async fn ai_move(&self, depth: Option<u8>) -> Result<SearchResult, AiMoveError> {
        let start_time = Instant::now();

        let requested = depth.unwrap_or(self.config.search.default_depth);
        if requested == 0 {
            return Err(AiMoveError::ZeroDepth);
        }
        let depth = self.config.search.clamp_depth(requested);
        if depth < requested {
            warn!(
                "Requested depth {} exceeds max_depth, searching at {}",
                requested, depth
            );
        }

        let snapshot = self.game.lock().clone();
        if snapshot.evaluate_termination().is_decided() {
            return Err(AiMoveError::GameOver);
        }

        let position = *snapshot.position();
        let player = snapshot.player();
        let strategy = search::determine_strategy(depth, &self.config.search);
        info!(
            "Player '{}': searching depth {} ({:?})",
            player, depth, strategy
        );

        simple_profiler::reset();
        let result = tokio::task::spawn_blocking(move || {
            search::choose_move(&position, player, depth, strategy)
        })
        .await
        .map_err(|e| AiMoveError::Join(e.to_string()))?;

        let house = result.best_move.ok_or(MoveError::NoLegalMove)?;

        let entry = {
            let mut game = self.game.lock();
            if *game != snapshot {
                warn!("Discarding AI move {}: game changed during search", house);
                return Err(AiMoveError::StalePosition);
            }

            game.make_move(house)?;
            let entry = MoveLogEntry::new(
                game.history().len(),
                player,
                house,
                MoveSource::Ai,
                Some(depth),
                position,
                *game.position(),
            );
            game.switch();
            entry
        };
        self.logger.log_move(entry);

        let elapsed = start_time.elapsed().as_millis() as u64;
        info!(
            "Player '{}': AI chose house {} (score: {}, depth: {}, time: {}ms)",
            player, house, result.score, depth, elapsed
        );
        simple_profiler::print_report(elapsed);

        Ok(result)
    }
}
