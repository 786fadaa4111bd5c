// Minimax search with alpha-beta pruning
//
// Top maximizes `top - bottom`, Bottom minimizes it. The search only ever
// works on copied positions produced by `rules::simulate_move`; the live
// game is touched once, by `ai_move`, after a move has been chosen.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SearchConfig;
use crate::error::MoveError;
use crate::game::Game;
use crate::rules;
use crate::simple_profiler;
use crate::types::{GameResult, Player, Position, WIN_THRESHOLD};

/// Score of a position Top has won
pub const WIN_SCORE: i32 = 999;

/// Initial alpha
pub const NEG_INFINITY: i32 = i32::MIN;

/// Initial beta
pub const INFINITY: i32 = i32::MAX;

/// Value of a searched position and the move that achieves it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<u8>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        SearchResult {
            score,
            best_move: None,
        }
    }
}

/// How the root of a search is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// One recursive alpha-beta search on the calling thread
    Sequential,
    /// Each root move searched on the rayon pool with its own full window
    ParallelRoot,
}

/// Picks the execution strategy for a search of `depth` plies
pub fn determine_strategy(depth: u8, config: &SearchConfig) -> ExecutionStrategy {
    let cpus = rayon::current_num_threads();
    if config.parallel_root && depth >= config.min_depth_for_parallel && cpus >= 2 {
        ExecutionStrategy::ParallelRoot
    } else {
        ExecutionStrategy::Sequential
    }
}

/// Heuristic and terminal score of a position, from Top's point of view
///
/// A store above half the beads is a decided game and scores +/-999.
/// Anything else scores the raw store difference.
pub fn evaluate_board(position: &Position) -> i32 {
    simple_profiler::record_evaluation();

    if position.top > WIN_THRESHOLD || position.bottom > WIN_THRESHOLD {
        return match position.compare_scores() {
            GameResult::TopWins => WIN_SCORE,
            GameResult::BottomWins => -WIN_SCORE,
            _ => 0,
        };
    }

    position.top as i32 - position.bottom as i32
}

/// Alpha-beta minimax from `position` with `player` to move
///
/// Returns the minimax value and the first house (in ascending order) that
/// achieves it. Leaves and decided positions carry no move.
pub fn minimax(
    position: &Position,
    player: Player,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
) -> SearchResult {
    crate::profile!({
        if depth == 0 {
            return SearchResult::leaf(evaluate_board(position));
        }

        let (terminal, result) = rules::finalize_position(position, player);
        if result.is_decided() {
            return SearchResult::leaf(evaluate_board(&terminal));
        }

        let maximizing = player == Player::Top;
        let mut best = SearchResult {
            score: if maximizing { NEG_INFINITY } else { INFINITY },
            best_move: None,
        };

        for house in rules::get_possible_moves(&position.board, player) {
            let child = match rules::simulate_move(house, position, player) {
                Ok(child) => {
                    simple_profiler::record_simulation(false);
                    child
                }
                Err(_) => {
                    simple_profiler::record_simulation(true);
                    continue;
                }
            };

            let score = minimax(&child, player.opponent(), depth - 1, alpha, beta).score;

            if maximizing {
                if score > best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(house),
                    };
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(house),
                    };
                }
                beta = beta.min(best.score);
            }

            if beta <= alpha {
                simple_profiler::record_alpha_beta_cutoff();
                break;
            }
        }

        if best.best_move.is_none() {
            return SearchResult::leaf(evaluate_board(position));
        }
        best
    })
}

/// Root search across the rayon pool
///
/// Each root move gets an independent full window, so children return exact
/// values; merging them in house order with strict comparison gives the same
/// move and score as the sequential search.
fn parallel_root_search(position: &Position, player: Player, depth: u8) -> SearchResult {
    if depth == 0 || rules::evaluate_termination(position, player).is_decided() {
        return minimax(position, player, depth, NEG_INFINITY, INFINITY);
    }

    let moves = rules::get_possible_moves(&position.board, player);
    let scored: Vec<Option<(u8, i32)>> = moves
        .par_iter()
        .map(|&house| {
            let scored = rules::simulate_move(house, position, player).ok().map(|child| {
                let score = minimax(&child, player.opponent(), depth - 1, NEG_INFINITY, INFINITY).score;
                (house, score)
            });
            simple_profiler::record_simulation(scored.is_none());
            simple_profiler::merge_thread_local();
            scored
        })
        .collect();

    let maximizing = player == Player::Top;
    let mut best: Option<SearchResult> = None;
    for (house, score) in scored.into_iter().flatten() {
        let better = match best {
            None => true,
            Some(current) if maximizing => score > current.score,
            Some(current) => score < current.score,
        };
        if better {
            best = Some(SearchResult {
                score,
                best_move: Some(house),
            });
        }
    }

    best.unwrap_or_else(|| SearchResult::leaf(evaluate_board(position)))
}

/// Chooses a move for `player` with the given strategy
pub fn choose_move(
    position: &Position,
    player: Player,
    depth: u8,
    strategy: ExecutionStrategy,
) -> SearchResult {
    let result = match strategy {
        ExecutionStrategy::Sequential => minimax(position, player, depth, NEG_INFINITY, INFINITY),
        ExecutionStrategy::ParallelRoot => parallel_root_search(position, player, depth),
    };
    simple_profiler::merge_thread_local();

    debug!(
        "Search for '{}' at depth {} ({:?}): move {:?}, score {}",
        player, depth, strategy, result.best_move, result.score
    );
    result
}

/// Searches the live position and plays the chosen move, then switches the turn
///
/// Fails with `NoLegalMove` when the search finds nothing to play, which
/// happens only once the game is over.
pub fn ai_move(
    game: &mut Game,
    depth: u8,
    strategy: ExecutionStrategy,
) -> Result<SearchResult, MoveError> {
    let result = choose_move(game.position(), game.player(), depth, strategy);

    let house = result.best_move.ok_or(MoveError::NoLegalMove)?;
    game.make_move(house)?;
    game.switch();

    info!(
        "AI played house {} (score: {}, depth: {})",
        house, result.score, depth
    );
    Ok(result)
}
