// Oware rules: sowing, capture, the feeding rule and end-of-game detection
//
// Everything here is a pure function over copied values. The live game
// (see game.rs) and the search (see search.rs) both go through these,
// so a human move and a simulated move can never disagree.

use crate::error::MoveError;
use crate::types::{GameResult, Houses, Player, Position, HOUSES_PER_SIDE, HOUSE_COUNT, WIN_THRESHOLD};

/// Maps a 1-based house number on `player`'s row to a board index
///
/// Top house `h` is index `h + 5`, bottom house `h` is index `h - 1`.
pub fn house_to_index(house: u8, player: Player) -> Result<usize, MoveError> {
    if !(1..=HOUSES_PER_SIDE as u8).contains(&house) {
        return Err(MoveError::InvalidHouseRange { house });
    }
    Ok(player.first_index() + house as usize - 1)
}

/// Inverse of `house_to_index` for an index on either row
pub fn index_to_house(index: usize) -> u8 {
    (index % HOUSES_PER_SIDE) as u8 + 1
}

/// House numbers (1-6, ascending) on `player`'s row holding at least one bead
///
/// An empty result means the player cannot move at all.
pub fn get_possible_moves(board: &Houses, player: Player) -> Vec<u8> {
    player
        .indices()
        .filter(|&i| board[i] > 0)
        .map(index_to_house)
        .collect()
}

/// Sows every bead from `from` counter-clockwise, never refilling `from` itself
///
/// Returns the index of the last house sown. The caller guarantees `from` is non-empty.
fn sow(board: &mut Houses, from: usize) -> usize {
    let mut beads = board[from];
    board[from] = 0;
    let mut current = from;

    while beads > 0 {
        current = (current + 1) % HOUSE_COUNT;
        if current == from {
            continue;
        }
        board[current] += 1;
        beads -= 1;
    }

    current
}

/// Captures backwards from `last` while houses sit on the opponent's row holding 2 or 3 beads
///
/// Returns the number of beads moved into `mover`'s store.
fn capture(position: &mut Position, last: usize, mover: Player) -> u32 {
    let opponent = mover.opponent();
    let mut index = last;
    let mut captured = 0;

    while opponent.owns(index) && matches!(position.board[index], 2 | 3) {
        captured += position.board[index];
        position.board[index] = 0;
        index = (index + HOUSE_COUNT - 1) % HOUSE_COUNT;
    }

    *position.score_mut(mover) += captured;
    captured
}

/// Whether sowing from `index` drops at least one bead on the opponent's row
fn feeds_opponent(board: &Houses, index: usize, mover: Player) -> bool {
    let mut after = *board;
    sow(&mut after, index);
    mover
        .opponent()
        .indices()
        .any(|i| after[i] > board[i])
}

/// Houses that would feed a starved opponent
///
/// Empty when the opponent still has beads, or when no house can reach them.
pub fn feeding_moves(board: &Houses, player: Player) -> Vec<u8> {
    let opponent = player.opponent();
    if opponent.indices().any(|i| board[i] > 0) {
        return Vec::new();
    }

    player
        .indices()
        .filter(|&i| board[i] > 0 && feeds_opponent(board, i, player))
        .map(index_to_house)
        .collect()
}

/// Checks range, source and feeding rule without applying anything
///
/// Returns the board index of the house on success.
pub fn validate_move(house: u8, board: &Houses, player: Player) -> Result<usize, MoveError> {
    let index = house_to_index(house, player)?;
    if board[index] == 0 {
        return Err(MoveError::EmptySource { house });
    }

    // With no feeding move at all the obligation is waived
    let feeding = feeding_moves(board, player);
    if !feeding.is_empty() && !feeding.contains(&house) {
        return Err(MoveError::FeedingRuleViolation { house, feeding });
    }

    Ok(index)
}

/// Plays `house` for `player` on a copy of `position`
///
/// Applies the same validation, sowing and capture as a live move and
/// returns the resulting position. The input is never modified.
pub fn simulate_move(house: u8, position: &Position, player: Player) -> Result<Position, MoveError> {
    let index = validate_move(house, &position.board, player)?;

    let mut next = *position;
    let last = sow(&mut next.board, index);
    capture(&mut next, last, player);

    Ok(next)
}

/// Works out whether the game is over with `player` to move
///
/// Rules, in order:
/// 1. a store above half the beads decides the game on scores
/// 2. if the mover's row is empty, the opponent banks their own row
/// 3. if the mover has no move, every bead goes to the owner of its row
///
/// Returns the outcome and, when a sweep applies, the swept position.
fn resolve_termination(position: &Position, player: Player) -> (GameResult, Option<Position>) {
    if position.top > WIN_THRESHOLD || position.bottom > WIN_THRESHOLD {
        return (position.compare_scores(), None);
    }

    if position.row_is_empty(player) {
        let mut swept = *position;
        bank_row(&mut swept, player.opponent());
        return (swept.compare_scores(), Some(swept));
    }

    if get_possible_moves(&position.board, player).is_empty() {
        let mut swept = *position;
        for side in Player::all().iter() {
            bank_row(&mut swept, *side);
        }
        return (swept.compare_scores(), Some(swept));
    }

    (GameResult::Ongoing, None)
}

/// Moves every bead on `owner`'s row into `owner`'s store
fn bank_row(position: &mut Position, owner: Player) {
    let banked = position.row_total(owner);
    for i in owner.indices() {
        position.board[i] = 0;
    }
    *position.score_mut(owner) += banked;
}

/// Pure termination query; never modifies the position
pub fn evaluate_termination(position: &Position, player: Player) -> GameResult {
    resolve_termination(position, player).0
}

/// Applies the end-of-game sweep if the game is over and returns the outcome
///
/// An ongoing position is returned unchanged.
pub fn finalize_position(position: &Position, player: Player) -> (Position, GameResult) {
    match resolve_termination(position, player) {
        (result, Some(swept)) => (swept, result),
        (result, None) => (*position, result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_index_mapping() {
        assert_eq!(house_to_index(1, Player::Bottom), Ok(0));
        assert_eq!(house_to_index(6, Player::Bottom), Ok(5));
        assert_eq!(house_to_index(1, Player::Top), Ok(6));
        assert_eq!(house_to_index(6, Player::Top), Ok(11));
        assert_eq!(
            house_to_index(0, Player::Top),
            Err(MoveError::InvalidHouseRange { house: 0 })
        );
        assert_eq!(
            house_to_index(7, Player::Bottom),
            Err(MoveError::InvalidHouseRange { house: 7 })
        );
        assert_eq!(index_to_house(0), 1);
        assert_eq!(index_to_house(11), 6);
    }

    #[test]
    fn test_sow_skips_source_on_wraparound() {
        let mut board = [0; HOUSE_COUNT];
        board[3] = 13;
        let last = sow(&mut board, 3);

        assert_eq!(board[3], 0, "source house must never be refilled");
        // 11 other houses get one each, the remaining 2 beads continue past the source
        assert_eq!(board[4], 2);
        assert_eq!(board[5], 2);
        assert_eq!(board[6], 1);
        assert_eq!(last, 5);
        assert_eq!(board.iter().sum::<u32>(), 13);
    }

    #[test]
    fn test_capture_chain_stops_at_first_miss() {
        // Bottom sows from index 4 (3 beads) into 5, 6, 7
        let mut board = [0; HOUSE_COUNT];
        board[0] = 1;
        board[4] = 3;
        board[5] = 1;
        board[6] = 1;
        board[7] = 2;
        let position = Position::new(board, 0, 0);

        let next = simulate_move(5, &position, Player::Bottom).unwrap();
        // index 7 -> 3, index 6 -> 2 captured; index 5 is bottom's own row, walk stops
        assert_eq!(next.bottom, 5);
        assert_eq!(next.board[7], 0);
        assert_eq!(next.board[6], 0);
        assert_eq!(next.board[5], 2);
    }

    #[test]
    fn test_capture_ignores_own_row() {
        // Top sows one bead from index 11 into index 0 which holds 1 -> 2 beads
        let mut board = [0; HOUSE_COUNT];
        board[0] = 1;
        board[11] = 1;
        board[10] = 3;
        let position = Position::new(board, 0, 0);

        let next = simulate_move(6, &position, Player::Top).unwrap();
        assert_eq!(next.top, 2);
        assert_eq!(next.board[0], 0);
        // walk moved to index 11, which is Top's own row
        assert_eq!(next.board[10], 3);
    }

    #[test]
    fn test_feeding_moves_only_when_opponent_starved() {
        let board = Position::initial().board;
        assert!(feeding_moves(&board, Player::Bottom).is_empty());

        let mut starved = [0; HOUSE_COUNT];
        starved[0] = 1; // reaches index 1, stays home
        starved[4] = 2; // reaches index 6, feeds
        starved[5] = 1; // reaches index 6, feeds
        assert_eq!(feeding_moves(&starved, Player::Bottom), vec![5, 6]);
    }

    #[test]
    fn test_validate_move_waives_feeding_when_impossible() {
        let mut board = [0; HOUSE_COUNT];
        board[6] = 1; // top house 1, cannot reach bottom's row
        assert_eq!(validate_move(1, &board, Player::Top), Ok(6));
    }

    #[test]
    fn test_termination_on_score_threshold() {
        let position = Position::new(Position::initial().board, 25, 0);
        assert_eq!(evaluate_termination(&position, Player::Bottom), GameResult::TopWins);
    }

    #[test]
    fn test_termination_banks_opponent_row_when_mover_empty() {
        let mut board = [0; HOUSE_COUNT];
        board[6] = 3;
        board[9] = 2;
        let position = Position::new(board, 20, 23);

        let (swept, result) = finalize_position(&position, Player::Bottom);
        assert_eq!(result, GameResult::TopWins);
        assert_eq!(swept.top, 25);
        assert_eq!(swept.bottom, 23);
        assert_eq!(swept.row_total(Player::Top), 0);
        // the pure query agrees and leaves its input alone
        assert_eq!(evaluate_termination(&position, Player::Bottom), GameResult::TopWins);
        assert_eq!(position.top, 20);
    }

    #[test]
    fn test_ongoing_position_is_not_finalized() {
        let position = Position::initial();
        let (same, result) = finalize_position(&position, Player::Top);
        assert_eq!(result, GameResult::Ongoing);
        assert_eq!(same, position);
    }
}
