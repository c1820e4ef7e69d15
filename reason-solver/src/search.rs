//! Negamax alpha-beta search to the end of the game.
//!
//! All scores are final disc differences for the player to move, searched fail-hard:
//! a result outside `(alpha, beta)` is reported as the bound it crossed.

use arrayvec::ArrayVec;
use reason_othello::{Board, Location};

/// Positions with at least this many empty squares visit their children in
/// order of increasing opponent mobility. Below it, sorting costs more than it prunes.
const SORT_MIN_EMPTIES: u8 = 6;

/// Search `board` to the end of the game inside the window `(alpha, beta)`.
pub fn window(board: Board, alpha: i8, beta: i8) -> i8 {
    negamax(board, board.count_empties(), alpha, beta)
}

/// Pick the best placement at the root, searching inside `[-bound, bound]`.
///
/// Returns None for the location if the player to move must pass. The score is
/// clamped to the bound.
pub fn root(board: Board, bound: i8) -> (Option<Location>, i8) {
    let empties = board.count_empties();
    let mut moves = board.get_moves();

    let mut best = match moves.next() {
        Some(loc) => loc,
        None => {
            let score = final_or_pass(board, empties, -bound, bound);
            return (None, score.clamp(-bound, bound));
        }
    };
    let mut best_score = -negamax(board.apply_move(best), empties - 1, -bound, bound);

    for loc in moves {
        if best_score >= bound {
            break;
        }

        // Only the question "does this beat the best so far?" needs answering.
        let score = -negamax(board.apply_move(loc), empties - 1, -bound, -best_score);
        if score > best_score {
            best = loc;
            best_score = score;
        }
    }

    (Some(best), best_score.clamp(-bound, bound))
}

fn negamax(board: Board, empties: u8, alpha: i8, beta: i8) -> i8 {
    if empties == 0 {
        return board.score_absolute_difference();
    }

    let moves = board.get_moves();
    if moves.is_empty() {
        return final_or_pass(board, empties, alpha, beta);
    }

    let children = moves.map(|loc| board.apply_move(loc));
    if empties < SORT_MIN_EMPTIES {
        return search_children(children, empties, alpha, beta);
    }

    // At most one child per empty square.
    let mut sorted: ArrayVec<[Board; 64]> = children.collect();
    sorted.sort_unstable_by_key(|child| child.get_moves().len());
    search_children(sorted, empties, alpha, beta)
}

/// Score a board where the player to move has no placement: the game is over if the
/// opponent just passed too, otherwise the turn goes to the opponent.
fn final_or_pass(board: Board, empties: u8, alpha: i8, beta: i8) -> i8 {
    if board.just_passed {
        board.score_absolute_difference()
    } else {
        -negamax(board.pass(), empties, -beta, -alpha)
    }
}

fn search_children<I>(children: I, empties: u8, mut alpha: i8, beta: i8) -> i8
where
    I: IntoIterator<Item = Board>,
{
    for child in children {
        let score = -negamax(child, empties - 1, -beta, -alpha);

        // Fail high: the opponent will steer away from this line.
        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }

    alpha
}
