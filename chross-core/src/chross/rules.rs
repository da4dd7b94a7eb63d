//! Chross move validation and resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use chross_types::{Action, PerSide, Side};

use super::board::{MAX_COL, MAX_ROW, MIN_ROW};
use super::{Checker, ChrossBoard, LogEntry, MoveError, Piece, Position, INITIAL_DECK};
use crate::Engine;

/// Game-specific fields of a Chross action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChrossMove {
    /// Deck index of the replacement piece, chosen by the originator
    pub draw_index: usize,
    /// Hand index of the piece played
    pub hand_index: usize,
    /// Square of the checker to move
    pub from: Position,
    /// Destination square
    pub to: Position,
}

impl ChrossMove {
    /// Build a move that draws a random replacement from `side`'s deck.
    ///
    /// The random choice is made once, here, and travels inside the action
    /// so every replica draws the same piece.
    pub fn drawing<R: Rng>(
        board: &ChrossBoard,
        side: Side,
        hand_index: usize,
        from: Position,
        to: Position,
        rng: &mut R,
    ) -> Self {
        Self {
            draw_index: Self::draw_index_for(board, side, rng),
            hand_index,
            from,
            to,
        }
    }

    /// A random index into `side`'s deck (0 for an empty deck).
    pub fn draw_index_for<R: Rng>(board: &ChrossBoard, side: Side, rng: &mut R) -> usize {
        match board.decks[side].len() {
            0 => 0,
            len => rng.gen_range(0..len),
        }
    }
}

/// The Chross engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChrossRules;

impl Engine for ChrossRules {
    type Board = ChrossBoard;
    type Move = ChrossMove;
    type Error = MoveError;

    fn apply(
        &self,
        board: &ChrossBoard,
        action: &Action<ChrossMove>,
    ) -> Result<ChrossBoard, MoveError> {
        if let Some(side) = board.breached_side() {
            return Err(MoveError::AlreadyBreached { side });
        }
        let side = match action.pole.side() {
            Some(side) if side == board.turn => side,
            _ => {
                return Err(MoveError::WrongTurn {
                    pole: action.pole,
                    turn: board.turn,
                })
            }
        };
        let mv = action.body;
        let piece = *board.hands[side]
            .get(mv.hand_index)
            .ok_or(MoveError::NoHandPiece {
                index: mv.hand_index,
            })?;
        if !owns_checker_at(board, side, mv.from) {
            return Err(MoveError::NoChecker { from: mv.from });
        }
        let captured = check_and_capture(board, side, piece, mv.from, mv.to)?;
        if mv.draw_index >= board.decks[side].len() {
            return Err(MoveError::NoDeckPiece {
                index: mv.draw_index,
            });
        }

        let mut next = board.clone();
        if let Some(target) = captured {
            next.checkers.retain(|c| *c != target);
        }
        if let Some(mover) = next
            .checkers
            .iter_mut()
            .find(|c| c.pole == side && c.position == mv.from)
        {
            mover.position = mv.to;
        }

        next.hands[side].remove(mv.hand_index);
        let drawn = next.decks[side].remove(mv.draw_index);
        next.hands[side].push(drawn);
        if next.decks[side].is_empty() {
            next.decks[side] = reshuffled(&next.hands[side]);
        }

        next.turn = side.opponent();
        next.breached = PerSide::from_fn(|s| next.count_breaches(s));
        next.log.push(LogEntry {
            message: describe(side, piece, &mv, captured.is_some()),
            acted_at: action.acted_at,
            pole: side,
        });
        Ok(next)
    }
}

/// Check that `side` may move its checker at `from` to `to` using `piece`.
///
/// Returns the enemy checker on `to` that the move would capture.
pub fn check_and_capture(
    board: &ChrossBoard,
    side: Side,
    piece: Piece,
    from: Position,
    to: Position,
) -> Result<Option<Checker>, MoveError> {
    if !owns_checker_at(board, side, from) {
        return Err(MoveError::NoChecker { from });
    }
    if !from.in_bounds() {
        return Err(MoveError::OffBoard { from });
    }
    if !to.in_bounds() {
        return Err(MoveError::OutOfRange { to });
    }
    if to.row() == ChrossBoard::back_rank(side) {
        return Err(MoveError::OwnBackRank { to });
    }
    let attacked = board.checker_at(to).copied();
    if matches!(attacked, Some(c) if c.pole == side) {
        return Err(MoveError::OwnCapture { to });
    }

    let dx = (to.col() - from.col()).abs();
    let dy = (to.row() - from.row()).abs();

    let sliding = match piece {
        Piece::Bishop => Some(dx == dy),
        Piece::Rook => Some(dx == 0 || dy == 0),
        Piece::Queen => Some(dx == dy || dx == 0 || dy == 0),
        Piece::Pawn | Piece::Knight | Piece::King => None,
    };
    let legal = match (piece, sliding) {
        (_, Some(false)) => false,
        (_, Some(true)) => {
            if is_blocked(board, from, to) {
                return Err(MoveError::Blocked { piece, from, to });
            }
            true
        }
        (Piece::Pawn, None) => {
            let forward = match side {
                Side::North => to.row() > from.row(),
                Side::South => to.row() < from.row(),
            };
            let double_step = from.row() == ChrossBoard::pawn_rank(side) && dy == 2 && dx == 0;
            let diagonal_capture = attacked.is_some() && dy == 1 && dx == 1;
            let step = dx == 0 && dy == 1;
            forward && (double_step || diagonal_capture || step)
        }
        (Piece::Knight, None) => (dx == 2 && dy == 1) || (dx == 1 && dy == 2),
        (Piece::King, None) => dx <= 1 && dy <= 1,
        (Piece::Bishop | Piece::Rook | Piece::Queen, None) => false,
    };
    if !legal {
        return Err(MoveError::PatternIllegal { piece, from, to });
    }
    Ok(attacked)
}

/// Every square of the extended board the checker could move to with `piece`.
///
/// Suggestions only: moves are always validated again when committed.
pub fn targetable_squares(
    board: &ChrossBoard,
    side: Side,
    checker: &Checker,
    piece: Piece,
) -> Vec<Position> {
    (MIN_ROW..=MAX_ROW)
        .flat_map(|row| (0..=MAX_COL).map(move |col| Position(row, col)))
        .filter(|&to| check_and_capture(board, side, piece, checker.position, to).is_ok())
        .collect()
}

fn owns_checker_at(board: &ChrossBoard, side: Side, at: Position) -> bool {
    board
        .checkers
        .iter()
        .any(|c| c.pole == side && c.position == at)
}

/// Walk unit steps from `from` toward `to` on straight and diagonal lines,
/// reporting any occupied square strictly in between.
fn is_blocked(board: &ChrossBoard, from: Position, to: Position) -> bool {
    let dr = to.row() - from.row();
    let dc = to.col() - from.col();
    if !(dr.abs() == dc.abs() || dr == 0 || dc == 0) {
        return false;
    }
    let (step_r, step_c) = (dr.signum(), dc.signum());
    let mut at = Position(from.row() + step_r, from.col() + step_c);
    while at != to {
        if board.is_occupied(at) {
            return true;
        }
        at = Position(at.row() + step_r, at.col() + step_c);
    }
    false
}

/// A full deck minus one copy of each piece still in hand.
///
/// Played pieces are not tracked; resetting the deck returns them.
fn reshuffled(hand: &[Piece]) -> Vec<Piece> {
    let mut deck = INITIAL_DECK.to_vec();
    for piece in hand {
        if let Some(index) = deck.iter().position(|p| p == piece) {
            deck.remove(index);
        }
    }
    deck
}

fn describe(side: Side, piece: Piece, mv: &ChrossMove, captured: bool) -> String {
    let mut message = format!("{} {} {} to {}", side, piece, mv.from, mv.to);
    if captured {
        message.push_str(&format!(", taking the {} checker", side.opponent()));
    }
    message
}
