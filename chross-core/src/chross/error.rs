//! Why a Chross move was rejected.

use thiserror::Error;

use chross_types::{Pole, Side};

use super::{Piece, Position};

/// A Chross move rejection.
///
/// The messages are meant to be shown to players verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Piece name that is not one of the six kinds.
    #[error("invalid piece type: {0}")]
    UnknownPiece(String),

    /// Destination outside rows -1..=8 or columns 0..=7.
    #[error("cannot move to {to}: off the board")]
    OutOfRange {
        /// Requested destination
        to: Position,
    },

    /// Destination in the mover's own back rank.
    #[error("cannot move into your own back row at {to}")]
    OwnBackRank {
        /// Requested destination
        to: Position,
    },

    /// Destination occupied by one of the mover's checkers.
    #[error("cannot capture your own checker at {to}")]
    OwnCapture {
        /// Requested destination
        to: Position,
    },

    /// A checker stands between origin and destination.
    #[error("{piece} from {from} to {to} is blocked")]
    Blocked {
        /// Piece played
        piece: Piece,
        /// Origin
        from: Position,
        /// Destination
        to: Position,
    },

    /// The piece does not move that way.
    #[error("invalid move: {piece} from {from} to {to}")]
    PatternIllegal {
        /// Piece played
        piece: Piece,
        /// Origin
        from: Position,
        /// Destination
        to: Position,
    },

    /// The acting pole is not the side to move.
    #[error("{pole} cannot move on {turn}'s turn")]
    WrongTurn {
        /// Pole that tried to act
        pole: Pole,
        /// Side to move
        turn: Side,
    },

    /// A side has already been breached to the limit; the game is over.
    #[error("{side} has been breached; the game is over")]
    AlreadyBreached {
        /// The breached side
        side: Side,
    },

    /// No checker of the acting side on the origin square.
    #[error("you have no checker at {from}")]
    NoChecker {
        /// Requested origin
        from: Position,
    },

    /// The moving checker stands outside the extended board.
    #[error("checker at {from} is off the board")]
    OffBoard {
        /// Origin of the move
        from: Position,
    },

    /// The hand index does not address a held piece.
    #[error("no piece at hand index {index}")]
    NoHandPiece {
        /// Requested hand index
        index: usize,
    },

    /// The draw index does not address a deck piece.
    #[error("no piece at deck index {index}")]
    NoDeckPiece {
        /// Requested draw index
        index: usize,
    },
}
