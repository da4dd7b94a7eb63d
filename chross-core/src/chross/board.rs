//! Chross board state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chross_types::{PerSide, Side};

use super::MoveError;

/// Breached checkers at which the breached side loses.
pub const BREACH_LIMIT: u8 = 3;

/// Pieces held in hand after the deal.
pub const HAND_SIZE: usize = 5;

/// Lowest row a checker may occupy (north's back rank).
pub const MIN_ROW: i8 = -1;

/// Highest row a checker may occupy (south's back rank).
pub const MAX_ROW: i8 = 8;

/// Columns run from 0 to this value inclusive.
pub const MAX_COL: i8 = 7;

/// Every side's deck before the deal.
pub const INITIAL_DECK: [Piece; 16] = [
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Pawn,
    Piece::Rook,
    Piece::Rook,
    Piece::Knight,
    Piece::Knight,
    Piece::Bishop,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
];

/// Movement pattern played from a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    /// One step forward, two from the starting rank, or one diagonal capture.
    Pawn,
    /// L-shaped jump.
    Knight,
    /// Any unblocked diagonal.
    Bishop,
    /// Any unblocked row or column.
    Rook,
    /// Bishop or rook.
    Queen,
    /// One step in any direction.
    King,
}

impl Piece {
    /// Lower-case name as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Piece {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pawn" => Ok(Self::Pawn),
            "knight" => Ok(Self::Knight),
            "bishop" => Ok(Self::Bishop),
            "rook" => Ok(Self::Rook),
            "queen" => Ok(Self::Queen),
            "king" => Ok(Self::King),
            _ => Err(MoveError::UnknownPiece(s.to_string())),
        }
    }
}

/// A square as `(row, col)`, serialized as a two-element array.
///
/// Rows run from -1 to 8: rows 0..=7 are the playing field, -1 and 8 are the
/// back ranks checkers breach into.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position(pub i8, pub i8);

impl Position {
    /// Create a position.
    pub fn new(row: i8, col: i8) -> Self {
        Self(row, col)
    }

    /// Row index.
    pub fn row(self) -> i8 {
        self.0
    }

    /// Column index.
    pub fn col(self) -> i8 {
        self.1
    }

    /// Check if the square exists on the extended board.
    pub fn in_bounds(self) -> bool {
        (MIN_ROW..=MAX_ROW).contains(&self.0) && (0..=MAX_COL).contains(&self.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({},{})", self.0, self.1)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parse `row,col`, optionally wrapped in parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = trimmed
            .split_once(',')
            .ok_or_else(|| format!("expected row,col but got {:?}", s))?;
        let row = row
            .trim()
            .parse()
            .map_err(|_| format!("invalid row in {:?}", s))?;
        let col = col
            .trim()
            .parse()
            .map_err(|_| format!("invalid column in {:?}", s))?;
        Ok(Self(row, col))
    }
}

/// One checker on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checker {
    /// Current square
    pub position: Position,
    /// Owner
    pub pole: Side,
}

/// Human-readable record of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Description of the move
    pub message: String,
    /// Originator's timestamp of the action
    pub acted_at: u64,
    /// Side that moved
    pub pole: Side,
}

/// Complete Chross game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChrossBoard {
    /// Checkers still on the board
    pub checkers: Vec<Checker>,
    /// Pieces each side may play
    pub hands: PerSide<Vec<Piece>>,
    /// Pieces each side may still draw
    pub decks: PerSide<Vec<Piece>>,
    /// Side to move
    pub turn: Side,
    /// Enemy checkers sitting in each side's back rank
    pub breached: PerSide<u8>,
    /// Accepted moves, oldest first
    pub log: Vec<LogEntry>,
}

impl ChrossBoard {
    /// The undealt starting position: two rows of checkers per side,
    /// full decks, empty hands, south to move.
    pub fn standard() -> Self {
        let rows = |side: Side| match side {
            Side::North => [0, 1],
            Side::South => [6, 7],
        };
        let checkers = Side::BOTH
            .into_iter()
            .flat_map(|side| {
                rows(side).into_iter().flat_map(move |row| {
                    (0..=MAX_COL).map(move |col| Checker {
                        position: Position(row, col),
                        pole: side,
                    })
                })
            })
            .collect();

        Self {
            checkers,
            hands: PerSide::default(),
            decks: PerSide::splat(INITIAL_DECK.to_vec()),
            turn: Side::South,
            breached: PerSide::default(),
            log: Vec::new(),
        }
    }

    /// The starting position with [`HAND_SIZE`] random pieces dealt to each
    /// side from its deck.
    pub fn deal<R: Rng>(rng: &mut R) -> Self {
        let mut board = Self::standard();
        for side in Side::BOTH {
            let deck = &mut board.decks[side];
            let hand = &mut board.hands[side];
            for _ in 0..HAND_SIZE {
                let index = rng.gen_range(0..deck.len());
                hand.push(deck.remove(index));
            }
        }
        board
    }

    /// Row a side may never enter; enemy checkers there count as breaches.
    pub fn back_rank(side: Side) -> i8 {
        match side {
            Side::North => MIN_ROW,
            Side::South => MAX_ROW,
        }
    }

    /// Row a side's pawns may double-step from.
    pub fn pawn_rank(side: Side) -> i8 {
        match side {
            Side::North => 1,
            Side::South => 6,
        }
    }

    /// The checker on a square, if any.
    pub fn checker_at(&self, position: Position) -> Option<&Checker> {
        self.checkers.iter().find(|c| c.position == position)
    }

    /// Check if a square is occupied.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.checker_at(position).is_some()
    }

    /// Count the enemy checkers in `side`'s back rank.
    pub fn count_breaches(&self, side: Side) -> u8 {
        let rank = Self::back_rank(side);
        let count = self
            .checkers
            .iter()
            .filter(|c| c.pole == side.opponent() && c.position.row() == rank)
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// The side that was breached to the limit, if any.
    pub fn breached_side(&self) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|&side| self.breached[side] >= BREACH_LIMIT)
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<Side> {
        self.breached_side().map(Side::opponent)
    }

    /// Check if no further actions are legal.
    pub fn is_over(&self) -> bool {
        self.breached_side().is_some()
    }
}

impl Default for ChrossBoard {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn standard_board_layout() {
        let board = ChrossBoard::standard();
        assert_eq!(board.checkers.len(), 32);
        assert_eq!(board.turn, Side::South);
        assert!(board.hands.north.is_empty());
        assert_eq!(board.decks.south.len(), 16);

        let north = board.checker_at(Position(1, 4)).unwrap();
        assert_eq!(north.pole, Side::North);
        let south = board.checker_at(Position(6, 4)).unwrap();
        assert_eq!(south.pole, Side::South);
        assert!(!board.is_occupied(Position(3, 3)));
    }

    #[test]
    fn deal_moves_five_pieces_into_each_hand() {
        let mut rng = SmallRng::seed_from_u64(7);
        let board = ChrossBoard::deal(&mut rng);

        for side in Side::BOTH {
            assert_eq!(board.hands[side].len(), HAND_SIZE);
            assert_eq!(board.decks[side].len(), INITIAL_DECK.len() - HAND_SIZE);

            let mut all: Vec<Piece> = board.hands[side]
                .iter()
                .chain(board.decks[side].iter())
                .copied()
                .collect();
            all.sort();
            let mut expected = INITIAL_DECK.to_vec();
            expected.sort();
            assert_eq!(all, expected);
        }
    }

    #[test]
    fn deal_is_reproducible_with_same_seed() {
        let a = ChrossBoard::deal(&mut SmallRng::seed_from_u64(42));
        let b = ChrossBoard::deal(&mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn back_ranks_are_outside_the_field() {
        assert_eq!(ChrossBoard::back_rank(Side::North), -1);
        assert_eq!(ChrossBoard::back_rank(Side::South), 8);
        assert!(Position(-1, 0).in_bounds());
        assert!(Position(8, 7).in_bounds());
        assert!(!Position(9, 0).in_bounds());
        assert!(!Position(0, 8).in_bounds());
    }

    #[test]
    fn breaches_count_enemy_checkers_in_back_rank() {
        let mut board = ChrossBoard::standard();
        board.checkers.push(Checker {
            position: Position(-1, 2),
            pole: Side::South,
        });
        board.checkers.push(Checker {
            position: Position(-1, 3),
            pole: Side::South,
        });
        assert_eq!(board.count_breaches(Side::North), 2);
        assert_eq!(board.count_breaches(Side::South), 0);
    }

    #[test]
    fn winner_is_the_opponent_of_the_breached_side() {
        let mut board = ChrossBoard::standard();
        assert!(board.winner().is_none());

        board.breached.north = BREACH_LIMIT;
        assert_eq!(board.breached_side(), Some(Side::North));
        assert_eq!(board.winner(), Some(Side::South));
        assert!(board.is_over());
    }

    #[test]
    fn position_parses_row_col() {
        assert_eq!("6,3".parse::<Position>().unwrap(), Position(6, 3));
        assert_eq!("(-1, 4)".parse::<Position>().unwrap(), Position(-1, 4));
        assert!("63".parse::<Position>().is_err());
    }

    #[test]
    fn position_is_a_json_pair() {
        assert_eq!(serde_json::to_string(&Position(2, 5)).unwrap(), "[2,5]");
    }

    #[test]
    fn piece_parsing() {
        assert_eq!("Knight".parse::<Piece>().unwrap(), Piece::Knight);
        assert!(matches!(
            "archbishop".parse::<Piece>(),
            Err(MoveError::UnknownPiece(_))
        ));
    }

    #[test]
    fn board_json_shape() {
        let json = serde_json::to_value(ChrossBoard::standard()).unwrap();
        assert_eq!(json["turn"], "south");
        assert_eq!(json["breached"], serde_json::json!({"north": 0, "south": 0}));
        assert_eq!(json["checkers"][0]["position"], serde_json::json!([0, 0]));
        assert_eq!(json["checkers"][0]["pole"], "north");
        assert_eq!(json["decks"]["north"][15], "king");
    }
}
