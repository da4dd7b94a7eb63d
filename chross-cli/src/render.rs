//! Plain-text rendering of a Chross board.

use std::fmt::Write;

use chross_core::{ChrossBoard, Position};
use chross_types::Side;

/// Render the extended board (rows -1..=8) plus hands, decks and status.
///
/// North checkers print as `n`, south as `s`; rows -1 and 8 are the
/// breach rows.
pub fn board(board: &ChrossBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "     0 1 2 3 4 5 6 7");
    for row in -1..=8 {
        let _ = write!(out, "{:>3}  ", row);
        for col in 0..=7 {
            let cell = match board.checker_at(Position(row, col)) {
                Some(c) if c.pole == Side::North => 'n',
                Some(_) => 's',
                None if row == -1 || row == 8 => '_',
                None => '.',
            };
            let _ = write!(out, "{} ", cell);
        }
        out.push('\n');
    }

    for side in Side::BOTH {
        let hand: Vec<String> = board.hands[side]
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}:{}", i, p))
            .collect();
        let _ = writeln!(
            out,
            "{:<6} hand [{}]  deck {}  breached {}",
            side.as_str(),
            hand.join(" "),
            board.decks[side].len(),
            board.breached[side]
        );
    }

    match board.winner() {
        Some(winner) => {
            let _ = writeln!(out, "{} wins", winner);
        }
        None => {
            let _ = writeln!(out, "{} to move", board.turn);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_layout() {
        let text = board(&ChrossBoard::standard());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "     0 1 2 3 4 5 6 7");
        assert_eq!(lines[1].trim_end(), " -1  _ _ _ _ _ _ _ _");
        assert_eq!(lines[2].trim_end(), "  0  n n n n n n n n");
        assert_eq!(lines[5].trim_end(), "  3  . . . . . . . .");
        assert_eq!(lines[8].trim_end(), "  6  s s s s s s s s");
        assert!(text.ends_with("south to move\n"));
    }

    #[test]
    fn hands_are_indexed() {
        let mut b = ChrossBoard::standard();
        b.hands.north = vec![chross_core::Piece::Rook, chross_core::Piece::Pawn];
        let text = board(&b);
        assert!(text.contains("north  hand [0:rook 1:pawn]  deck 16  breached 0"));
    }
}
