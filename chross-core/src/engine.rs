//! The engine contract every game implements.

use std::fmt::Debug;

use chross_types::Action;

/// A pure transition function from `(board, action)` to the next board.
///
/// Implementations must not keep hidden state or perform side effects:
/// replaying the same actions from the same initial board has to produce
/// structurally equal boards on every client. An illegal action is reported
/// as `Err` and leaves the input board untouched.
pub trait Engine {
    /// Game state.
    type Board: Clone + PartialEq + Debug;
    /// Game-specific action payload.
    type Move: Clone + Debug;
    /// Why an action was rejected.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply one action, returning the next board.
    fn apply(
        &self,
        board: &Self::Board,
        action: &Action<Self::Move>,
    ) -> Result<Self::Board, Self::Error>;
}
