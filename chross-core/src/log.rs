//! The action log: ordered, validated history plus the board it replays from.
//!
//! The log upholds one invariant at all times:
//!
//! ```text
//! replay(engine, initial_board, actions) == board
//! ```
//!
//! Every mutation goes through the engine first and only commits on
//! success, so a rejected action never touches the log or the board.

use thiserror::Error;

use chross_types::{Action, ActionId};

use crate::Engine;

/// A committed action was rejected while replaying a history.
///
/// Committed history is always valid, so this signals corrupted or
/// diverged log data rather than a bad move.
#[derive(Debug, Error)]
#[error("action #{index} ({id}) rejected during replay: {source}")]
pub struct ReplayError<E> {
    /// Position of the rejected action in the history.
    pub index: usize,
    /// Id of the rejected action.
    pub id: ActionId,
    /// The engine's reason.
    #[source]
    pub source: E,
}

/// A retold history could not be reconciled with the local one.
#[derive(Debug, Error)]
pub enum ReconcileError<E> {
    /// Neither history is a prefix of the other.
    #[error("histories diverged after {common} shared action(s)")]
    Diverged {
        /// Number of leading actions both histories share.
        common: usize,
    },

    /// The retold history itself does not replay.
    #[error(transparent)]
    Replay(#[from] ReplayError<E>),
}

/// Outcome of [`ActionLog::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The local history was a prefix of the retold one, which now replaces it.
    Adopted {
        /// Actions the retold history added on top of the local one.
        added: usize,
    },
    /// The retold history is a strict prefix of the local one; nothing changed.
    Ahead {
        /// Actions the peer is missing.
        missing: usize,
    },
}

/// Left-fold the engine over `actions`, starting from `initial`.
///
/// Fails on the first action the engine rejects.
pub fn replay<E: Engine>(
    engine: &E,
    initial: &E::Board,
    actions: &[Action<E::Move>],
) -> Result<E::Board, ReplayError<E::Error>> {
    actions
        .iter()
        .enumerate()
        .try_fold(initial.clone(), |board, (index, action)| {
            engine
                .apply(&board, action)
                .map_err(|source| ReplayError {
                    index,
                    id: action.id,
                    source,
                })
        })
}

/// Ordered history of validated actions for one game.
#[derive(Debug, Clone)]
pub struct ActionLog<E: Engine> {
    engine: E,
    initial: E::Board,
    actions: Vec<Action<E::Move>>,
    board: E::Board,
}

impl<E: Engine> ActionLog<E> {
    /// Create an empty log starting from `initial`.
    pub fn new(engine: E, initial: E::Board) -> Self {
        Self {
            engine,
            board: initial.clone(),
            initial,
            actions: Vec::new(),
        }
    }

    /// Rebuild a log by replaying a stored history.
    pub fn from_history(
        engine: E,
        initial: E::Board,
        actions: Vec<Action<E::Move>>,
    ) -> Result<Self, ReplayError<E::Error>> {
        let board = replay(&engine, &initial, &actions)?;
        Ok(Self {
            engine,
            initial,
            actions,
            board,
        })
    }

    /// Validate `action` against the current board and commit it.
    ///
    /// On rejection neither the log nor the board changes.
    pub fn append(&mut self, action: Action<E::Move>) -> Result<&E::Board, E::Error> {
        let next = self.engine.apply(&self.board, &action)?;
        self.board = next;
        self.actions.push(action);
        Ok(&self.board)
    }

    /// Merge a history retold by a peer.
    ///
    /// Histories are compared by action id. If the local history is a prefix
    /// of the retold one, the retold history (and its initial board) replaces
    /// the local one. If the retold one is a strict prefix of ours, we are
    /// ahead and nothing changes. Anything else is a conflict and leaves the
    /// log untouched.
    pub fn reconcile(
        &mut self,
        initial: E::Board,
        actions: Vec<Action<E::Move>>,
    ) -> Result<Reconciled, ReconcileError<E::Error>> {
        let common = self
            .actions
            .iter()
            .zip(actions.iter())
            .take_while(|(ours, theirs)| ours.id == theirs.id)
            .count();

        if common == self.actions.len() {
            let board = replay(&self.engine, &initial, &actions)?;
            let added = actions.len() - common;
            self.initial = initial;
            self.actions = actions;
            self.board = board;
            Ok(Reconciled::Adopted { added })
        } else if common == actions.len() {
            Ok(Reconciled::Ahead {
                missing: self.actions.len() - common,
            })
        } else {
            Err(ReconcileError::Diverged { common })
        }
    }

    /// Replace the initial board while the history is still empty.
    ///
    /// Returns `false` (and changes nothing) once actions exist, since the
    /// committed history would no longer replay from the new board.
    pub fn restart(&mut self, initial: E::Board) -> bool {
        if !self.actions.is_empty() {
            return false;
        }
        self.board = initial.clone();
        self.initial = initial;
        true
    }

    /// The live board.
    pub fn board(&self) -> &E::Board {
        &self.board
    }

    /// The board the history replays from.
    pub fn initial_board(&self) -> &E::Board {
        &self.initial
    }

    /// Committed actions in order.
    pub fn actions(&self) -> &[Action<E::Move>] {
        &self.actions
    }

    /// The engine driving this log.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Id of the most recent action.
    pub fn latest_id(&self) -> Option<ActionId> {
        self.actions.last().map(|a| a.id)
    }

    /// Check if an action with this id was committed.
    pub fn contains(&self, id: &ActionId) -> bool {
        self.actions.iter().any(|a| a.id == *id)
    }

    /// Number of committed actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if no action was committed yet.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chross_types::Pole;

    /// Running total that refuses to go negative.
    #[derive(Debug, Clone, Copy, Default)]
    struct Tally;

    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("total would drop below zero")]
    struct Negative;

    impl Engine for Tally {
        type Board = i64;
        type Move = i64;
        type Error = Negative;

        fn apply(&self, board: &i64, action: &Action<i64>) -> Result<i64, Negative> {
            let next = board + action.body;
            if next < 0 {
                Err(Negative)
            } else {
                Ok(next)
            }
        }
    }

    fn step(by: i64) -> Action<i64> {
        Action::new(Pole::North, by)
    }

    // ===========================================
    // Replay
    // ===========================================

    #[test]
    fn replay_folds_in_order() {
        let actions = vec![step(3), step(-1), step(5)];
        assert_eq!(replay(&Tally, &10, &actions).unwrap(), 17);
    }

    #[test]
    fn replay_is_deterministic() {
        let actions = vec![step(2), step(2), step(-4)];
        let a = replay(&Tally, &0, &actions).unwrap();
        let b = replay(&Tally, &0, &actions).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn replay_reports_first_rejected_action() {
        let actions = vec![step(1), step(-5), step(10)];
        let err = replay(&Tally, &0, &actions).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.id, actions[1].id);
        assert_eq!(err.source, Negative);
    }

    // ===========================================
    // Append
    // ===========================================

    #[test]
    fn append_commits_valid_actions() {
        let mut log = ActionLog::new(Tally, 0);
        log.append(step(4)).unwrap();
        log.append(step(-1)).unwrap();

        assert_eq!(*log.board(), 3);
        assert_eq!(log.len(), 2);
        assert_eq!(*log.initial_board(), 0);
    }

    #[test]
    fn rejected_append_changes_nothing() {
        let mut log = ActionLog::new(Tally, 1);
        log.append(step(1)).unwrap();
        let before = log.latest_id();

        assert!(log.append(step(-3)).is_err());
        assert_eq!(*log.board(), 2);
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest_id(), before);
    }

    #[test]
    fn board_always_matches_replay() {
        let mut log = ActionLog::new(Tally, 5);
        for by in [1, -2, 7, -20, 3] {
            let _ = log.append(step(by));
            let replayed = replay(&Tally, log.initial_board(), log.actions()).unwrap();
            assert_eq!(replayed, *log.board());
        }
    }

    #[test]
    fn contains_and_latest_id() {
        let mut log = ActionLog::new(Tally, 0);
        assert!(log.latest_id().is_none());

        let a = step(1);
        let id = a.id;
        log.append(a).unwrap();

        assert!(log.contains(&id));
        assert!(!log.contains(&ActionId::new()));
        assert_eq!(log.latest_id(), Some(id));
    }

    #[test]
    fn from_history_rejects_invalid_log() {
        assert!(ActionLog::from_history(Tally, 0, vec![step(-1)]).is_err());
        let log = ActionLog::from_history(Tally, 0, vec![step(2), step(3)]).unwrap();
        assert_eq!(*log.board(), 5);
    }

    // ===========================================
    // Reconcile
    // ===========================================

    #[test]
    fn empty_log_adopts_retold_history() {
        let history = vec![step(1), step(2)];
        let mut log = ActionLog::new(Tally, 0);

        let outcome = log.reconcile(10, history.clone()).unwrap();

        assert_eq!(outcome, Reconciled::Adopted { added: 2 });
        assert_eq!(*log.initial_board(), 10);
        assert_eq!(*log.board(), 13);
        assert_eq!(log.actions(), history.as_slice());
    }

    #[test]
    fn prefix_log_adopts_longer_history() {
        let history = vec![step(1), step(2), step(3)];
        let mut log = ActionLog::from_history(Tally, 0, history[..1].to_vec()).unwrap();

        let outcome = log.reconcile(0, history).unwrap();
        assert_eq!(outcome, Reconciled::Adopted { added: 2 });
        assert_eq!(*log.board(), 6);
    }

    #[test]
    fn longer_local_log_stays_ahead() {
        let history = vec![step(1), step(2)];
        let mut log = ActionLog::from_history(Tally, 0, history.clone()).unwrap();

        let outcome = log.reconcile(0, history[..1].to_vec()).unwrap();
        assert_eq!(outcome, Reconciled::Ahead { missing: 1 });
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn diverged_histories_conflict_without_mutation() {
        let shared = step(1);
        let mut log =
            ActionLog::from_history(Tally, 0, vec![shared.clone(), step(2)]).unwrap();

        let err = log.reconcile(0, vec![shared, step(5)]).unwrap_err();

        assert!(matches!(err, ReconcileError::Diverged { common: 1 }));
        assert_eq!(*log.board(), 3);
    }

    #[test]
    fn invalid_retold_history_leaves_log_alone() {
        let mut log = ActionLog::new(Tally, 4);
        let err = log.reconcile(0, vec![step(-1)]).unwrap_err();

        assert!(matches!(err, ReconcileError::Replay(_)));
        assert_eq!(*log.initial_board(), 4);
    }

    // ===========================================
    // Restart
    // ===========================================

    #[test]
    fn restart_only_before_first_action() {
        let mut log = ActionLog::new(Tally, 0);
        assert!(log.restart(9));
        assert_eq!(*log.board(), 9);

        log.append(step(1)).unwrap();
        assert!(!log.restart(0));
        assert_eq!(*log.board(), 10);
    }
}
