//! Suppression of repeated alerts for an unchanged condition.

use super::alerts::AlertCondition;

/// Last condition that was dispatched. Lives for the process, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeduperState {
    pub last_fired: AlertCondition,
}

/// Decide whether `condition` should be dispatched given the previous state.
///
/// Entering a non-None condition, or switching between Low and High, dispatches.
/// Repeating the last condition does not. Returning to None clears the state
/// without dispatching.
pub fn should_dispatch(condition: AlertCondition, state: DeduperState) -> (bool, DeduperState) {
    match condition {
        AlertCondition::None => (false, DeduperState::default()),
        condition if condition == state.last_fired => (false, state),
        condition => (
            true,
            DeduperState {
                last_fired: condition,
            },
        ),
    }
}

/// Owns a [`DeduperState`] across ticks
#[derive(Debug, Default)]
pub struct AlertDeduper {
    state: DeduperState,
}

impl AlertDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this tick's condition; true when it should be dispatched
    pub fn observe(&mut self, condition: AlertCondition) -> bool {
        let (dispatch, state) = should_dispatch(condition, self.state);
        self.state = state;
        dispatch
    }

    pub fn state(&self) -> DeduperState {
        self.state
    }
}
