//! Riddle progression state machine
//!
//! `submit_scan_result` is a pure transition: it takes the current state and
//! a scan outcome and returns the next state together with the event the
//! presentation layer should show. It never fails; scanner problems pass
//! through as events without touching the state.

use crate::data::RiddleCatalog;
use crate::VendetaError;
use serde::{Deserialize, Serialize};

/// Progression record for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub current_index: usize,
    pub finished: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        if self.finished {
            Stage::Completed
        } else {
            Stage::InProgress(self.current_index)
        }
    }
}

/// State machine view of a `GameState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    InProgress(usize),
    Completed,
}

/// What a scan attempt produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanOutcome {
    Decoded(String),
    Cancelled,
    Failed(String),
}

/// What the presentation layer should tell the player after a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    /// Correct answer, next clue unlocked
    Advanced { next_index: usize },
    /// Correct answer on the last riddle
    Completed,
    /// Wrong answer, retry the current clue
    Incorrect,
    /// Player dismissed the scanner
    Cancelled,
    /// Scanner reported an error
    ScanFailed { reason: String },
    /// Outcome arrived after the game was already over; ignored
    AlreadyCompleted,
}

impl UiEvent {
    /// The recoverable error this event stands for, if any
    pub fn error(&self) -> Option<VendetaError> {
        match self {
            UiEvent::Incorrect => Some(VendetaError::AnswerMismatch),
            UiEvent::Cancelled => Some(VendetaError::ScanCancelled),
            UiEvent::ScanFailed { reason } => Some(VendetaError::ScanFailed(reason.clone())),
            UiEvent::Advanced { .. } | UiEvent::Completed | UiEvent::AlreadyCompleted => None,
        }
    }
}

/// Decide the next state for `outcome` against the riddle at `state.current_index`
pub fn submit_scan_result(
    state: GameState,
    outcome: &ScanOutcome,
    catalog: &RiddleCatalog,
) -> (GameState, UiEvent) {
    if state.finished {
        return (state, UiEvent::AlreadyCompleted);
    }

    match outcome {
        ScanOutcome::Cancelled => (state, UiEvent::Cancelled),
        ScanOutcome::Failed(reason) => (
            state,
            UiEvent::ScanFailed {
                reason: reason.clone(),
            },
        ),
        ScanOutcome::Decoded(text) => {
            if !catalog.get(state.current_index).is_solved_by(text) {
                return (state, UiEvent::Incorrect);
            }

            if state.current_index >= catalog.last_index() {
                let done = GameState {
                    current_index: state.current_index,
                    finished: true,
                };
                (done, UiEvent::Completed)
            } else {
                let next_index = state.current_index + 1;
                let next = GameState {
                    current_index: next_index,
                    finished: false,
                };
                (next, UiEvent::Advanced { next_index })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Riddle;

    fn at(index: usize) -> GameState {
        GameState {
            current_index: index,
            finished: false,
        }
    }

    fn decoded(text: &str) -> ScanOutcome {
        ScanOutcome::Decoded(text.to_string())
    }

    #[test]
    fn initial_state_is_first_riddle() {
        assert_eq!(GameState::new().stage(), Stage::InProgress(0));
    }

    #[test]
    fn correct_answer_advances() {
        let catalog = RiddleCatalog::builtin();
        let (state, event) = submit_scan_result(at(0), &decoded("BIBLIOTECA_NIVEL_1"), &catalog);
        assert_eq!(state, at(1));
        assert_eq!(event, UiEvent::Advanced { next_index: 1 });
    }

    #[test]
    fn correct_answer_on_last_riddle_completes() {
        let catalog = RiddleCatalog::builtin();
        let (state, event) = submit_scan_result(at(4), &decoded("CANCHAS_NIVEL_5"), &catalog);
        assert_eq!(
            state,
            GameState {
                current_index: 4,
                finished: true
            }
        );
        assert_eq!(state.stage(), Stage::Completed);
        assert_eq!(event, UiEvent::Completed);
    }

    #[test]
    fn wrong_answer_keeps_state() {
        let catalog = RiddleCatalog::builtin();
        let (state, event) = submit_scan_result(at(2), &decoded("WRONG"), &catalog);
        assert_eq!(state, at(2));
        assert_eq!(event, UiEvent::Incorrect);
        assert_eq!(event.error(), Some(VendetaError::AnswerMismatch));
    }

    #[test]
    fn answer_for_another_riddle_is_wrong() {
        let catalog = RiddleCatalog::builtin();
        let (state, event) = submit_scan_result(at(0), &decoded("CAFETERIA_NIVEL_2"), &catalog);
        assert_eq!(state, at(0));
        assert_eq!(event, UiEvent::Incorrect);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let catalog = RiddleCatalog::builtin();
        let (state, event) = submit_scan_result(at(0), &decoded("biblioteca_nivel_1"), &catalog);
        assert_eq!(state, at(0));
        assert_eq!(event, UiEvent::Incorrect);
    }

    #[test]
    fn cancel_and_failure_pass_through() {
        let catalog = RiddleCatalog::builtin();

        let (state, event) = submit_scan_result(at(0), &ScanOutcome::Cancelled, &catalog);
        assert_eq!(state, at(0));
        assert_eq!(event, UiEvent::Cancelled);

        let (state, event) =
            submit_scan_result(at(3), &ScanOutcome::Failed("camera busy".to_string()), &catalog);
        assert_eq!(state, at(3));
        assert_eq!(
            event,
            UiEvent::ScanFailed {
                reason: "camera busy".to_string()
            }
        );
        assert_eq!(
            event.error(),
            Some(VendetaError::ScanFailed("camera busy".to_string()))
        );
    }

    #[test]
    fn completed_state_ignores_everything() {
        let catalog = RiddleCatalog::builtin();
        let done = GameState {
            current_index: 4,
            finished: true,
        };
        for outcome in [
            decoded("CANCHAS_NIVEL_5"),
            decoded("BIBLIOTECA_NIVEL_1"),
            decoded("WRONG"),
            ScanOutcome::Cancelled,
            ScanOutcome::Failed("boom".to_string()),
        ] {
            let (state, event) = submit_scan_result(done, &outcome, &catalog);
            assert_eq!(state, done);
            assert_eq!(event, UiEvent::AlreadyCompleted);
        }
    }

    #[test]
    fn single_riddle_game_completes_on_first_match() {
        let catalog = RiddleCatalog::new(vec![Riddle::new("only", "QR")]).unwrap();
        let (state, event) = submit_scan_result(GameState::new(), &decoded("QR"), &catalog);
        assert!(state.finished);
        assert_eq!(state.current_index, 0);
        assert_eq!(event, UiEvent::Completed);
    }
}
