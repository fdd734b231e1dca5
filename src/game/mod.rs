//! Core game logic and state management

pub mod notice;
pub mod progression;

pub use notice::{Notice, NoticeTiming};
pub use progression::{submit_scan_result, GameState, ScanOutcome, Stage, UiEvent};

use crate::data::{Riddle, RiddleCatalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maximum notices kept in the message log
const MESSAGE_LOG_LIMIT: usize = 50;

/// One play-through of a riddle catalog
#[derive(Debug, Clone)]
pub struct Game {
    catalog: RiddleCatalog,
    state: GameState,

    /// Game statistics
    pub stats: GameStats,

    /// Message log (for UI display)
    pub message_log: Vec<Notice>,
}

/// Game statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub scans_submitted: u32,
    pub correct_scans: u32,
    pub incorrect_scans: u32,
    pub cancelled_scans: u32,
    pub failed_scans: u32,
}

impl Game {
    /// Start a new session at the first riddle
    pub fn new(catalog: RiddleCatalog) -> Self {
        info!(riddles = catalog.len(), "New game started");
        Self {
            catalog,
            state: GameState::new(),
            stats: GameStats::default(),
            message_log: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &RiddleCatalog {
        &self.catalog
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    /// The riddle the player is working on, `None` once the game is over
    pub fn current_riddle(&self) -> Option<&Riddle> {
        if self.state.finished {
            None
        } else {
            Some(self.catalog.get(self.state.current_index))
        }
    }

    pub fn current_clue_text(&self) -> Option<&str> {
        self.current_riddle().map(|riddle| riddle.clue.as_str())
    }

    /// Riddles solved so far and the total
    pub fn progress(&self) -> (usize, usize) {
        let solved = if self.state.finished {
            self.catalog.len()
        } else {
            self.state.current_index
        };
        (solved, self.catalog.len())
    }

    /// Feed a scan outcome into the state machine and record the result
    pub fn submit_scan_result(&mut self, outcome: ScanOutcome) -> UiEvent {
        let (next, event) = submit_scan_result(self.state, &outcome, &self.catalog);

        match &event {
            UiEvent::Advanced { next_index } => {
                self.stats.correct_scans += 1;
                info!(next_index, "Riddle solved");
            }
            UiEvent::Completed => {
                self.stats.correct_scans += 1;
                info!(riddles = self.catalog.len(), "Final riddle solved, game completed");
            }
            UiEvent::Incorrect => {
                self.stats.incorrect_scans += 1;
                debug!(index = self.state.current_index, "Scanned code does not match");
            }
            UiEvent::Cancelled => {
                self.stats.cancelled_scans += 1;
                debug!("Scan cancelled by player");
            }
            UiEvent::ScanFailed { reason } => {
                self.stats.failed_scans += 1;
                debug!(%reason, "Scanner reported a failure");
            }
            UiEvent::AlreadyCompleted => {
                debug!("Ignoring scan outcome after completion");
            }
        }
        if event != UiEvent::AlreadyCompleted {
            self.stats.scans_submitted += 1;
        }

        self.state = next;
        if let Some(notice) = Notice::from_event(&event) {
            self.add_notice(notice);
        }
        event
    }

    /// Add a notice to the log
    pub fn add_notice(&mut self, notice: Notice) {
        self.message_log.push(notice);
        if self.message_log.len() > MESSAGE_LOG_LIMIT {
            self.message_log.remove(0);
        }
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.message_log.last()
    }

    /// One-line summary for the status bar
    pub fn check_status(&self) -> String {
        let (solved, total) = self.progress();
        format!(
            "Solved: {}/{} | Scans: {} | Wrong: {} | Cancelled: {}",
            solved,
            total,
            self.stats.scans_submitted,
            self.stats.incorrect_scans,
            self.stats.cancelled_scans
        )
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(RiddleCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(text: &str) -> ScanOutcome {
        ScanOutcome::Decoded(text.to_string())
    }

    #[test]
    fn new_game_shows_first_clue() {
        let game = Game::default();
        assert!(!game.is_finished());
        assert_eq!(game.stage(), Stage::InProgress(0));
        assert_eq!(
            game.current_clue_text(),
            Some(RiddleCatalog::builtin().get(0).clue.as_str())
        );
        assert_eq!(game.progress(), (0, 5));
    }

    #[test]
    fn playing_through_records_stats_and_notices() {
        let mut game = Game::default();
        game.submit_scan_result(decoded("WRONG"));
        game.submit_scan_result(ScanOutcome::Cancelled);
        game.submit_scan_result(ScanOutcome::Failed("blurry".to_string()));

        let answers: Vec<String> = game.catalog().iter().map(|r| r.answer.clone()).collect();
        for answer in answers {
            game.submit_scan_result(ScanOutcome::Decoded(answer));
        }

        assert!(game.is_finished());
        assert_eq!(game.current_clue_text(), None);
        assert_eq!(game.progress(), (5, 5));
        assert_eq!(
            game.stats,
            GameStats {
                scans_submitted: 8,
                correct_scans: 5,
                incorrect_scans: 1,
                cancelled_scans: 1,
                failed_scans: 1,
            }
        );
        assert_eq!(
            game.latest_notice().map(|n| n.text.as_str()),
            Some("Congratulations, you escaped!")
        );
    }

    #[test]
    fn outcomes_after_completion_are_not_counted() {
        let mut game = Game::new(RiddleCatalog::single("DONE").unwrap());
        assert_eq!(game.submit_scan_result(decoded("DONE")), UiEvent::Completed);
        let notices = game.message_log.len();

        assert_eq!(
            game.submit_scan_result(decoded("DONE")),
            UiEvent::AlreadyCompleted
        );
        assert_eq!(game.stats.scans_submitted, 1);
        assert_eq!(game.message_log.len(), notices);
        assert!(game.is_finished());
    }

    #[test]
    fn message_log_is_bounded() {
        let mut game = Game::default();
        for _ in 0..(MESSAGE_LOG_LIMIT + 10) {
            game.submit_scan_result(decoded("WRONG"));
        }
        assert_eq!(game.message_log.len(), MESSAGE_LOG_LIMIT);
        assert_eq!(game.state(), GameState::new());
    }
}
