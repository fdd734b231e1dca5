//! Data structures for the game world
//!
//! Defines riddles, the riddle catalog and notice levels.

pub mod riddle;

pub use riddle::*;

use serde::{Deserialize, Serialize};

/// How loudly a notice should be shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn symbol(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ",
            NoticeLevel::Success => "✔",
            NoticeLevel::Warning => "▲",
            NoticeLevel::Error => "✖",
        }
    }
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "INFO"),
            NoticeLevel::Success => write!(f, "OK"),
            NoticeLevel::Warning => write!(f, "WARN"),
            NoticeLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// How long a notice stays on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeDuration {
    Short,
    Long,
}
