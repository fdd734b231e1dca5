//! Vendeta: a QR riddle hunt
//!
//! Read a clue, find the place it describes, scan the QR code hidden there.
//! A correct scan unlocks the next riddle; solving the last one means you
//! escaped.
//!
//! # Game Mechanics
//!
//! - **Riddles**: an ordered catalog of clue/answer pairs, fixed at startup
//! - **Scanning**: answers arrive as QR payloads and must match exactly
//! - **Retries**: a failed attempt never costs progress
//!
//! # Architecture
//!
//! - `data` - Riddles and the riddle catalog
//! - `game` - Progression state machine and the game session
//! - `scan` - Scanner and camera permission capabilities, scan orchestration
//! - `config` - TOML configuration
//! - `tui` - Terminal user interface with ratatui

pub mod config;
pub mod data;
pub mod game;
pub mod scan;
pub mod tui;

pub use data::*;
pub use game::Game;

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VendetaError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Scan cancelled")]
    ScanCancelled,

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Scanned code does not match the current riddle")]
    AnswerMismatch,

    #[error("Invalid riddle catalog: {0}")]
    InvalidCatalog(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VendetaError {
    /// Whether the player can simply try again
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, VendetaError::InvalidCatalog(_) | VendetaError::Config(_))
    }
}
