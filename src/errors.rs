//! Error types shared across the rules, search, notation and cache layers.
//!
//! Search-internal recoveries (illegal branch, unhashable state, worker
//! fault) never surface as errors; these types cover what callers can see.

use crate::game_state::chess_types::Color;

pub type RulesResult<T> = Result<T, RulesError>;
pub type SearchResult<T> = Result<T, SearchError>;
pub type NotationResult<T> = Result<T, NotationError>;
pub type MoveCacheResult<T> = Result<T, MoveCacheError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("{0:?} has no king on the board")]
    MissingKing(Color),
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("position is waiting for a promotion choice")]
    PendingPromotion,
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("root worker pool failed: {0}")]
    WorkerPool(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),
    #[error("invalid board layout: {0}")]
    InvalidLayout(String),
    #[error("invalid side-to-move field '{0}'")]
    InvalidSide(String),
    #[error("invalid hand field '{0}'")]
    InvalidHand(String),
    #[error("invalid move text '{0}'")]
    InvalidMove(String),
    #[error("missing {0} field in position")]
    MissingField(&'static str),
    #[error("position has extra trailing fields")]
    TrailingFields,
}

#[derive(thiserror::Error, Debug)]
pub enum MoveCacheError {
    #[error("move cache i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("move cache file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("move cache format version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
}
