//! Error type shared by every engine entry point.

use thiserror::Error;

/// Configuration errors raised by the engine.
///
/// Normal simulation never fails; these variants all indicate a caller bug or a
/// malformed settings document.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown slot profile: {0}")]
    UnknownProfile(String),
    #[error("unknown roulette bet: {0}")]
    UnknownBet(String),
    #[error("outcome table is empty")]
    EmptyTable,
    #[error("bet size must be a positive finite number, got {0}")]
    InvalidBetSize(f64),
    #[error("settings parsing error: {0}")]
    Settings(#[from] serde_json::Error),
}
