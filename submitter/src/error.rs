//! Error taxonomy for history persistence and submission.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or persist a history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Strict load found no file. Tolerant loads treat this as an empty history.
    #[error("transaction history {} not found", .path.display())]
    NotFound { path: PathBuf },
    #[error("read transaction history {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse transaction history {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encode transaction history {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("write transaction history {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HistoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HistoryError::NotFound { .. })
    }
}

/// Failure of [`Submitter::submit_and_wait`](crate::Submitter::submit_and_wait).
///
/// None of these are retried internally. The history is only mutated on the
/// `History` write path, where the receipt is already recorded in memory.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Confirmation resolved without a receipt; nothing was recorded.
    #[error("transaction {reference} for {key:?} has no receipt")]
    Dropped { key: String, reference: String },
    /// Broadcast or confirmation failure from the caller's broadcaster, unchanged.
    #[error(transparent)]
    Action(anyhow::Error),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("confirmations must be at least 1, got {0}")]
    InvalidConfirmations(u32),
}
