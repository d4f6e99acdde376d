//! Orchestration for idempotent `submit_and_wait`.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::broadcast::{Broadcaster, PendingAction};
use crate::core::history::History;
use crate::core::receipt::Receipt;
use crate::error::{HistoryError, SubmitError};
use crate::io::config::SubmitterConfig;
use crate::io::history_file::{load_history, load_history_strict, write_history};

/// Confirming blocks required before a receipt is recorded.
pub const DEFAULT_CONFIRMATIONS: u32 = 1;

/// Runs each keyed action at most once successfully, recording receipts in a
/// history file bound at construction.
///
/// Meant for one sequential control flow. Nothing here locks the history file,
/// so two submitters (or processes) on the same path can both broadcast the
/// same key and lose each other's records.
#[derive(Debug)]
pub struct Submitter {
    history: History,
    path: PathBuf,
    confirmations: u32,
}

impl Submitter {
    /// Open the history at `path`, starting empty if it cannot be used.
    ///
    /// Initialization never fails: a missing file is a first run, and an
    /// unreadable or malformed one is reported as a warning. With
    /// `discard_existing`, a loaded history is ignored and will be replaced on
    /// the first successful submission.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, discard_existing: bool) -> Self {
        let path = path.as_ref();
        info!("loading transaction history");
        let history = match load_history_strict(path) {
            Ok(_) if discard_existing => {
                info!("ignoring existing history, history file will be replaced");
                History::new()
            }
            Ok(history) => {
                info!(entries = history.len(), "loaded");
                history
            }
            Err(HistoryError::NotFound { .. }) => {
                info!("new history created");
                History::new()
            }
            Err(err) => {
                warn!(error = ?err, "failed to load transaction history, starting empty");
                History::new()
            }
        };
        Self::with_history(path, history)
    }

    /// Open using the path, discard mode and confirmation depth from `config`.
    pub fn from_config(config: &SubmitterConfig) -> Result<Self, SubmitError> {
        let mut submitter = Self::open(&config.history_path, config.discard_existing);
        submitter.set_confirmations(config.confirmations)?;
        Ok(submitter)
    }

    /// Bind an already loaded history to `path`. Nothing is read from disk.
    pub fn with_history(path: impl Into<PathBuf>, history: History) -> Self {
        Self {
            history,
            path: path.into(),
            confirmations: DEFAULT_CONFIRMATIONS,
        }
    }

    /// Load confirmed receipts for read-only use. Unlike [`Submitter::open`],
    /// a missing file is an error: callers expect the history to exist.
    pub fn load_receipts(path: impl AsRef<Path>) -> Result<History, HistoryError> {
        load_history_strict(path.as_ref())
    }

    /// Like [`Submitter::open`] without the fallback: every load failure except
    /// a missing file is returned.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        Ok(Self::with_history(path, load_history(path)?))
    }

    /// Return the recorded receipt for `key`, or broadcast and record one.
    ///
    /// The broadcaster is only invoked when `key` has no receipt. On success
    /// the whole history is persisted before returning. A broadcaster error or
    /// a dropped transaction leaves the history untouched, so the next call
    /// with the same key starts over. If persisting fails the receipt stays in
    /// memory only; a crash before the next successful persist means the
    /// action is broadcast again on the next run.
    #[instrument(skip(self, broadcaster), fields(confirmations = self.confirmations))]
    pub fn submit_and_wait<B: Broadcaster>(
        &mut self,
        key: &str,
        broadcaster: B,
    ) -> Result<Receipt, SubmitError> {
        if let Some(receipt) = self.history.get(key) {
            info!("skipping transaction");
            return Ok(receipt.clone());
        }

        info!("running transaction");
        let pending = broadcaster.broadcast().map_err(SubmitError::Action)?;
        let reference = pending.reference().to_string();
        info!(%reference, "broadcast, waiting for confirmation");

        let receipt = pending
            .wait(self.confirmations)
            .map_err(SubmitError::Action)?
            .ok_or_else(|| SubmitError::Dropped {
                key: key.to_string(),
                reference: reference.clone(),
            })?;
        if !receipt.succeeded() {
            warn!(%reference, status = ?receipt.status, "transaction confirmed with failure status");
        }

        self.history.put(key, receipt.clone());
        write_history(&self.path, &self.history)?;
        info!(%reference, block = receipt.block_number, "recorded");
        Ok(receipt)
    }

    /// Recorded receipt for `key`, without side effects.
    pub fn receipt(&self, key: &str) -> Option<&Receipt> {
        self.history.get(key)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn confirmations(&self) -> u32 {
        self.confirmations
    }

    pub fn set_confirmations(&mut self, confirmations: u32) -> Result<(), SubmitError> {
        if confirmations == 0 {
            return Err(SubmitError::InvalidConfirmations(confirmations));
        }
        self.confirmations = confirmations;
        Ok(())
    }

    /// Write the current history to the bound path.
    ///
    /// Useful to retry after a persist failure reported by
    /// [`Submitter::submit_and_wait`].
    pub fn persist(&self) -> Result<(), HistoryError> {
        write_history(&self.path, &self.history)
    }
}
