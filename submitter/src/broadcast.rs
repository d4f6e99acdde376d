//! Broadcaster abstraction for submitting one on-chain action.
//!
//! The [`Broadcaster`] trait decouples submission bookkeeping from any network,
//! signer or RPC endpoint. The caller binds those when building a broadcaster;
//! tests use scripted broadcasters that return predetermined receipts.

use anyhow::Result;

use crate::core::receipt::Receipt;

/// A broadcast transaction awaiting confirmation.
pub trait PendingAction {
    /// Identifier available right after broadcast (the transaction hash).
    fn reference(&self) -> &str;

    /// Block until the action has `confirmations` confirming blocks.
    ///
    /// `Ok(None)` means the chain will never produce a receipt (dropped or
    /// replaced). There is no timeout here; implementations bound the wait.
    fn wait(&self, confirmations: u32) -> Result<Option<Receipt>>;
}

/// Submits one action. Consumed by value, so it can only broadcast once.
pub trait Broadcaster {
    type Pending: PendingAction;

    fn broadcast(self) -> Result<Self::Pending>;
}

impl<F, P> Broadcaster for F
where
    F: FnOnce() -> Result<P>,
    P: PendingAction,
{
    type Pending = P;

    fn broadcast(self) -> Result<P> {
        self()
    }
}
