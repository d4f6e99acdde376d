//! Idempotent, resumable submission of on-chain actions.
//!
//! A multi-step deployment calls [`Submitter::submit_and_wait`] once per step,
//! naming each step with a caller-chosen key. Confirmed receipts are recorded
//! in a JSON history file so that re-running the deployment after a partial
//! failure skips every step that already has a receipt.
//!
//! - **[`core`]**: Pure data model (receipts, BigNumber tagging, the in-memory
//!   history map). No I/O.
//! - **[`io`]**: Filesystem side of the history and configuration files.
//!
//! [`submit`] combines the two with the [`broadcast`] capability supplied by
//! the caller.

pub mod broadcast;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod submit;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use broadcast::{Broadcaster, PendingAction};
pub use crate::core::codec::BigNumber;
pub use crate::core::history::History;
pub use crate::core::receipt::{Receipt, ReceiptLog};
pub use error::{HistoryError, SubmitError};
pub use submit::{DEFAULT_CONFIRMATIONS, Submitter};
