//! Test-only helpers: receipt fixtures, scripted broadcasters, scratch history files.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Result, anyhow};
use tempfile::TempDir;

use crate::broadcast::{Broadcaster, PendingAction};
use crate::core::codec::BigNumber;
use crate::core::receipt::{Receipt, STATUS_SUCCESS};

/// Create a deterministic successful receipt.
///
/// `contract_address` doubles as the creation marker: when set, `to` is `None`.
pub fn receipt(transaction_hash: &str, contract_address: Option<&str>) -> Receipt {
    Receipt {
        to: match contract_address {
            Some(_) => None,
            None => Some("0x00000000000000000000000000000000000000c0".to_string()),
        },
        from: "0x00000000000000000000000000000000000000de".to_string(),
        contract_address: contract_address.map(str::to_string),
        transaction_index: 0,
        root: None,
        gas_used: BigNumber::from(21_000u64),
        logs_bloom: "0x00".to_string(),
        block_hash: format!("{transaction_hash}b0"),
        transaction_hash: transaction_hash.to_string(),
        logs: Vec::new(),
        block_number: 1,
        confirmations: 1,
        cumulative_gas_used: BigNumber::from(21_000u64),
        effective_gas_price: Some(BigNumber::from(1_000_000_000u64)),
        byzantium: true,
        tx_type: 2,
        status: Some(STATUS_SUCCESS),
        extra: Default::default(),
    }
}

/// What a scripted broadcaster does when driven.
#[derive(Debug, Clone)]
pub enum Script {
    Confirmed(Receipt),
    Dropped,
    BroadcastFails(String),
    WaitFails(String),
}

#[derive(Debug, Default)]
struct Calls {
    broadcasts: usize,
    waits: Vec<u32>,
}

/// Shared record of how a scripted broadcaster was driven.
///
/// Cloned out of the broadcaster before it is handed to the submitter.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Calls>>,
}

impl CallLog {
    pub fn broadcasts(&self) -> usize {
        self.calls.borrow().broadcasts
    }

    /// Confirmation depths passed to `wait`, in call order.
    pub fn waits(&self) -> Vec<u32> {
        self.calls.borrow().waits.clone()
    }
}

/// Broadcaster that replays a [`Script`] without touching a network.
#[derive(Debug)]
pub struct ScriptedBroadcaster {
    reference: String,
    script: Script,
    log: CallLog,
}

impl ScriptedBroadcaster {
    pub fn new(reference: &str, script: Script) -> Self {
        Self {
            reference: reference.to_string(),
            script,
            log: CallLog::default(),
        }
    }

    pub fn confirmed(receipt: Receipt) -> Self {
        let reference = receipt.transaction_hash.clone();
        Self::new(&reference, Script::Confirmed(receipt))
    }

    pub fn dropped(reference: &str) -> Self {
        Self::new(reference, Script::Dropped)
    }

    pub fn failing(message: &str) -> Self {
        Self::new("", Script::BroadcastFails(message.to_string()))
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }
}

impl Broadcaster for ScriptedBroadcaster {
    type Pending = ScriptedPending;

    fn broadcast(self) -> Result<ScriptedPending> {
        self.log.calls.borrow_mut().broadcasts += 1;
        let outcome = match self.script {
            Script::BroadcastFails(message) => return Err(anyhow!(message)),
            Script::Confirmed(receipt) => Ok(Some(receipt)),
            Script::Dropped => Ok(None),
            Script::WaitFails(message) => Err(message),
        };
        Ok(ScriptedPending {
            reference: self.reference,
            outcome,
            log: self.log,
        })
    }
}

pub struct ScriptedPending {
    reference: String,
    outcome: std::result::Result<Option<Receipt>, String>,
    log: CallLog,
}

impl PendingAction for ScriptedPending {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn wait(&self, confirmations: u32) -> Result<Option<Receipt>> {
        self.log.calls.borrow_mut().waits.push(confirmations);
        self.outcome.clone().map_err(|message| anyhow!(message))
    }
}

/// History file path inside a scratch directory that is removed on drop.
pub struct TempHistory {
    _dir: TempDir,
    path: PathBuf,
}

impl TempHistory {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("history.json");
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_raw(&self, contents: &str) -> Result<()> {
        fs::write(&self.path, contents)?;
        Ok(())
    }

    pub fn read_raw(&self) -> Result<String> {
        Ok(fs::read_to_string(&self.path)?)
    }
}
