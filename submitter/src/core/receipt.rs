//! Confirmed outcome of a submitted transaction.
//!
//! Field names follow the camelCase layout that EVM tooling has always written
//! into history files, so existing histories keep loading.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::codec::{BigNumber, ChainValue, CodecError};

/// Status code reported for a successful post-byzantium transaction.
pub const STATUS_SUCCESS: u8 = 1;

/// Receipt of a mined transaction. Immutable once recorded in a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Recipient; `None` for contract creation.
    pub to: Option<String>,
    pub from: String,
    /// Address of the contract created by this transaction, if any.
    pub contract_address: Option<String>,
    pub transaction_index: u64,
    /// Intermediate state root (pre-byzantium receipts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    pub gas_used: BigNumber,
    pub logs_bloom: String,
    pub block_hash: String,
    pub transaction_hash: String,
    #[serde(default)]
    pub logs: Vec<ReceiptLog>,
    pub block_number: u64,
    /// Confirmations observed when the receipt was fetched.
    pub confirmations: u64,
    pub cumulative_gas_used: BigNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_gas_price: Option<BigNumber>,
    #[serde(default)]
    pub byzantium: bool,
    #[serde(rename = "type", default)]
    pub tx_type: u8,
    /// `1` for success, `0` for failure; absent before byzantium.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    /// Fields this version does not model, kept so re-persisting loses nothing.
    #[serde(flatten)]
    pub extra: BTreeMap<String, ChainValue>,
}

/// Serialized names of the modelled fields; everything else lands in `extra`.
const KNOWN_FIELDS: &[&str] = &[
    "to",
    "from",
    "contractAddress",
    "transactionIndex",
    "root",
    "gasUsed",
    "logsBloom",
    "blockHash",
    "transactionHash",
    "logs",
    "blockNumber",
    "confirmations",
    "cumulativeGasUsed",
    "effectiveGasPrice",
    "byzantium",
    "type",
    "status",
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KnownFields {
    to: Option<String>,
    from: String,
    contract_address: Option<String>,
    transaction_index: u64,
    #[serde(default)]
    root: Option<String>,
    gas_used: BigNumber,
    logs_bloom: String,
    block_hash: String,
    transaction_hash: String,
    #[serde(default)]
    logs: Vec<ReceiptLog>,
    block_number: u64,
    confirmations: u64,
    cumulative_gas_used: BigNumber,
    #[serde(default)]
    effective_gas_price: Option<BigNumber>,
    #[serde(default)]
    byzantium: bool,
    #[serde(rename = "type", default)]
    tx_type: u8,
    #[serde(default)]
    status: Option<u8>,
}

// `extra` is split off by hand: `#[serde(flatten)]` cannot carry numbers wider
// than `u64`.
impl<'de> Deserialize<'de> for Receipt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let mut known = Map::new();
        for &name in KNOWN_FIELDS {
            if let Some(value) = fields.remove(name) {
                known.insert(name.to_string(), value);
            }
        }
        let known: KnownFields =
            serde_json::from_value(Value::Object(known)).map_err(D::Error::custom)?;
        let extra = fields
            .into_iter()
            .map(|(key, value)| Ok((key, ChainValue::try_from(value)?)))
            .collect::<Result<BTreeMap<_, _>, CodecError>>()
            .map_err(D::Error::custom)?;

        Ok(Receipt {
            to: known.to,
            from: known.from,
            contract_address: known.contract_address,
            transaction_index: known.transaction_index,
            root: known.root,
            gas_used: known.gas_used,
            logs_bloom: known.logs_bloom,
            block_hash: known.block_hash,
            transaction_hash: known.transaction_hash,
            logs: known.logs,
            block_number: known.block_number,
            confirmations: known.confirmations,
            cumulative_gas_used: known.cumulative_gas_used,
            effective_gas_price: known.effective_gas_price,
            byzantium: known.byzantium,
            tx_type: known.tx_type,
            status: known.status,
            extra,
        })
    }
}

impl Receipt {
    /// Whether the chain reported success. Receipts without a status are
    /// treated as successful since the node gave no failure signal.
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == STATUS_SUCCESS)
    }

    pub fn created_address(&self) -> Option<&str> {
        self.contract_address.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLog {
    pub transaction_index: u64,
    pub block_number: u64,
    pub transaction_hash: String,
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub log_index: u64,
    pub block_hash: String,
}
