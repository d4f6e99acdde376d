//! Reversible text encoding for arbitrary-precision integers.
//!
//! Integers are written as `{"type": "BigNumber", "hex": "0x.."}` objects,
//! negatives as `"-0x.."`. [`ChainValue`] recognises that shape at every
//! nesting depth, so integers inside untyped chain data survive a write/read
//! cycle exactly. Plain JSON numbers keep their original text (serde_json's
//! `arbitrary_precision`), so wide values are not narrowed to `f64`.

use std::collections::BTreeMap;
use std::fmt;

use alloy_primitives::U256;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Value of the `type` field that marks a tagged integer.
pub const BIG_NUMBER_MARKER: &str = "BigNumber";

/// Errors produced while decoding a tagged integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected type marker {:?}, found {:?}", BIG_NUMBER_MARKER, .0)]
    Marker(String),
    #[error("hex value {0:?} is missing the 0x prefix")]
    MissingPrefix(String),
    #[error("hex value has no digits")]
    Empty,
    #[error("hex value {0:?} contains a non-hex digit")]
    InvalidDigit(String),
    #[error("hex value {0:?} does not fit in 256 bits")]
    Overflow(String),
}

/// Signed integer with a 256-bit magnitude, stored in its tagged form on disk.
///
/// Zero is never negative, so equal values compare and hash equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigNumber {
    negative: bool,
    magnitude: U256,
}

impl BigNumber {
    pub const ZERO: Self = Self {
        negative: false,
        magnitude: U256::ZERO,
    };

    pub fn from_parts(negative: bool, magnitude: U256) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// The value as an unsigned integer, `None` when negative.
    pub fn to_unsigned(&self) -> Option<U256> {
        (!self.negative).then_some(self.magnitude)
    }

    /// Lowercase hex with an even number of digits, `-0x` prefixed when negative.
    pub fn to_hex(&self) -> String {
        let hex = encode_hex(&self.magnitude);
        if self.negative { format!("-{hex}") } else { hex }
    }

    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        match hex.strip_prefix('-') {
            Some(unsigned) => decode_hex(unsigned).map(|m| Self::from_parts(true, m)),
            None => decode_hex(hex).map(Self::from),
        }
    }
}

impl From<U256> for BigNumber {
    fn from(value: U256) -> Self {
        Self::from_parts(false, value)
    }
}

impl From<u64> for BigNumber {
    fn from(value: u64) -> Self {
        Self::from(U256::from(value))
    }
}

impl From<i64> for BigNumber {
    fn from(value: i64) -> Self {
        Self::from_parts(value < 0, U256::from(value.unsigned_abs()))
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            fmt::Display::fmt(&self.magnitude, f)
        }
    }
}

pub fn encode_hex(value: &U256) -> String {
    let digits = format!("{value:x}");
    if digits.len() % 2 == 1 {
        format!("0x0{digits}")
    } else {
        format!("0x{digits}")
    }
}

pub fn decode_hex(hex: &str) -> Result<U256, CodecError> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| CodecError::MissingPrefix(hex.to_string()))?;
    if digits.is_empty() {
        return Err(CodecError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CodecError::InvalidDigit(hex.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| CodecError::Overflow(hex.to_string()))
}

#[derive(Serialize)]
struct TaggedOut<'a> {
    #[serde(rename = "type")]
    marker: &'a str,
    hex: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TaggedIn {
    #[serde(rename = "type")]
    marker: String,
    hex: String,
}

impl Serialize for BigNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedOut {
            marker: BIG_NUMBER_MARKER,
            hex: self.to_hex(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BigNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedIn::deserialize(deserializer)?;
        if tagged.marker != BIG_NUMBER_MARKER {
            return Err(D::Error::custom(CodecError::Marker(tagged.marker)));
        }
        BigNumber::from_hex(&tagged.hex).map_err(D::Error::custom)
    }
}

/// Chain-reported value of unknown shape.
///
/// An object with exactly a `type` of `"BigNumber"` and a string `hex` is a
/// tagged integer and must decode; any other object stays an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainValue {
    BigNumber(BigNumber),
    Array(Vec<ChainValue>),
    Object(BTreeMap<String, ChainValue>),
    /// Strings, numbers (original text), booleans and null.
    Scalar(Value),
}

impl ChainValue {
    pub fn as_big_number(&self) -> Option<&BigNumber> {
        match self {
            ChainValue::BigNumber(n) => Some(n),
            _ => None,
        }
    }
}

fn tagged_hex(map: &serde_json::Map<String, Value>) -> Option<&str> {
    if map.len() != 2 || map.get("type")?.as_str()? != BIG_NUMBER_MARKER {
        return None;
    }
    map.get("hex")?.as_str()
}

impl TryFrom<Value> for ChainValue {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self, CodecError> {
        match value {
            Value::Object(map) => {
                if let Some(hex) = tagged_hex(&map) {
                    return BigNumber::from_hex(hex).map(ChainValue::BigNumber);
                }
                map.into_iter()
                    .map(|(key, value)| Ok((key, ChainValue::try_from(value)?)))
                    .collect::<Result<_, CodecError>>()
                    .map(ChainValue::Object)
            }
            Value::Array(items) => items
                .into_iter()
                .map(ChainValue::try_from)
                .collect::<Result<_, CodecError>>()
                .map(ChainValue::Array),
            scalar => Ok(ChainValue::Scalar(scalar)),
        }
    }
}

impl Serialize for ChainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChainValue::BigNumber(n) => n.serialize(serializer),
            ChainValue::Array(items) => items.serialize(serializer),
            ChainValue::Object(map) => map.serialize(serializer),
            ChainValue::Scalar(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ChainValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ChainValue::try_from(value).map_err(D::Error::custom)
    }
}

impl From<BigNumber> for ChainValue {
    fn from(value: BigNumber) -> Self {
        ChainValue::BigNumber(value)
    }
}
