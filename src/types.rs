//! On-chain value types shared by the wallet, the network client and the submitter

use crate::error::{AirdropError, AirdropResult};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte Aptos account address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a hex address, with or without `0x`. Short forms are zero-padded on the left.
    pub fn from_hex_literal(literal: &str) -> AirdropResult<Self> {
        let invalid = |message: &str| AirdropError::InvalidAddress {
            address: literal.to_string(),
            message: message.to_string(),
        };

        let digits = literal
            .strip_prefix("0x")
            .or_else(|| literal.strip_prefix("0X"))
            .unwrap_or(literal);

        if digits.is_empty() {
            return Err(invalid("empty address"));
        }
        if digits.len() > Self::LENGTH * 2 {
            return Err(invalid("longer than 32 bytes"));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl FromStr for AccountAddress {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex_literal(s.trim())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fully qualified Move entry function: `<address>::<module>::<function>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub address: AccountAddress,
    pub module: String,
    pub function: String,
}

impl EntryPoint {
    pub fn new(address: AccountAddress, module: &str, function: &str) -> AirdropResult<Self> {
        let entry = Self {
            address,
            module: module.to_string(),
            function: function.to_string(),
        };
        for part in [module, function] {
            if !is_identifier(part) {
                return Err(AirdropError::InvalidEntryPoint {
                    entry_point: entry.to_string(),
                    message: format!("{:?} is not a Move identifier", part),
                });
            }
        }
        Ok(entry)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for EntryPoint {
    type Err = AirdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(AirdropError::InvalidEntryPoint {
                entry_point: s.to_string(),
                message: "expected <address>::<module>::<function>".to_string(),
            });
        };
        let address = address.parse().map_err(|e: AirdropError| {
            AirdropError::InvalidEntryPoint {
                entry_point: s.to_string(),
                message: e.to_string(),
            }
        })?;
        Self::new(address, module, function)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.function)
    }
}

impl Serialize for EntryPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Typed argument to an entry function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFunctionArgument {
    Address(AccountAddress),
    U64(u64),
}

impl Serialize for EntryFunctionArgument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The JSON API takes u64 as a decimal string
        match self {
            EntryFunctionArgument::Address(addr) => addr.serialize(serializer),
            EntryFunctionArgument::U64(value) => serializer.collect_str(value),
        }
    }
}

/// Unsigned transaction, fully resolved and ready to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub sender: AccountAddress,
    pub entry_point: EntryPoint,
    pub arguments: Vec<EntryFunctionArgument>,
    pub sequence_number: u64,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

/// Returned by the network once a signed transaction is accepted into the mempool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub hash: String,
}

/// Terminal outcome of a committed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalityResult {
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub version: u64,
}
