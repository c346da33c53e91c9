//! BCS encoding of an unsigned user transaction
//!
//! The bytes a sender signs are `sha3_256("APTOS::RawTransaction")` followed by
//! the BCS form of the raw transaction. They are built here from the request
//! itself, never taken from the node.

use crate::error::{AirdropError, AirdropResult};
use crate::types::{EntryFunctionArgument, TransactionRequest};

use serde::{Serialize, Serializer};
use sha3::{Digest, Sha3_256};

const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// Position of `EntryFunction` in the on-chain `TransactionPayload` enum
const ENTRY_FUNCTION_VARIANT: u32 = 2;

#[derive(Serialize)]
struct RawTransaction<'a> {
    sender: [u8; 32],
    sequence_number: u64,
    payload: TransactionPayload<'a>,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: u64,
    chain_id: u8,
}

struct TransactionPayload<'a>(EntryFunction<'a>);

impl Serialize for TransactionPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_variant(
            "TransactionPayload",
            ENTRY_FUNCTION_VARIANT,
            "EntryFunction",
            &self.0,
        )
    }
}

#[derive(Serialize)]
struct EntryFunction<'a> {
    module: ModuleId<'a>,
    function: &'a str,
    /// Always empty: the airdrop call is not generic
    ty_args: Vec<String>,
    args: Vec<Vec<u8>>,
}

#[derive(Serialize)]
struct ModuleId<'a> {
    address: [u8; 32],
    name: &'a str,
}

/// BCS bytes of one entry function argument
fn encode_argument(argument: &EntryFunctionArgument) -> AirdropResult<Vec<u8>> {
    let encoded = match argument {
        EntryFunctionArgument::Address(address) => bcs::to_bytes(address.as_bytes()),
        EntryFunctionArgument::U64(value) => bcs::to_bytes(value),
    };
    encoded.map_err(|e| AirdropError::Submission(format!("Failed to encode argument: {}", e)))
}

/// BCS form of the unsigned transaction
pub fn raw_transaction_bytes(request: &TransactionRequest) -> AirdropResult<Vec<u8>> {
    let args = request
        .arguments
        .iter()
        .map(encode_argument)
        .collect::<AirdropResult<Vec<_>>>()?;

    let raw = RawTransaction {
        sender: *request.sender.as_bytes(),
        sequence_number: request.sequence_number,
        payload: TransactionPayload(EntryFunction {
            module: ModuleId {
                address: *request.entry_point.address.as_bytes(),
                name: &request.entry_point.module,
            },
            function: &request.entry_point.function,
            ty_args: Vec::new(),
            args,
        }),
        max_gas_amount: request.max_gas_amount,
        gas_unit_price: request.gas_unit_price,
        expiration_timestamp_secs: request.expiration_timestamp_secs,
        chain_id: request.chain_id,
    };

    bcs::to_bytes(&raw)
        .map_err(|e| AirdropError::Submission(format!("Failed to encode transaction: {}", e)))
}

/// Bytes the sender's key signs for `request`
pub fn signing_message(request: &TransactionRequest) -> AirdropResult<Vec<u8>> {
    let mut message = Sha3_256::digest(RAW_TRANSACTION_SALT).to_vec();
    message.extend(raw_transaction_bytes(request)?);
    Ok(message)
}
