//! Transaction submission: the airdrop workflow and its fixed call parameters

mod submitter;

pub use submitter::{SubmitOptions, TransactionSubmitter, AIRDROP_AMOUNT, DEFAULT_ENTRY_POINT};
