#![no_std]

mod errors;
mod events;
mod multisig;
mod storage;
mod types;

pub use errors::{ErrorKind, MultisigError};
pub use multisig::{MultiSigWallet, MultiSigWalletClient};
pub use types::{ContractCall, Transaction, WalletAction, WalletCall, MAX_OWNERS};
