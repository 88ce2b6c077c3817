use soroban_sdk::{contracttype, Address, Symbol, Val, Vec};

/// Upper bound on the owner set; confirmation counts iterate it.
pub const MAX_OWNERS: u32 = 50;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owners,
    Owner(Address),
    OwnerEpoch(Address),
    Threshold,
    ValueAsset,
    TransactionCount,
    Transaction(u64),
    Confirmation(u64, Address),
}

/// A call into another contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractCall {
    pub contract: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

/// Amendments the wallet applies to itself. They are only reachable as the
/// payload of an executed transaction.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalletAction {
    AddOwner(Address),
    RemoveOwner(Address),
    ReplaceOwner(Address, Address),
    ChangeThreshold(u32),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalletCall {
    Contract(ContractCall),
    Wallet(WalletAction),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub submitter: Address,
    pub call: WalletCall,
    pub value: i128,
    pub submitted_at: u64,
    pub executed: bool,
}
