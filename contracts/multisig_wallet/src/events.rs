use soroban_sdk::{contractevent, Address};

#[contractevent(topics = ["multisig", "initialized"])]
pub struct WalletInitialized {
    pub owner_count: u32,
    pub threshold: u32,
}

#[contractevent(topics = ["multisig", "submit"])]
pub struct TransactionSubmitted {
    pub tx_id: u64,
    pub owner: Address,
    pub value: i128,
}

#[contractevent(topics = ["multisig", "confirm"])]
pub struct TransactionConfirmed {
    pub tx_id: u64,
    pub owner: Address,
}

#[contractevent(topics = ["multisig", "revoke"])]
pub struct ConfirmationRevoked {
    pub tx_id: u64,
    pub owner: Address,
}

#[contractevent(topics = ["multisig", "execute"])]
pub struct TransactionExecuted {
    pub tx_id: u64,
    pub owner: Address,
}

#[contractevent(topics = ["multisig", "owner_add"])]
pub struct OwnerAdded {
    pub tx_id: u64,
    pub owner: Address,
}

#[contractevent(topics = ["multisig", "owner_rm"])]
pub struct OwnerRemoved {
    pub tx_id: u64,
    pub owner: Address,
}

#[contractevent(topics = ["multisig", "threshold"])]
pub struct ThresholdChanged {
    pub tx_id: u64,
    pub old: u32,
    pub new: u32,
}
