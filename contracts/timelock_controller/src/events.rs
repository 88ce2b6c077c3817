use soroban_sdk::{contractevent, Address, BytesN};

use crate::types::Role;

#[contractevent(topics = ["timelock", "initialized"])]
pub struct TimelockInitialized {
    pub min_delay: u64,
    pub open_execution: bool,
}

#[contractevent(topics = ["timelock", "scheduled"])]
pub struct OperationScheduled {
    pub id: BytesN<32>,
    pub proposer: Address,
    pub calls: u32,
    pub predecessor: BytesN<32>,
    pub delay: u64,
    pub ready_at: u64,
}

#[contractevent(topics = ["timelock", "cancelled"])]
pub struct OperationCancelled {
    pub id: BytesN<32>,
    pub proposer: Address,
}

#[contractevent(topics = ["timelock", "executed"])]
pub struct OperationExecuted {
    pub id: BytesN<32>,
    pub executor: Address,
    pub calls: u32,
}

#[contractevent(topics = ["timelock", "min_delay"])]
pub struct MinDelayChanged {
    pub operation: BytesN<32>,
    pub executor: Address,
    pub old: u64,
    pub new: u64,
}

#[contractevent(topics = ["timelock", "role_grant"])]
pub struct RoleGranted {
    pub role: Role,
    pub account: Address,
    pub sender: Address,
    /// Set when the change was applied by an executed operation.
    pub operation: Option<BytesN<32>>,
}

#[contractevent(topics = ["timelock", "role_revoke"])]
pub struct RoleRevoked {
    pub role: Role,
    pub account: Address,
    pub sender: Address,
    /// Set when the change was applied by an executed operation.
    pub operation: Option<BytesN<32>>,
}
