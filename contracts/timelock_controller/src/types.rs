use soroban_sdk::{contracttype, Address, BytesN, Symbol, Val, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    MinDelay,
    OpenExecution,
    ValueAsset,
    Role(Role, Address),
    Operation(BytesN<32>),
}

/// Independent membership sets; holding one role implies nothing about the others.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Admin = 0,
    Proposer = 1,
    Executor = 2,
}

/// A call into another contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContractCall {
    pub contract: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
}

/// Changes the controller applies to itself when a scheduled operation
/// targeting it matures and is executed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControllerAction {
    UpdateDelay(u64),
    GrantRole(Role, Address),
    RevokeRole(Role, Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Contract(ContractCall),
    Controller(ControllerAction),
}

/// The hashed content of a single-call operation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Operation {
    pub target: Target,
    pub value: i128,
    pub predecessor: BytesN<32>,
    pub salt: BytesN<32>,
}

/// The hashed content of a batch operation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationBatch {
    pub targets: Vec<Target>,
    pub values: Vec<i128>,
    pub predecessor: BytesN<32>,
    pub salt: BytesN<32>,
}

/// What is stored per operation id. The lifecycle state is never stored; it
/// is derived from these fields and the ledger clock.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperationRecord {
    pub scheduled_at: u64,
    pub ready_at: u64,
    pub done: bool,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum OperationState {
    Unset = 0,
    Waiting = 1,
    Ready = 2,
    Done = 3,
}
