#![no_std]

mod errors;
mod events;
mod storage;
mod timelock;
mod types;

pub use errors::{ErrorKind, TimelockError};
pub use timelock::{TimelockController, TimelockControllerClient};
pub use types::{
    ContractCall, ControllerAction, Operation, OperationBatch, OperationRecord, OperationState,
    Role, Target,
};

mod test_pipeline;
