use soroban_sdk::{
    contract, contractimpl, log, panic_with_error, token, vec, xdr::ToXdr, Address, BytesN, Env,
    Val, Vec,
};

use crate::errors::TimelockError;
use crate::events::{
    MinDelayChanged, OperationCancelled, OperationExecuted, OperationScheduled, RoleGranted,
    RoleRevoked, TimelockInitialized,
};
use crate::storage;
use crate::types::{
    ContractCall, ControllerAction, DataKey, Operation, OperationBatch, OperationRecord,
    OperationState, Role, Target,
};

#[contract]
pub struct TimelockController;

#[contractimpl]
impl TimelockController {
    /// Sets the minimum delay and the initial role holders.
    ///
    /// The controller always administers itself, so role and delay changes
    /// can be scheduled against it. `admin` is an optional extra administrator
    /// that may grant and revoke roles without waiting for a delay. With
    /// `open_execution` set, any authorized caller may execute a ready
    /// operation.
    pub fn initialize(
        env: Env,
        min_delay: u64,
        proposers: Vec<Address>,
        executors: Vec<Address>,
        admin: Option<Address>,
        open_execution: bool,
        value_asset: Option<Address>,
    ) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, TimelockError::AlreadyInitialized);
        }

        let this = env.current_contract_address();
        Self::grant(&env, Role::Admin, &this, &this, None);
        if let Some(admin) = admin {
            Self::grant(&env, Role::Admin, &admin, &this, None);
        }
        for proposer in proposers.iter() {
            Self::grant(&env, Role::Proposer, &proposer, &this, None);
        }
        for executor in executors.iter() {
            Self::grant(&env, Role::Executor, &executor, &this, None);
        }

        env.storage().instance().set(&DataKey::MinDelay, &min_delay);
        env.storage()
            .instance()
            .set(&DataKey::OpenExecution, &open_execution);
        if let Some(asset) = value_asset {
            env.storage().instance().set(&DataKey::ValueAsset, &asset);
        }
        env.storage().instance().set(&DataKey::Initialized, &true);
        storage::bump_instance(&env);

        TimelockInitialized {
            min_delay,
            open_execution,
        }
        .publish(&env);
    }

    /// Schedules a single call and returns its operation id.
    pub fn schedule(
        env: Env,
        proposer: Address,
        target: Target,
        value: i128,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
        delay: u64,
    ) -> BytesN<32> {
        let id = Self::hash(&env, &target, value, &predecessor, &salt);
        let targets = vec![&env, target];
        let values = vec![&env, value];
        Self::schedule_operation(&env, &proposer, &id, &targets, &values, &predecessor, delay);
        id
    }

    /// Schedules several calls under one operation id. They execute in order
    /// and together.
    pub fn schedule_batch(
        env: Env,
        proposer: Address,
        targets: Vec<Target>,
        values: Vec<i128>,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
        delay: u64,
    ) -> BytesN<32> {
        Self::check_lengths(&env, &targets, &values);
        let id = Self::hash_batch(&env, &targets, &values, &predecessor, &salt);
        Self::schedule_operation(&env, &proposer, &id, &targets, &values, &predecessor, delay);
        id
    }

    /// Drops a waiting operation. Ready and done operations cannot be cancelled.
    pub fn cancel(env: Env, proposer: Address, id: BytesN<32>) {
        Self::require_initialized(&env);
        proposer.require_auth();
        Self::require_role(&env, Role::Proposer, &proposer, TimelockError::NotProposer);

        if Self::state(&env, &id) != OperationState::Waiting {
            panic_with_error!(&env, TimelockError::OperationNotWaiting);
        }

        storage::remove_operation(&env, &id);
        storage::bump_instance(&env);

        log!(&env, "operation cancelled");
        OperationCancelled { id, proposer }.publish(&env);
    }

    /// Executes a ready operation. The id is recomputed from the arguments.
    pub fn execute(
        env: Env,
        executor: Address,
        target: Target,
        value: i128,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
    ) {
        let id = Self::hash(&env, &target, value, &predecessor, &salt);
        let targets = vec![&env, target];
        let values = vec![&env, value];
        Self::execute_operation(&env, &executor, &id, &targets, &values, &predecessor);
    }

    pub fn execute_batch(
        env: Env,
        executor: Address,
        targets: Vec<Target>,
        values: Vec<i128>,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
    ) {
        Self::check_lengths(&env, &targets, &values);
        let id = Self::hash_batch(&env, &targets, &values, &predecessor, &salt);
        Self::execute_operation(&env, &executor, &id, &targets, &values, &predecessor);
    }

    pub fn grant_role(env: Env, admin: Address, role: Role, account: Address) {
        Self::require_initialized(&env);
        admin.require_auth();
        Self::require_role(&env, Role::Admin, &admin, TimelockError::NotAdmin);

        Self::grant(&env, role, &account, &admin, None);
        storage::bump_instance(&env);
    }

    pub fn revoke_role(env: Env, admin: Address, role: Role, account: Address) {
        Self::require_initialized(&env);
        admin.require_auth();
        Self::require_role(&env, Role::Admin, &admin, TimelockError::NotAdmin);

        Self::revoke(&env, role, &account, &admin, None);
        storage::bump_instance(&env);
    }

    /// Lets an account give up one of its own roles.
    pub fn renounce_role(env: Env, account: Address, role: Role) {
        Self::require_initialized(&env);
        account.require_auth();

        Self::revoke(&env, role, &account, &account, None);
        storage::bump_instance(&env);
    }

    pub fn hash_operation(
        env: Env,
        target: Target,
        value: i128,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
    ) -> BytesN<32> {
        Self::hash(&env, &target, value, &predecessor, &salt)
    }

    pub fn hash_operation_batch(
        env: Env,
        targets: Vec<Target>,
        values: Vec<i128>,
        predecessor: BytesN<32>,
        salt: BytesN<32>,
    ) -> BytesN<32> {
        Self::hash_batch(&env, &targets, &values, &predecessor, &salt)
    }

    pub fn get_operation_state(env: Env, id: BytesN<32>) -> OperationState {
        Self::state(&env, &id)
    }

    pub fn is_operation(env: Env, id: BytesN<32>) -> bool {
        Self::state(&env, &id) != OperationState::Unset
    }

    /// Waiting or ready.
    pub fn is_operation_pending(env: Env, id: BytesN<32>) -> bool {
        matches!(
            Self::state(&env, &id),
            OperationState::Waiting | OperationState::Ready
        )
    }

    pub fn is_operation_ready(env: Env, id: BytesN<32>) -> bool {
        Self::state(&env, &id) == OperationState::Ready
    }

    pub fn is_operation_done(env: Env, id: BytesN<32>) -> bool {
        Self::state(&env, &id) == OperationState::Done
    }

    /// Timestamp at which the operation becomes ready, or 0 if it is unset.
    pub fn get_timestamp(env: Env, id: BytesN<32>) -> u64 {
        storage::load_operation(&env, &id)
            .map(|record| record.ready_at)
            .unwrap_or(0)
    }

    /// Timestamp at which the operation was scheduled, or 0 if it is unset.
    pub fn get_scheduled_at(env: Env, id: BytesN<32>) -> u64 {
        storage::load_operation(&env, &id)
            .map(|record| record.scheduled_at)
            .unwrap_or(0)
    }

    pub fn get_min_delay(env: Env) -> u64 {
        Self::require_initialized(&env);
        storage::min_delay(&env)
    }

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        storage::has_role(&env, role, &account)
    }

    pub fn is_open_execution(env: Env) -> bool {
        Self::require_initialized(&env);
        env.storage()
            .instance()
            .get(&DataKey::OpenExecution)
            .unwrap_or(false)
    }

    pub fn value_asset(env: Env) -> Option<Address> {
        Self::require_initialized(&env);
        env.storage().instance().get(&DataKey::ValueAsset)
    }

    fn require_initialized(env: &Env) {
        if !env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(env, TimelockError::NotInitialized);
        }
    }

    fn require_role(env: &Env, role: Role, account: &Address, error: TimelockError) {
        if !storage::has_role(env, role, account) {
            panic_with_error!(env, error);
        }
    }

    fn check_lengths(env: &Env, targets: &Vec<Target>, values: &Vec<i128>) {
        if targets.is_empty() || targets.len() != values.len() {
            panic_with_error!(env, TimelockError::InvalidOperationLength);
        }
    }

    fn hash(
        env: &Env,
        target: &Target,
        value: i128,
        predecessor: &BytesN<32>,
        salt: &BytesN<32>,
    ) -> BytesN<32> {
        let operation = Operation {
            target: target.clone(),
            value,
            predecessor: predecessor.clone(),
            salt: salt.clone(),
        };
        env.crypto().sha256(&operation.to_xdr(env)).to_bytes()
    }

    fn hash_batch(
        env: &Env,
        targets: &Vec<Target>,
        values: &Vec<i128>,
        predecessor: &BytesN<32>,
        salt: &BytesN<32>,
    ) -> BytesN<32> {
        let batch = OperationBatch {
            targets: targets.clone(),
            values: values.clone(),
            predecessor: predecessor.clone(),
            salt: salt.clone(),
        };
        env.crypto().sha256(&batch.to_xdr(env)).to_bytes()
    }

    fn state(env: &Env, id: &BytesN<32>) -> OperationState {
        match storage::load_operation(env, id) {
            None => OperationState::Unset,
            Some(record) if record.done => OperationState::Done,
            Some(record) if env.ledger().timestamp() < record.ready_at => OperationState::Waiting,
            Some(_) => OperationState::Ready,
        }
    }

    fn is_no_predecessor(predecessor: &BytesN<32>) -> bool {
        predecessor.to_array() == [0u8; 32]
    }

    fn schedule_operation(
        env: &Env,
        proposer: &Address,
        id: &BytesN<32>,
        targets: &Vec<Target>,
        values: &Vec<i128>,
        predecessor: &BytesN<32>,
        delay: u64,
    ) {
        Self::require_initialized(env);
        proposer.require_auth();
        Self::require_role(env, Role::Proposer, proposer, TimelockError::NotProposer);

        for (target, value) in targets.iter().zip(values.iter()) {
            Self::check_value(env, &target, value);
        }

        if delay < storage::min_delay(env) {
            panic_with_error!(env, TimelockError::DelayTooShort);
        }

        if storage::load_operation(env, id).is_some() {
            panic_with_error!(env, TimelockError::AlreadyScheduled);
        }

        let now = env.ledger().timestamp();
        // An absurd delay saturates and the operation simply never matures.
        let ready_at = now.saturating_add(delay);
        storage::save_operation(
            env,
            id,
            &OperationRecord {
                scheduled_at: now,
                ready_at,
                done: false,
            },
        );
        storage::bump_instance(env);

        OperationScheduled {
            id: id.clone(),
            proposer: proposer.clone(),
            calls: targets.len(),
            predecessor: predecessor.clone(),
            delay,
            ready_at,
        }
        .publish(env);
    }

    fn execute_operation(
        env: &Env,
        executor: &Address,
        id: &BytesN<32>,
        targets: &Vec<Target>,
        values: &Vec<i128>,
        predecessor: &BytesN<32>,
    ) {
        Self::require_initialized(env);
        executor.require_auth();
        let open: bool = env
            .storage()
            .instance()
            .get(&DataKey::OpenExecution)
            .unwrap_or(false);
        if !open {
            Self::require_role(env, Role::Executor, executor, TimelockError::NotExecutor);
        }

        if Self::state(env, id) != OperationState::Ready {
            panic_with_error!(env, TimelockError::NotReady);
        }

        if !Self::is_no_predecessor(predecessor)
            && Self::state(env, predecessor) != OperationState::Done
        {
            panic_with_error!(env, TimelockError::PredecessorNotDone);
        }

        // Done is recorded before any call goes out; a failing call rolls it back.
        let mut record = storage::load_operation(env, id)
            .unwrap_or_else(|| panic_with_error!(env, TimelockError::NotReady));
        record.done = true;
        storage::save_operation(env, id, &record);

        for (target, value) in targets.iter().zip(values.iter()) {
            match target {
                Target::Contract(call) => Self::invoke(env, &call, value),
                Target::Controller(action) => Self::apply(env, id, executor, &action),
            }
        }
        storage::bump_instance(env);

        log!(env, "operation executed with {} calls", targets.len());
        OperationExecuted {
            id: id.clone(),
            executor: executor.clone(),
            calls: targets.len(),
        }
        .publish(env);
    }

    fn check_value(env: &Env, target: &Target, value: i128) {
        if value < 0 {
            panic_with_error!(env, TimelockError::InvalidValue);
        }
        if value == 0 {
            return;
        }
        match target {
            Target::Controller(_) => panic_with_error!(env, TimelockError::InvalidValue),
            Target::Contract(_) => {
                if !env.storage().instance().has(&DataKey::ValueAsset) {
                    panic_with_error!(env, TimelockError::ValueAssetNotSet);
                }
            }
        }
    }

    fn invoke(env: &Env, call: &ContractCall, value: i128) {
        if value > 0 {
            let asset: Address = env
                .storage()
                .instance()
                .get(&DataKey::ValueAsset)
                .unwrap_or_else(|| panic_with_error!(env, TimelockError::ValueAssetNotSet));
            let token_client = token::Client::new(env, &asset);
            let sent =
                token_client.try_transfer(&env.current_contract_address(), &call.contract, &value);
            if !matches!(sent, Ok(Ok(()))) {
                panic_with_error!(env, TimelockError::TargetCallFailed);
            }
        }

        let result = env.try_invoke_contract::<Val, TimelockError>(
            &call.contract,
            &call.function,
            call.args.clone(),
        );
        if !matches!(result, Ok(Ok(_))) {
            log!(env, "call to {} failed", call.function);
            panic_with_error!(env, TimelockError::TargetCallFailed);
        }
    }

    fn apply(env: &Env, id: &BytesN<32>, executor: &Address, action: &ControllerAction) {
        let operation = Some(id.clone());
        match action {
            ControllerAction::UpdateDelay(delay) => {
                let old = storage::min_delay(env);
                env.storage().instance().set(&DataKey::MinDelay, delay);
                MinDelayChanged {
                    operation: id.clone(),
                    executor: executor.clone(),
                    old,
                    new: *delay,
                }
                .publish(env);
            }
            ControllerAction::GrantRole(role, account) => {
                Self::grant(env, *role, account, executor, operation)
            }
            ControllerAction::RevokeRole(role, account) => {
                Self::revoke(env, *role, account, executor, operation)
            }
        }
    }

    fn grant(
        env: &Env,
        role: Role,
        account: &Address,
        sender: &Address,
        operation: Option<BytesN<32>>,
    ) {
        if storage::has_role(env, role, account) {
            return;
        }
        storage::set_role(env, role, account);
        RoleGranted {
            role,
            account: account.clone(),
            sender: sender.clone(),
            operation,
        }
        .publish(env);
    }

    fn revoke(
        env: &Env,
        role: Role,
        account: &Address,
        sender: &Address,
        operation: Option<BytesN<32>>,
    ) {
        if !storage::has_role(env, role, account) {
            return;
        }
        storage::remove_role(env, role, account);
        RoleRevoked {
            role,
            account: account.clone(),
            sender: sender.clone(),
            operation,
        }
        .publish(env);
    }
}
