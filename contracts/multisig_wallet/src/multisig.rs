use soroban_sdk::{contract, contractimpl, log, panic_with_error, token, Address, Env, Val, Vec};

use crate::errors::MultisigError;
use crate::events::{
    ConfirmationRevoked, OwnerAdded, OwnerRemoved, ThresholdChanged, TransactionConfirmed,
    TransactionExecuted, TransactionSubmitted, WalletInitialized,
};
use crate::storage;
use crate::types::{ContractCall, DataKey, Transaction, WalletAction, WalletCall, MAX_OWNERS};

#[contract]
pub struct MultiSigWallet;

#[contractimpl]
impl MultiSigWallet {
    /// Sets up the owner set and confirmation threshold.
    ///
    /// `value_asset` is the token used to attach value to outgoing calls. A
    /// wallet without one can only submit zero-value transactions.
    pub fn initialize(
        env: Env,
        owners: Vec<Address>,
        threshold: u32,
        value_asset: Option<Address>,
    ) {
        if env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(&env, MultisigError::AlreadyInitialized);
        }

        if owners.is_empty() {
            panic_with_error!(&env, MultisigError::EmptyOwnersList);
        }

        if owners.len() > MAX_OWNERS {
            panic_with_error!(&env, MultisigError::TooManyOwners);
        }

        if threshold == 0 {
            panic_with_error!(&env, MultisigError::InvalidThreshold);
        }

        if threshold > owners.len() {
            panic_with_error!(&env, MultisigError::ThresholdExceedsOwners);
        }

        for owner in owners.iter() {
            if storage::is_owner(&env, &owner) {
                panic_with_error!(&env, MultisigError::DuplicateOwner);
            }
            storage::admit_owner(&env, &owner);
        }

        storage::set_owners(&env, &owners);
        env.storage().instance().set(&DataKey::Threshold, &threshold);
        env.storage().instance().set(&DataKey::TransactionCount, &0u64);
        if let Some(asset) = value_asset {
            env.storage().instance().set(&DataKey::ValueAsset, &asset);
        }
        env.storage().instance().set(&DataKey::Initialized, &true);
        storage::bump_instance(&env);

        WalletInitialized {
            owner_count: owners.len(),
            threshold,
        }
        .publish(&env);
    }

    /// Appends a transaction to the ledger and returns its id. The submitter
    /// does not implicitly confirm it.
    pub fn submit_transaction(env: Env, owner: Address, call: WalletCall, value: i128) -> u64 {
        Self::require_initialized(&env);
        owner.require_auth();
        Self::require_owner(&env, &owner);
        Self::check_value(&env, &call, value);

        let tx_id = storage::transaction_count(&env);
        let tx = Transaction {
            id: tx_id,
            submitter: owner.clone(),
            call,
            value,
            submitted_at: env.ledger().timestamp(),
            executed: false,
        };
        storage::save_transaction(&env, &tx);
        env.storage()
            .instance()
            .set(&DataKey::TransactionCount, &(tx_id + 1));
        storage::bump_instance(&env);

        log!(&env, "transaction {} submitted", tx_id);
        TransactionSubmitted { tx_id, owner, value }.publish(&env);

        tx_id
    }

    pub fn confirm_transaction(env: Env, owner: Address, tx_id: u64) {
        Self::require_initialized(&env);
        owner.require_auth();
        Self::require_owner(&env, &owner);

        let tx = Self::load_transaction(&env, tx_id);
        if tx.executed {
            panic_with_error!(&env, MultisigError::AlreadyExecuted);
        }

        if storage::is_confirmed(&env, tx_id, &owner) {
            panic_with_error!(&env, MultisigError::AlreadyConfirmed);
        }

        storage::set_confirmed(&env, tx_id, &owner);
        storage::bump_instance(&env);

        TransactionConfirmed { tx_id, owner }.publish(&env);
    }

    pub fn revoke_confirmation(env: Env, owner: Address, tx_id: u64) {
        Self::require_initialized(&env);
        owner.require_auth();
        Self::require_owner(&env, &owner);

        let tx = Self::load_transaction(&env, tx_id);
        if tx.executed {
            panic_with_error!(&env, MultisigError::AlreadyExecuted);
        }

        if !storage::is_confirmed(&env, tx_id, &owner) {
            panic_with_error!(&env, MultisigError::NotConfirmed);
        }

        storage::clear_confirmed(&env, tx_id, &owner);
        storage::bump_instance(&env);

        ConfirmationRevoked { tx_id, owner }.publish(&env);
    }

    /// Runs a transaction once enough current owners have confirmed it.
    ///
    /// The executed flag is written before the call goes out. Any failure
    /// afterwards, including a rejected amendment, aborts the invocation and
    /// the flag is rolled back with everything else.
    pub fn execute_transaction(env: Env, owner: Address, tx_id: u64) {
        Self::require_initialized(&env);
        owner.require_auth();
        Self::require_owner(&env, &owner);

        let mut tx = Self::load_transaction(&env, tx_id);
        if tx.executed {
            panic_with_error!(&env, MultisigError::AlreadyExecuted);
        }

        let confirmations = storage::confirmations(&env, tx_id).len();
        if confirmations < storage::threshold(&env) {
            panic_with_error!(&env, MultisigError::BelowThreshold);
        }

        tx.executed = true;
        storage::save_transaction(&env, &tx);

        match &tx.call {
            WalletCall::Contract(call) => Self::invoke(&env, call, tx.value),
            WalletCall::Wallet(action) => Self::apply(&env, tx_id, action),
        }
        storage::bump_instance(&env);

        log!(&env, "transaction {} executed", tx_id);
        TransactionExecuted { tx_id, owner }.publish(&env);
    }

    pub fn get_transaction(env: Env, tx_id: u64) -> Transaction {
        Self::require_initialized(&env);
        Self::load_transaction(&env, tx_id)
    }

    pub fn get_transaction_count(env: Env) -> u64 {
        Self::require_initialized(&env);
        storage::transaction_count(&env)
    }

    pub fn get_confirmation_count(env: Env, tx_id: u64) -> u32 {
        Self::require_initialized(&env);
        Self::load_transaction(&env, tx_id);
        storage::confirmations(&env, tx_id).len()
    }

    pub fn get_confirmations(env: Env, tx_id: u64) -> Vec<Address> {
        Self::require_initialized(&env);
        Self::load_transaction(&env, tx_id);
        storage::confirmations(&env, tx_id)
    }

    pub fn is_confirmed(env: Env, tx_id: u64, owner: Address) -> bool {
        Self::require_initialized(&env);
        storage::is_owner(&env, &owner) && storage::is_confirmed(&env, tx_id, &owner)
    }

    pub fn get_owners(env: Env) -> Vec<Address> {
        Self::require_initialized(&env);
        storage::owners(&env)
    }

    pub fn is_owner(env: Env, owner: Address) -> bool {
        Self::require_initialized(&env);
        storage::is_owner(&env, &owner)
    }

    pub fn owner_count(env: Env) -> u32 {
        Self::require_initialized(&env);
        storage::owners(&env).len()
    }

    pub fn threshold(env: Env) -> u32 {
        Self::require_initialized(&env);
        storage::threshold(&env)
    }

    pub fn value_asset(env: Env) -> Option<Address> {
        Self::require_initialized(&env);
        env.storage().instance().get(&DataKey::ValueAsset)
    }

    fn require_initialized(env: &Env) {
        if !env.storage().instance().has(&DataKey::Initialized) {
            panic_with_error!(env, MultisigError::NotInitialized);
        }
    }

    fn require_owner(env: &Env, owner: &Address) {
        if !storage::is_owner(env, owner) {
            panic_with_error!(env, MultisigError::NotOwner);
        }
    }

    fn load_transaction(env: &Env, tx_id: u64) -> Transaction {
        storage::load_transaction(env, tx_id)
            .unwrap_or_else(|| panic_with_error!(env, MultisigError::UnknownTransaction))
    }

    fn check_value(env: &Env, call: &WalletCall, value: i128) {
        if value < 0 {
            panic_with_error!(env, MultisigError::InvalidValue);
        }
        if value == 0 {
            return;
        }
        match call {
            WalletCall::Wallet(_) => panic_with_error!(env, MultisigError::InvalidValue),
            WalletCall::Contract(_) => {
                if !env.storage().instance().has(&DataKey::ValueAsset) {
                    panic_with_error!(env, MultisigError::ValueAssetNotSet);
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
                .unwrap_or_else(|| panic_with_error!(env, MultisigError::ValueAssetNotSet));
            let token_client = token::Client::new(env, &asset);
            let sent =
                token_client.try_transfer(&env.current_contract_address(), &call.contract, &value);
            if !matches!(sent, Ok(Ok(()))) {
                panic_with_error!(env, MultisigError::TargetCallFailed);
            }
        }

        let result = env.try_invoke_contract::<Val, MultisigError>(
            &call.contract,
            &call.function,
            call.args.clone(),
        );
        if !matches!(result, Ok(Ok(_))) {
            log!(env, "call to {} failed", call.function);
            panic_with_error!(env, MultisigError::TargetCallFailed);
        }
    }

    fn apply(env: &Env, tx_id: u64, action: &WalletAction) {
        match action {
            WalletAction::AddOwner(owner) => Self::add_owner(env, tx_id, owner),
            WalletAction::RemoveOwner(owner) => Self::remove_owner(env, tx_id, owner),
            WalletAction::ReplaceOwner(old, new) => Self::replace_owner(env, tx_id, old, new),
            WalletAction::ChangeThreshold(threshold) => {
                Self::change_threshold(env, tx_id, *threshold)
            }
        }
    }

    fn add_owner(env: &Env, tx_id: u64, owner: &Address) {
        if storage::is_owner(env, owner) {
            panic_with_error!(env, MultisigError::DuplicateOwner);
        }

        let mut owners = storage::owners(env);
        if owners.len() >= MAX_OWNERS {
            panic_with_error!(env, MultisigError::TooManyOwners);
        }

        owners.push_back(owner.clone());
        storage::set_owners(env, &owners);
        storage::admit_owner(env, owner);

        OwnerAdded {
            tx_id,
            owner: owner.clone(),
        }
        .publish(env);
    }

    fn remove_owner(env: &Env, tx_id: u64, owner: &Address) {
        let mut owners = storage::owners(env);
        let index = owners
            .first_index_of(owner)
            .unwrap_or_else(|| panic_with_error!(env, MultisigError::OwnerNotFound));

        if owners.len() - 1 < storage::threshold(env) {
            panic_with_error!(env, MultisigError::ThresholdExceedsOwners);
        }

        owners.remove(index);
        storage::set_owners(env, &owners);
        storage::dismiss_owner(env, owner);

        OwnerRemoved {
            tx_id,
            owner: owner.clone(),
        }
        .publish(env);
    }

    fn replace_owner(env: &Env, tx_id: u64, old: &Address, new: &Address) {
        let mut owners = storage::owners(env);
        let index = owners
            .first_index_of(old)
            .unwrap_or_else(|| panic_with_error!(env, MultisigError::OwnerNotFound));

        if storage::is_owner(env, new) {
            panic_with_error!(env, MultisigError::DuplicateOwner);
        }

        // Same slot, so owner order stays stable.
        owners.set(index, new.clone());
        storage::set_owners(env, &owners);
        storage::dismiss_owner(env, old);
        storage::admit_owner(env, new);

        OwnerRemoved {
            tx_id,
            owner: old.clone(),
        }
        .publish(env);
        OwnerAdded {
            tx_id,
            owner: new.clone(),
        }
        .publish(env);
    }

    fn change_threshold(env: &Env, tx_id: u64, threshold: u32) {
        if threshold == 0 {
            panic_with_error!(env, MultisigError::InvalidThreshold);
        }

        if threshold > storage::owners(env).len() {
            panic_with_error!(env, MultisigError::ThresholdExceedsOwners);
        }

        let old = storage::threshold(env);
        env.storage().instance().set(&DataKey::Threshold, &threshold);

        ThresholdChanged {
            tx_id,
            old,
            new: threshold,
        }
        .publish(env);
    }
}
