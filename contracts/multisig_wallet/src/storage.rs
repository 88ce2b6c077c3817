use soroban_sdk::{Address, Env, Vec};

use crate::types::{DataKey, Transaction};

// Ledger counts, roughly one day / five days and one week / two months at 5s per ledger.
const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn owners(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::Owners)
        .unwrap_or(Vec::new(env))
}

pub fn set_owners(env: &Env, owners: &Vec<Address>) {
    env.storage().instance().set(&DataKey::Owners, owners);
}

pub fn is_owner(env: &Env, owner: &Address) -> bool {
    env.storage().instance().has(&DataKey::Owner(owner.clone()))
}

/// Membership generation of an address. It moves forward every time the
/// address joins the owner set, so confirmations from an earlier membership
/// never match again.
pub fn owner_epoch(env: &Env, owner: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&DataKey::OwnerEpoch(owner.clone()))
        .unwrap_or(0)
}

pub fn admit_owner(env: &Env, owner: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Owner(owner.clone()), &true);

    let key = DataKey::OwnerEpoch(owner.clone());
    let epoch = owner_epoch(env, owner).saturating_add(1);
    env.storage().persistent().set(&key, &epoch);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn dismiss_owner(env: &Env, owner: &Address) {
    env.storage()
        .instance()
        .remove(&DataKey::Owner(owner.clone()));
}

pub fn threshold(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Threshold).unwrap_or(0)
}

pub fn transaction_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::TransactionCount)
        .unwrap_or(0u64)
}

pub fn load_transaction(env: &Env, tx_id: u64) -> Option<Transaction> {
    env.storage().persistent().get(&DataKey::Transaction(tx_id))
}

pub fn save_transaction(env: &Env, tx: &Transaction) {
    let key = DataKey::Transaction(tx.id);
    env.storage().persistent().set(&key, tx);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// True only for a confirmation given during the owner's current membership.
pub fn is_confirmed(env: &Env, tx_id: u64, owner: &Address) -> bool {
    let given: Option<u32> = env
        .storage()
        .persistent()
        .get(&DataKey::Confirmation(tx_id, owner.clone()));
    given == Some(owner_epoch(env, owner))
}

pub fn set_confirmed(env: &Env, tx_id: u64, owner: &Address) {
    let key = DataKey::Confirmation(tx_id, owner.clone());
    env.storage().persistent().set(&key, &owner_epoch(env, owner));
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn clear_confirmed(env: &Env, tx_id: u64, owner: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Confirmation(tx_id, owner.clone()));
}

/// Confirmations held by the current owner set. An owner removed after
/// confirming no longer counts, and does not count again if re-added.
pub fn confirmations(env: &Env, tx_id: u64) -> Vec<Address> {
    let mut confirmed = Vec::new(env);
    for owner in owners(env) {
        if is_confirmed(env, tx_id, &owner) {
            confirmed.push_back(owner);
        }
    }
    confirmed
}
