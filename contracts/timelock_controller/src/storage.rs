use soroban_sdk::{Address, BytesN, Env};

use crate::types::{DataKey, OperationRecord, Role};

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn min_delay(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::MinDelay).unwrap_or(0)
}

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .instance()
        .has(&DataKey::Role(role, account.clone()))
}

pub fn set_role(env: &Env, role: Role, account: &Address) {
    env.storage()
        .instance()
        .set(&DataKey::Role(role, account.clone()), &true);
}

pub fn remove_role(env: &Env, role: Role, account: &Address) {
    env.storage()
        .instance()
        .remove(&DataKey::Role(role, account.clone()));
}

pub fn load_operation(env: &Env, id: &BytesN<32>) -> Option<OperationRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Operation(id.clone()))
}

pub fn save_operation(env: &Env, id: &BytesN<32>, record: &OperationRecord) {
    let key = DataKey::Operation(id.clone());
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub fn remove_operation(env: &Env, id: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::Operation(id.clone()));
}
