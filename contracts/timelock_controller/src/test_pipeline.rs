#![cfg(test)]

//! A wallet that proposes to and executes through the controller, which in
//! turn drives a downstream contract.

use super::*;
use multisig_wallet::{
    ContractCall as WalletContractCall, MultiSigWallet, MultiSigWalletClient, MultisigError,
    WalletCall,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    vec, Address, BytesN, Env, Error, IntoVal, Symbol, Val, Vec,
};

mod target {
    use soroban_sdk::{contract, contractimpl, symbol_short, Env, Symbol};

    const COUNT: Symbol = symbol_short!("COUNT");

    #[contract]
    pub struct Counter;

    #[contractimpl]
    impl Counter {
        pub fn bump(env: Env, by: u32) -> u32 {
            let count: u32 = env.storage().instance().get(&COUNT).unwrap_or(0) + by;
            env.storage().instance().set(&COUNT, &count);
            count
        }

        pub fn count(env: Env) -> u32 {
            env.storage().instance().get(&COUNT).unwrap_or(0)
        }
    }
}

use target::{Counter, CounterClient};

const MIN_DELAY: u64 = 10;

struct Pipeline<'a> {
    env: &'a Env,
    wallet: MultiSigWalletClient<'a>,
    timelock: TimelockControllerClient<'a>,
    owners: Vec<Address>,
    counter: Address,
}

impl<'a> Pipeline<'a> {
    fn new(env: &'a Env) -> Self {
        env.mock_all_auths();
        env.ledger().set_timestamp(1_000);

        let wallet_id = env.register(MultiSigWallet, ());
        let wallet = MultiSigWalletClient::new(env, &wallet_id);
        let owners = vec![
            env,
            Address::generate(env),
            Address::generate(env),
            Address::generate(env),
        ];
        wallet.initialize(&owners, &2, &None);

        let timelock_id = env.register(TimelockController, ());
        let timelock = TimelockControllerClient::new(env, &timelock_id);
        timelock.initialize(
            &MIN_DELAY,
            &vec![env, wallet_id.clone()],
            &vec![env, wallet_id.clone(), owners.get_unchecked(0)],
            &Some(wallet_id),
            &false,
            &None,
        );

        Pipeline {
            env,
            wallet,
            timelock,
            owners,
            counter: env.register(Counter, ()),
        }
    }

    fn bump(&self, by: u32) -> Target {
        let args: Vec<Val> = vec![self.env, by.into_val(self.env)];
        Target::Contract(ContractCall {
            contract: self.counter.clone(),
            function: Symbol::new(self.env, "bump"),
            args,
        })
    }

    /// Wallet transaction calling `function` on the controller with the wallet
    /// as the acting proposer or executor.
    fn controller_call(&self, function: &str, mut args: Vec<Val>) -> WalletCall {
        args.push_front(self.wallet.address.into_val(self.env));
        WalletCall::Contract(WalletContractCall {
            contract: self.timelock.address.clone(),
            function: Symbol::new(self.env, function),
            args,
        })
    }

    fn schedule_call(&self, target: &Target, salt: &BytesN<32>, delay: u64) -> WalletCall {
        let args: Vec<Val> = vec![
            self.env,
            target.into_val(self.env),
            0i128.into_val(self.env),
            no_predecessor(self.env).into_val(self.env),
            salt.into_val(self.env),
            delay.into_val(self.env),
        ];
        self.controller_call("schedule", args)
    }

    fn execute_call(&self, target: &Target, salt: &BytesN<32>) -> WalletCall {
        let args: Vec<Val> = vec![
            self.env,
            target.into_val(self.env),
            0i128.into_val(self.env),
            no_predecessor(self.env).into_val(self.env),
            salt.into_val(self.env),
        ];
        self.controller_call("execute", args)
    }

    /// Submits with the first owner and confirms with the second.
    fn approve(&self, call: &WalletCall) -> u64 {
        let tx_id = self
            .wallet
            .submit_transaction(&self.owners.get_unchecked(0), call, &0);
        self.wallet
            .confirm_transaction(&self.owners.get_unchecked(0), &tx_id);
        self.wallet
            .confirm_transaction(&self.owners.get_unchecked(1), &tx_id);
        tx_id
    }

    fn run(&self, call: &WalletCall) -> u64 {
        let tx_id = self.approve(call);
        self.wallet
            .execute_transaction(&self.owners.get_unchecked(2), &tx_id);
        tx_id
    }

    fn advance(&self, seconds: u64) {
        let now = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(now + seconds);
    }

    fn count(&self) -> u32 {
        CounterClient::new(self.env, &self.counter).count()
    }
}

fn no_predecessor(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

fn salt(env: &Env, n: u8) -> BytesN<32> {
    BytesN::from_array(env, &[n; 32])
}

/// Error value a `try_*` client call reports for a contract panic.
fn contract_error(err: MultisigError) -> Error {
    Error::from_contract_error(err as u32)
}

#[test]
fn test_wallet_schedules_and_executes_through_controller() {
    let env = Env::default();
    let p = Pipeline::new(&env);
    let target = p.bump(7);
    let s = salt(&env, 1);
    let id = p
        .timelock
        .hash_operation(&target, &0, &no_predecessor(&env), &s);

    let scheduled = p.run(&p.schedule_call(&target, &s, MIN_DELAY));
    assert!(p.wallet.get_transaction(&scheduled).executed);
    assert_eq!(p.timelock.get_operation_state(&id), OperationState::Waiting);
    assert_eq!(p.count(), 0);

    // Executing early fails downstream and the wallet transaction stays open.
    let early = p.approve(&p.execute_call(&target, &s));
    assert_eq!(
        p.wallet
            .try_execute_transaction(&p.owners.get_unchecked(2), &early),
        Err(Ok(contract_error(MultisigError::TargetCallFailed)))
    );
    assert!(!p.wallet.get_transaction(&early).executed);

    p.advance(MIN_DELAY);
    assert_eq!(p.timelock.get_operation_state(&id), OperationState::Ready);

    p.wallet
        .execute_transaction(&p.owners.get_unchecked(2), &early);
    assert!(p.wallet.get_transaction(&early).executed);
    assert_eq!(p.timelock.get_operation_state(&id), OperationState::Done);
    assert_eq!(p.count(), 7);
}

#[test]
fn test_owner_executes_wallet_scheduled_operation() {
    let env = Env::default();
    let p = Pipeline::new(&env);
    let target = p.bump(2);
    let s = salt(&env, 2);
    let pred = no_predecessor(&env);

    p.run(&p.schedule_call(&target, &s, MIN_DELAY + 5));
    p.advance(MIN_DELAY + 5);

    // The first owner holds the executor role directly.
    p.timelock
        .execute(&p.owners.get_unchecked(0), &target, &0, &pred, &s);
    assert_eq!(p.count(), 2);
}

#[test]
fn test_under_delay_schedule_leaves_wallet_transaction_pending() {
    let env = Env::default();
    let p = Pipeline::new(&env);
    let target = p.bump(1);
    let s = salt(&env, 3);
    let id = p
        .timelock
        .hash_operation(&target, &0, &no_predecessor(&env), &s);

    let tx_id = p.approve(&p.schedule_call(&target, &s, MIN_DELAY - 1));
    assert_eq!(
        p.wallet
            .try_execute_transaction(&p.owners.get_unchecked(2), &tx_id),
        Err(Ok(contract_error(MultisigError::TargetCallFailed)))
    );

    assert!(!p.wallet.get_transaction(&tx_id).executed);
    assert_eq!(p.wallet.get_confirmation_count(&tx_id), 2);
    assert_eq!(p.timelock.get_operation_state(&id), OperationState::Unset);
}

#[test]
fn test_wallet_updates_delay_through_controller() {
    let env = Env::default();
    let p = Pipeline::new(&env);
    let target = Target::Controller(ControllerAction::UpdateDelay(5));
    let s = salt(&env, 4);

    p.run(&p.schedule_call(&target, &s, MIN_DELAY));
    p.advance(MIN_DELAY);
    p.run(&p.execute_call(&target, &s));

    assert_eq!(p.timelock.get_min_delay(), 5);
}

#[test]
fn test_wallet_cancels_waiting_operation() {
    let env = Env::default();
    let p = Pipeline::new(&env);
    let target = p.bump(1);
    let s = salt(&env, 5);
    let id = p
        .timelock
        .hash_operation(&target, &0, &no_predecessor(&env), &s);

    p.run(&p.schedule_call(&target, &s, MIN_DELAY));
    let args: Vec<Val> = vec![&env, id.into_val(&env)];
    p.run(&p.controller_call("cancel", args));

    assert_eq!(p.timelock.get_operation_state(&id), OperationState::Unset);
}
