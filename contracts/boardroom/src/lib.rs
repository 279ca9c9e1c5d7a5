//! # Boardroom Contract
//!
//! Share holders stake into the boardroom and earn a pro-rata cut of every
//! seigniorage allocation. Rewards are tracked per reward token with a
//! cumulative reward-per-share accumulator and a per-member snapshot, so an
//! allocation is O(1) regardless of the number of members.
//!
//! Allocation is transfer-then-notify: the operator (the treasury) first moves
//! the reward tokens here, then calls `allocate_seigniorage` (Dollar) or
//! `allocate_seigniorage_peg_token` (any peg token). The boardroom only accepts
//! amounts covered by tokens it holds but has not yet accounted for.

#![no_std]

use soroban_sdk::{
    contract, contractimpl, contracttype, token::TokenClient, Address, Env, Symbol, Vec,
};


/// Fixed-point precision of the reward-per-share accumulator.
pub const REWARD_PRECISION: i128 = 1_000_000_000_000_000_000;

/// Reward accounting for a single reward token.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardState {
    /// Cumulative reward per staked share, scaled by `REWARD_PRECISION`.
    pub reward_per_share: i128,
    /// Allocated but not yet claimed.
    pub reserve: i128,
    /// Lifetime amount allocated.
    pub total_allocated: i128,
}

/// A member's position in one reward token's ledger.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemberSnapshot {
    pub reward_per_share_paid: i128,
    pub earned: i128,
}

#[contracttype]
pub enum DataKey {
    Operator,
    /// Token members stake.
    Share,
    /// Main reward token (Dollar).
    Dollar,
    /// Every token that has ever been allocated.
    RewardTokens,
    Reward(Address),
    TotalStaked,
    Stake(Address),
    Snapshot(Address, Address),
}

#[contract]
pub struct Boardroom;

#[contractimpl]
impl Boardroom {
    pub fn initialize(e: Env, operator: Address, share: Address, dollar: Address) {
        if e.storage().instance().has(&DataKey::Operator) {
            panic!("already initialized");
        }
        let storage = e.storage().instance();
        storage.set(&DataKey::Operator, &operator);
        storage.set(&DataKey::Share, &share);
        storage.set(&DataKey::Dollar, &dollar);
        let mut tokens: Vec<Address> = Vec::new(&e);
        tokens.push_back(dollar);
        storage.set(&DataKey::RewardTokens, &tokens);
        storage.set(&DataKey::TotalStaked, &0_i128);
    }

    pub fn operator(e: Env) -> Address {
        Self::read_operator(&e)
    }

    /// Hand the operator role over. Requires the current operator.
    pub fn set_operator(e: Env, new_operator: Address) {
        let operator = Self::read_operator(&e);
        operator.require_auth();
        e.storage().instance().set(&DataKey::Operator, &new_operator);
        e.events().publish(
            (Symbol::new(&e, "operator_transferred"),),
            (operator, new_operator),
        );
    }

    // ── Staking ────────────────────────────────────────────────────────────

    pub fn stake(e: Env, member: Address, amount: i128) {
        member.require_auth();
        if amount <= 0 {
            panic!("amount must be positive");
        }
        Self::settle_member(&e, &member);

        let share = Self::share_token(&e);
        TokenClient::new(&e, &share).transfer(&member, &e.current_contract_address(), &amount);

        let stake = Self::balance_of(e.clone(), member.clone()) + amount;
        e.storage()
            .persistent()
            .set(&DataKey::Stake(member.clone()), &stake);
        let total = Self::total_staked(e.clone()) + amount;
        e.storage().instance().set(&DataKey::TotalStaked, &total);

        e.events()
            .publish((Symbol::new(&e, "staked"), member), amount);
    }

    pub fn withdraw(e: Env, member: Address, amount: i128) {
        member.require_auth();
        if amount <= 0 {
            panic!("amount must be positive");
        }
        let stake = Self::balance_of(e.clone(), member.clone());
        if amount > stake {
            panic!("withdraw exceeds stake");
        }
        Self::settle_member(&e, &member);

        e.storage()
            .persistent()
            .set(&DataKey::Stake(member.clone()), &(stake - amount));
        let total = Self::total_staked(e.clone()) - amount;
        e.storage().instance().set(&DataKey::TotalStaked, &total);

        let share = Self::share_token(&e);
        TokenClient::new(&e, &share).transfer(&e.current_contract_address(), &member, &amount);

        e.events()
            .publish((Symbol::new(&e, "withdrawn"), member), amount);
    }

    /// Pay out everything `member` has earned in `token`.
    pub fn claim_reward(e: Env, member: Address, token: Address) -> i128 {
        member.require_auth();
        Self::settle_member(&e, &member);

        let key = DataKey::Snapshot(member.clone(), token.clone());
        let mut snapshot: MemberSnapshot = e.storage().persistent().get(&key).unwrap_or_default();
        let amount = snapshot.earned;
        if amount == 0 {
            return 0;
        }
        snapshot.earned = 0;
        e.storage().persistent().set(&key, &snapshot);

        let mut state = Self::reward_state(e.clone(), token.clone());
        state.reserve -= amount;
        e.storage()
            .persistent()
            .set(&DataKey::Reward(token.clone()), &state);

        TokenClient::new(&e, &token).transfer(&e.current_contract_address(), &member, &amount);
        e.events()
            .publish((Symbol::new(&e, "reward_paid"), member, token), amount);
        amount
    }

    // ── Allocation sinks ───────────────────────────────────────────────────

    /// Distribute `amount` Dollar, already transferred here, over all stakers.
    pub fn allocate_seigniorage(e: Env, amount: i128) {
        let dollar: Address = e
            .storage()
            .instance()
            .get(&DataKey::Dollar)
            .unwrap_or_else(|| panic!("not initialized"));
        Self::allocate(&e, dollar, amount);
    }

    /// Distribute `amount` of a peg token, already transferred here.
    pub fn allocate_seigniorage_peg_token(e: Env, token: Address, amount: i128) {
        Self::allocate(&e, token, amount);
    }

    // ── Views ──────────────────────────────────────────────────────────────

    pub fn earned(e: Env, member: Address, token: Address) -> i128 {
        let state = Self::reward_state(e.clone(), token.clone());
        let snapshot: MemberSnapshot = e
            .storage()
            .persistent()
            .get(&DataKey::Snapshot(member.clone(), token))
            .unwrap_or_default();
        let stake = Self::balance_of(e, member);
        snapshot.earned
            + stake * (state.reward_per_share - snapshot.reward_per_share_paid) / REWARD_PRECISION
    }

    pub fn reward_state(e: Env, token: Address) -> RewardState {
        e.storage()
            .persistent()
            .get(&DataKey::Reward(token))
            .unwrap_or_default()
    }

    pub fn reward_tokens(e: Env) -> Vec<Address> {
        e.storage()
            .instance()
            .get(&DataKey::RewardTokens)
            .unwrap_or_else(|| Vec::new(&e))
    }

    pub fn total_staked(e: Env) -> i128 {
        e.storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0)
    }

    pub fn balance_of(e: Env, member: Address) -> i128 {
        e.storage()
            .persistent()
            .get(&DataKey::Stake(member))
            .unwrap_or(0)
    }
}

impl Boardroom {
    fn read_operator(e: &Env) -> Address {
        e.storage()
            .instance()
            .get(&DataKey::Operator)
            .unwrap_or_else(|| panic!("not initialized"))
    }

    fn share_token(e: &Env) -> Address {
        e.storage()
            .instance()
            .get(&DataKey::Share)
            .unwrap_or_else(|| panic!("not initialized"))
    }

    fn allocate(e: &Env, token: Address, amount: i128) {
        Self::read_operator(e).require_auth();
        if amount <= 0 {
            panic!("amount must be positive");
        }
        let total = Self::total_staked(e.clone());
        if total == 0 {
            panic!("cannot allocate when no shares are staked");
        }

        let mut state = Self::reward_state(e.clone(), token.clone());
        let held = TokenClient::new(e, &token).balance(&e.current_contract_address());
        if held - state.reserve < amount {
            panic!("allocation not funded");
        }

        state.reward_per_share += amount * REWARD_PRECISION / total;
        state.reserve += amount;
        state.total_allocated += amount;
        e.storage()
            .persistent()
            .set(&DataKey::Reward(token.clone()), &state);

        let mut tokens = Self::reward_tokens(e.clone());
        if !tokens.contains(&token) {
            tokens.push_back(token.clone());
            e.storage().instance().set(&DataKey::RewardTokens, &tokens);
        }

        e.events().publish(
            (Symbol::new(e, "seigniorage_allocated"), token),
            (amount, state.reward_per_share),
        );
    }

    /// Fold pending rewards of every reward token into the member's snapshots.
    fn settle_member(e: &Env, member: &Address) {
        for token in Self::reward_tokens(e.clone()).iter() {
            let earned = Self::earned(e.clone(), member.clone(), token.clone());
            let state = Self::reward_state(e.clone(), token.clone());
            e.storage().persistent().set(
                &DataKey::Snapshot(member.clone(), token),
                &MemberSnapshot {
                    reward_per_share_paid: state.reward_per_share,
                    earned,
                },
            );
        }
    }
}
