//! Basis Asset Contract
//!
//! A token whose supply is controlled by a single *operator* address. The
//! treasury is expected to hold the operator role for Dollar, Bond, Share and
//! every peg token it manages; it mints seigniorage, bonds and coupon payouts
//! and checks at every epoch transition that it still holds the role.
//!
//! The transfer / allowance / burn surface follows the standard token interface
//! so `soroban_sdk::token::TokenClient` works against it. On top of that the
//! contract exposes `mint`, `total_supply`, `operator` and `transfer_operator`,
//! which the stock interface lacks and the treasury needs.
//!
//! ## Storage layout
//!
//! | Key                        | Tier           |
//! |----------------------------|----------------|
//! | `Operator`, `TotalSupply`, `Metadata` | `instance()` |
//! | `Balance(id)`              | `persistent()` |
//! | `Allowance(from, spender)` | `temporary()`  |

#![no_std]

mod errors;
mod types;

use errors::*;
use types::{AllowanceValue, DataKey, TokenMetadata};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol};


/// Minimum ledger TTL before a balance entry is bumped (~1 day at 5 s/ledger).
const BUMP_THRESHOLD: u32 = 17_280;
/// Target TTL after a bump (~30 days).
const BUMP_TARGET: u32 = 518_400;

// ─── Helpers ───────────────────────────────────────────────────────────────

fn require_non_negative(amount: i128) {
    if amount < 0 {
        panic!("{}", ERR_NEGATIVE_AMOUNT);
    }
}

fn read_operator(e: &Env) -> Address {
    e.storage()
        .instance()
        .get(&DataKey::Operator)
        .unwrap_or_else(|| panic!("{}", ERR_NOT_INITIALIZED))
}

fn read_balance(e: &Env, id: &Address) -> i128 {
    let key = DataKey::Balance(id.clone());
    match e.storage().persistent().get::<_, i128>(&key) {
        Some(balance) => {
            e.storage()
                .persistent()
                .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
            balance
        }
        None => 0,
    }
}

fn write_balance(e: &Env, id: &Address, amount: i128) {
    let key = DataKey::Balance(id.clone());
    e.storage().persistent().set(&key, &amount);
    e.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
}

fn receive_balance(e: &Env, id: &Address, amount: i128) {
    let balance = read_balance(e, id);
    let updated = balance
        .checked_add(amount)
        .unwrap_or_else(|| panic!("balance overflow"));
    write_balance(e, id, updated);
}

fn spend_balance(e: &Env, id: &Address, amount: i128) {
    let balance = read_balance(e, id);
    if balance < amount {
        panic!("{}", ERR_INSUFFICIENT_BALANCE);
    }
    write_balance(e, id, balance - amount);
}

fn read_total_supply(e: &Env) -> i128 {
    e.storage()
        .instance()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0)
}

fn write_total_supply(e: &Env, supply: i128) {
    e.storage().instance().set(&DataKey::TotalSupply, &supply);
}

fn read_allowance(e: &Env, from: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(from.clone(), spender.clone());
    match e.storage().temporary().get::<_, AllowanceValue>(&key) {
        Some(allowance) if allowance.expiration_ledger >= e.ledger().sequence() => allowance,
        Some(allowance) => AllowanceValue {
            amount: 0,
            expiration_ledger: allowance.expiration_ledger,
        },
        None => AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        },
    }
}

fn write_allowance(
    e: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) {
    if amount > 0 && expiration_ledger < e.ledger().sequence() {
        panic!("{}", ERR_EXPIRED_LEDGER);
    }
    let key = DataKey::Allowance(from.clone(), spender.clone());
    let allowance = AllowanceValue {
        amount,
        expiration_ledger,
    };
    e.storage().temporary().set(&key, &allowance);
    if amount > 0 {
        let live_for = expiration_ledger
            .checked_sub(e.ledger().sequence())
            .unwrap_or(0);
        e.storage().temporary().extend_ttl(&key, live_for, live_for);
    }
}

fn spend_allowance(e: &Env, from: &Address, spender: &Address, amount: i128) {
    let allowance = read_allowance(e, from, spender);
    if allowance.amount < amount {
        panic!("{}", ERR_INSUFFICIENT_ALLOWANCE);
    }
    if amount > 0 {
        write_allowance(
            e,
            from,
            spender,
            allowance.amount - amount,
            allowance.expiration_ledger,
        );
    }
}

fn burn_balance(e: &Env, from: &Address, amount: i128) {
    spend_balance(e, from, amount);
    let supply = read_total_supply(e);
    write_total_supply(e, supply - amount);
    e.events()
        .publish((Symbol::new(e, "burn"), from.clone()), amount);
}

// ─── Contract ──────────────────────────────────────────────────────────────

#[contract]
pub struct BasisAsset;

#[contractimpl]
impl BasisAsset {
    // ── Setup ──────────────────────────────────────────────────────────────

    /// One-time initialization. `operator` becomes the only minter.
    pub fn initialize(e: Env, operator: Address, decimals: u32, name: String, symbol: String) {
        if e.storage().instance().has(&DataKey::Operator) {
            panic!("{}", ERR_ALREADY_INITIALIZED);
        }
        if decimals > 18 {
            panic!("{}", ERR_DECIMALS_TOO_LARGE);
        }
        e.storage().instance().set(&DataKey::Operator, &operator);
        e.storage().instance().set(
            &DataKey::Metadata,
            &TokenMetadata {
                decimals,
                name,
                symbol,
            },
        );
        write_total_supply(&e, 0);
    }

    // ── Operator ───────────────────────────────────────────────────────────

    pub fn operator(e: Env) -> Address {
        read_operator(&e)
    }

    /// Hand the operator role to `new_operator`. Requires the current
    /// operator's authorization.
    pub fn transfer_operator(e: Env, new_operator: Address) {
        let operator = read_operator(&e);
        operator.require_auth();
        e.storage().instance().set(&DataKey::Operator, &new_operator);
        e.events().publish(
            (Symbol::new(&e, "operator_transferred"),),
            (operator, new_operator),
        );
    }

    /// Mint `amount` to `to`. Operator only. Returns `true` when tokens were
    /// created, `false` for a zero amount.
    pub fn mint(e: Env, to: Address, amount: i128) -> bool {
        let operator = read_operator(&e);
        operator.require_auth();
        require_non_negative(amount);
        if amount == 0 {
            return false;
        }

        receive_balance(&e, &to, amount);
        let supply = read_total_supply(&e)
            .checked_add(amount)
            .unwrap_or_else(|| panic!("total supply overflow"));
        write_total_supply(&e, supply);

        e.events()
            .publish((Symbol::new(&e, "mint"), operator, to), amount);
        true
    }

    pub fn total_supply(e: Env) -> i128 {
        read_total_supply(&e)
    }

    // ── Standard token surface ─────────────────────────────────────────────

    pub fn allowance(e: Env, from: Address, spender: Address) -> i128 {
        read_allowance(&e, &from, &spender).amount
    }

    pub fn approve(e: Env, from: Address, spender: Address, amount: i128, expiration_ledger: u32) {
        from.require_auth();
        require_non_negative(amount);
        write_allowance(&e, &from, &spender, amount, expiration_ledger);
        e.events().publish(
            (Symbol::new(&e, "approve"), from, spender),
            (amount, expiration_ledger),
        );
    }

    pub fn balance(e: Env, id: Address) -> i128 {
        read_balance(&e, &id)
    }

    pub fn transfer(e: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        require_non_negative(amount);
        spend_balance(&e, &from, amount);
        receive_balance(&e, &to, amount);
        e.events()
            .publish((Symbol::new(&e, "transfer"), from, to), amount);
    }

    pub fn transfer_from(e: Env, spender: Address, from: Address, to: Address, amount: i128) {
        spender.require_auth();
        require_non_negative(amount);
        spend_allowance(&e, &from, &spender, amount);
        spend_balance(&e, &from, amount);
        receive_balance(&e, &to, amount);
        e.events()
            .publish((Symbol::new(&e, "transfer"), from, to), amount);
    }

    pub fn burn(e: Env, from: Address, amount: i128) {
        from.require_auth();
        require_non_negative(amount);
        burn_balance(&e, &from, amount);
    }

    pub fn burn_from(e: Env, spender: Address, from: Address, amount: i128) {
        spender.require_auth();
        require_non_negative(amount);
        spend_allowance(&e, &from, &spender, amount);
        burn_balance(&e, &from, amount);
    }

    pub fn decimals(e: Env) -> u32 {
        Self::metadata(&e).decimals
    }

    pub fn name(e: Env) -> String {
        Self::metadata(&e).name
    }

    pub fn symbol(e: Env) -> String {
        Self::metadata(&e).symbol
    }
}

impl BasisAsset {
    fn metadata(e: &Env) -> TokenMetadata {
        e.storage()
            .instance()
            .get(&DataKey::Metadata)
            .unwrap_or_else(|| panic!("{}", ERR_NOT_INITIALIZED))
    }
}
