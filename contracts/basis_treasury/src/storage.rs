//! Typed accessors over the treasury's storage tiers.
//!
//! | Key                                   | Tier           |
//! |---------------------------------------|----------------|
//! | operator, contracts, configs, pools   | `instance()`   |
//! | peg token configs, coupon ledgers     | `persistent()` |
//! | contraction flags                     | `persistent()` |
//! | last-call sequence per caller         | `temporary()`  |

use basis_errors::ContractError;
use soroban_sdk::{Address, Env, Vec};

use crate::types::{DataKey, ManagedContracts, PegTokenConfig};

/// Minimum ledger TTL before a persistent entry is bumped (~1 day at 5 s/ledger).
pub const BUMP_THRESHOLD: u32 = 17_280;
/// Target TTL after a bump (~30 days).
pub const BUMP_TARGET: u32 = 518_400;

pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_TARGET);
}

// ─── Lifecycle ─────────────────────────────────────────────────────────────

pub fn is_initialized(e: &Env) -> bool {
    e.storage().instance().has(&DataKey::Operator)
}

pub fn is_migrated(e: &Env) -> bool {
    e.storage()
        .instance()
        .get(&DataKey::Migrated)
        .unwrap_or(false)
}

/// Initialized and not yet migrated.
pub fn require_active(e: &Env) -> Result<(), ContractError> {
    if !is_initialized(e) {
        return Err(ContractError::NotInitialized);
    }
    if is_migrated(e) {
        return Err(ContractError::AlreadyMigrated);
    }
    extend_instance(e);
    Ok(())
}

// ─── Roles and managed contracts ───────────────────────────────────────────

pub fn read_operator(e: &Env) -> Result<Address, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Operator)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_operator(e: &Env, operator: &Address) {
    e.storage().instance().set(&DataKey::Operator, operator);
}

/// Authenticate `admin` and check it holds the operator role.
pub fn require_operator(e: &Env, admin: &Address) -> Result<(), ContractError> {
    admin.require_auth();
    if read_operator(e)? != *admin {
        return Err(ContractError::NotOperator);
    }
    Ok(())
}

pub fn read_contracts(e: &Env) -> Result<ManagedContracts, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Contracts)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_contracts(e: &Env, contracts: &ManagedContracts) {
    e.storage().instance().set(&DataKey::Contracts, contracts);
}

// ─── Amounts ───────────────────────────────────────────────────────────────

/// Instance-stored `i128`, zero when unset.
pub fn read_amount(e: &Env, key: &DataKey) -> i128 {
    e.storage().instance().get(key).unwrap_or(0)
}

pub fn write_amount(e: &Env, key: &DataKey, value: i128) {
    e.storage().instance().set(key, &value);
}

// ─── Supply exclusions and peg token registry ──────────────────────────────

pub fn excluded_from_supply(e: &Env) -> Vec<Address> {
    e.storage()
        .instance()
        .get(&DataKey::ExcludedFromSupply)
        .unwrap_or_else(|| Vec::new(e))
}

pub fn write_excluded_from_supply(e: &Env, accounts: &Vec<Address>) {
    e.storage()
        .instance()
        .set(&DataKey::ExcludedFromSupply, accounts);
}

pub fn peg_tokens(e: &Env) -> Vec<Address> {
    e.storage()
        .instance()
        .get(&DataKey::PegTokens)
        .unwrap_or_else(|| Vec::new(e))
}

pub fn write_peg_tokens(e: &Env, tokens: &Vec<Address>) {
    e.storage().instance().set(&DataKey::PegTokens, tokens);
}

pub fn read_peg_token(e: &Env, token: &Address) -> Result<PegTokenConfig, ContractError> {
    let key = DataKey::PegToken(token.clone());
    let config: PegTokenConfig = e
        .storage()
        .persistent()
        .get(&key)
        .ok_or(ContractError::PegTokenNotRegistered)?;
    e.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
    Ok(config)
}

pub fn write_peg_token(e: &Env, token: &Address, config: &PegTokenConfig) {
    let key = DataKey::PegToken(token.clone());
    e.storage().persistent().set(&key, config);
    e.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_TARGET);
}

// ─── Persistent ledgers ────────────────────────────────────────────────────

/// Persistent value with TTL bump on read; `None` when absent.
pub fn read_persistent<V>(e: &Env, key: &DataKey) -> Option<V>
where
    V: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
{
    let value = e.storage().persistent().get(key);
    if value.is_some() {
        e.storage()
            .persistent()
            .extend_ttl(key, BUMP_THRESHOLD, BUMP_TARGET);
    }
    value
}

pub fn write_persistent<V>(e: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    e.storage().persistent().set(key, value);
    e.storage()
        .persistent()
        .extend_ttl(key, BUMP_THRESHOLD, BUMP_TARGET);
}
