//! Same-slot guard for the state-changing market and epoch entry points.
//!
//! Two checks run before the guarded body:
//! * a lock flag in instance storage rejects nested entry while a guarded call
//!   is in flight (`ReentrancyDetected`);
//! * the ledger sequence of the caller's last guarded call, kept in temporary
//!   storage, rejects a second call by the same caller in the same ledger
//!   (`SameSlotCall`).

use basis_errors::ContractError;
use soroban_sdk::{Address, Env};

use crate::types::DataKey;

/// Ledgers a last-call record outlives its own ledger.
const LAST_CALL_TTL: u32 = 32;

pub fn is_locked(e: &Env) -> bool {
    e.storage().instance().get(&DataKey::Lock).unwrap_or(false)
}

pub fn with_slot_guard<T, F>(e: &Env, caller: &Address, f: F) -> Result<T, ContractError>
where
    F: FnOnce() -> Result<T, ContractError>,
{
    if is_locked(e) {
        return Err(ContractError::ReentrancyDetected);
    }

    let sequence = e.ledger().sequence();
    let key = DataKey::LastCall(caller.clone());
    let last: Option<u32> = e.storage().temporary().get(&key);
    if last == Some(sequence) {
        return Err(ContractError::SameSlotCall);
    }
    e.storage().temporary().set(&key, &sequence);
    e.storage()
        .temporary()
        .extend_ttl(&key, LAST_CALL_TTL, LAST_CALL_TTL);

    e.storage().instance().set(&DataKey::Lock, &true);
    let result = f();
    e.storage().instance().set(&DataKey::Lock, &false);
    result
}
