//! Epoch clock and the per-epoch contraction flags.

use basis_errors::ContractError;
use soroban_sdk::Env;

use crate::storage;
use crate::types::DataKey;

/// Epoch length in seconds (6 hours).
pub const PERIOD: u64 = 21_600;

pub fn current(e: &Env) -> u64 {
    e.storage().instance().get(&DataKey::Epoch).unwrap_or(0)
}

pub fn start_time(e: &Env) -> u64 {
    e.storage().instance().get(&DataKey::StartTime).unwrap_or(0)
}

/// `start_time + epoch * PERIOD`.
pub fn next_epoch_point(e: &Env) -> u64 {
    start_time(e).saturating_add(current(e).saturating_mul(PERIOD))
}

pub fn require_open(e: &Env) -> Result<(), ContractError> {
    let now = e.ledger().timestamp();
    if now < start_time(e) {
        return Err(ContractError::NotStarted);
    }
    if now < next_epoch_point(e) {
        return Err(ContractError::EpochNotOpened);
    }
    Ok(())
}

/// Close the current epoch. Returns the new epoch number.
pub fn advance(e: &Env) -> Result<u64, ContractError> {
    let next = current(e)
        .checked_add(1)
        .ok_or(ContractError::Overflow)?;
    e.storage().instance().set(&DataKey::Epoch, &next);
    Ok(next)
}

pub fn mark_contraction(e: &Env, epoch: u64) {
    storage::write_persistent(e, &DataKey::ContractionEpoch(epoch), &true);
}

pub fn is_contraction(e: &Env, epoch: u64) -> bool {
    storage::read_persistent(e, &DataKey::ContractionEpoch(epoch)).unwrap_or(false)
}

/// Contraction flags of the previous and the one-before-previous epoch.
pub fn contraction_lookback(e: &Env) -> (bool, bool) {
    let now = current(e);
    let last = now.checked_sub(1).map_or(false, |ep| is_contraction(e, ep));
    let before = now.checked_sub(2).map_or(false, |ep| is_contraction(e, ep));
    (last, before)
}
