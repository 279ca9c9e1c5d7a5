//! Secondary pegged assets: registry, governance and the per-epoch expansion.
//!
//! A peg token expands like the Dollar but with its own oracle, boardroom and
//! self-damping cap: whenever circulating supply reaches `supply_target`, the
//! target grows by 20% and `max_expansion_percent` shrinks to 97.5% of itself,
//! never below 10 bps.

use basis_errors::ContractError;
use soroban_sdk::{Address, Env, Vec};

use crate::distribution::{send_peg_token_seigniorage, Distribution};
use crate::interfaces::ManagedAssetClient;
use crate::math::{apply_bps, at_rate, capped_expansion};
use crate::parameters::emit_parameter_changed;
use crate::types::{FundConfig, PegTokenConfig, PolicyConfig};
use crate::{events, oracle, storage, supply};

pub const MIN_PEG_MAX_EXPANSION_PERCENT: u32 = 10;
pub const MAX_PEG_MAX_EXPANSION_PERCENT: u32 = 1_000;
/// Floor the ratchet never pushes the cap below (0.1%).
pub const PEG_MAX_EXPANSION_FLOOR: u32 = 10;
/// Target growth on each ratchet step (x1.2).
pub const TARGET_GROWTH_PERCENT: u32 = 12_000;
/// Cap decay on each ratchet step (x0.975).
pub const EXPANSION_DECAY_PERCENT: u32 = 9_750;
/// Peg token seigniorage share sent to the DAO fund.
pub const PEG_DAO_FUND_PERCENT: u32 = 5_750;
/// Peg token seigniorage share sent to the marketing fund.
pub const PEG_MARKETING_FUND_PERCENT: u32 = 500;

// ─── Governance ────────────────────────────────────────────────────────────

fn validate(supply_target: i128, max_expansion_percent: u32) -> Result<(), ContractError> {
    if supply_target <= 0
        || max_expansion_percent < MIN_PEG_MAX_EXPANSION_PERCENT
        || max_expansion_percent > MAX_PEG_MAX_EXPANSION_PERCENT
    {
        return Err(ContractError::ParameterOutOfBounds);
    }
    Ok(())
}

/// Register a peg token. It stays inactive until an epoch start is set.
#[allow(clippy::too_many_arguments)]
pub fn add_peg_token(
    e: &Env,
    admin: &Address,
    token: &Address,
    oracle: &Address,
    boardroom: &Address,
    farming_pool: Option<Address>,
    supply_target: i128,
    max_expansion_percent: u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    validate(supply_target, max_expansion_percent)?;
    let mut tokens = storage::peg_tokens(e);
    if tokens.contains(token) {
        return Err(ContractError::PegTokenAlreadyRegistered);
    }
    tokens.push_back(token.clone());
    storage::write_peg_tokens(e, &tokens);
    storage::write_peg_token(
        e,
        token,
        &PegTokenConfig {
            oracle: oracle.clone(),
            boardroom: boardroom.clone(),
            farming_pool,
            epoch_start: 0,
            supply_target,
            max_expansion_percent,
        },
    );
    emit_parameter_changed(e, "peg_token_added", 0_i128, supply_target, admin);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn set_peg_token_config(
    e: &Env,
    admin: &Address,
    token: &Address,
    oracle: &Address,
    boardroom: &Address,
    farming_pool: Option<Address>,
    supply_target: i128,
    max_expansion_percent: u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    validate(supply_target, max_expansion_percent)?;
    let old = storage::read_peg_token(e, token)?;
    let config = PegTokenConfig {
        oracle: oracle.clone(),
        boardroom: boardroom.clone(),
        farming_pool,
        epoch_start: old.epoch_start,
        supply_target,
        max_expansion_percent,
    };
    storage::write_peg_token(e, token, &config);
    emit_parameter_changed(e, "peg_token_oracle", old.oracle, config.oracle, admin);
    emit_parameter_changed(
        e,
        "peg_token_boardroom",
        old.boardroom,
        config.boardroom,
        admin,
    );
    emit_parameter_changed(
        e,
        "peg_token_farming_pool",
        old.farming_pool,
        config.farming_pool,
        admin,
    );
    emit_parameter_changed(
        e,
        "peg_token_supply_target",
        old.supply_target,
        supply_target,
        admin,
    );
    emit_parameter_changed(
        e,
        "peg_token_max_expansion_percent",
        old.max_expansion_percent,
        max_expansion_percent,
        admin,
    );
    Ok(())
}

pub fn set_peg_token_epoch_start(
    e: &Env,
    admin: &Address,
    token: &Address,
    epoch_start: u64,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    let mut config = storage::read_peg_token(e, token)?;
    let old = config.epoch_start;
    config.epoch_start = epoch_start;
    storage::write_peg_token(e, token, &config);
    emit_parameter_changed(e, "peg_token_epoch_start", old, epoch_start, admin);
    Ok(())
}

// ─── Queries ───────────────────────────────────────────────────────────────

pub fn is_active(config: &PegTokenConfig, epoch: u64) -> bool {
    config.epoch_start > 0 && epoch >= config.epoch_start
}

pub fn require_active(
    e: &Env,
    token: &Address,
    epoch: u64,
) -> Result<PegTokenConfig, ContractError> {
    let config = storage::read_peg_token(e, token)?;
    if !is_active(&config, epoch) {
        return Err(ContractError::PegTokenInactive);
    }
    Ok(config)
}

/// Supply expansion rate the token would get at its current price, as a
/// price delta (`PRICE_ONE` = 100%).
pub fn expansion_rate(
    e: &Env,
    token: &Address,
    policy: &PolicyConfig,
) -> Result<i128, ContractError> {
    let config = storage::read_peg_token(e, token)?;
    let price = oracle::read_price(e, &config.oracle, token)?;
    if price <= policy.price_ceiling {
        return Ok(0);
    }
    Ok(capped_expansion(
        price,
        policy.price_one,
        config.max_expansion_percent,
    ))
}

pub fn registered(e: &Env) -> Vec<Address> {
    storage::peg_tokens(e)
}

// ─── Epoch expansion ───────────────────────────────────────────────────────

/// Grow the target and decay the cap once circulating supply reaches the target.
fn ratchet(
    e: &Env,
    token: &Address,
    config: &mut PegTokenConfig,
    circulating: i128,
) -> Result<(), ContractError> {
    if circulating < config.supply_target {
        return Ok(());
    }
    config.supply_target = apply_bps(config.supply_target, TARGET_GROWTH_PERCENT)?;
    let decayed =
        apply_bps(config.max_expansion_percent as i128, EXPANSION_DECAY_PERCENT)? as u32;
    config.max_expansion_percent = decayed.max(PEG_MAX_EXPANSION_FLOOR);
    storage::write_peg_token(e, token, config);
    events::emit_peg_token_target_raised(
        e,
        token,
        config.supply_target,
        config.max_expansion_percent,
    );
    Ok(())
}

/// Run one epoch of expansion for `token`. Returns the amount minted.
pub fn allocate(
    e: &Env,
    token: &Address,
    policy: &PolicyConfig,
    funds: &FundConfig,
) -> Result<i128, ContractError> {
    let mut config = storage::read_peg_token(e, token)?;
    oracle::refresh(e, &config.oracle);

    let circulating = supply::peg_token_circulating(e, token, &config)?;
    ratchet(e, token, &mut config, circulating)?;

    let price = oracle::read_price(e, &config.oracle, token)?;
    if price <= policy.price_ceiling {
        return Ok(0);
    }
    let rate = capped_expansion(price, policy.price_one, config.max_expansion_percent);
    let minted = at_rate(circulating, rate)?;
    if minted <= 0 {
        return Ok(0);
    }

    ManagedAssetClient::new(e, token).mint(&e.current_contract_address(), &minted);
    let target = Distribution::PegToken {
        boardroom: config.boardroom.clone(),
        token: token.clone(),
    };
    let to_boardroom = send_peg_token_seigniorage(
        e,
        &target,
        funds,
        minted,
        PEG_DAO_FUND_PERCENT,
        PEG_MARKETING_FUND_PERCENT,
    )?;
    events::emit_peg_token_funded(e, token, minted, to_boardroom);
    Ok(minted)
}
