//! Monetary Policy Parameters
//!
//! Every tunable of the treasury lives in one of four configuration structs held
//! in instance storage: [`PolicyConfig`], [`BondConfig`], [`CouponConfig`] and
//! [`FundConfig`]. They are written with the defaults below at initialization
//! and afterwards only through the bounded setters in this module.
//!
//! ## Units
//! * Percentages are basis points (10_000 = 100%).
//! * Prices and rates are fixed point with `PRICE_ONE` = 1.0.
//! * Token amounts are in the Dollar's smallest unit (7 decimals).
//!
//! ## Governance Control
//! Every setter authenticates `admin` and checks it is the stored operator
//! (`NotOperator`). Out-of-range values fail with `ParameterOutOfBounds`.
//!
//! ## Event Emission
//! Every successful update emits `parameter_changed` with
//! `(name, old, new, admin, timestamp)`.

use basis_errors::ContractError;
use soroban_sdk::{Address, Env, IntoVal, String, Symbol, TryFromVal, Val};

use crate::math::PRICE_ONE;
use crate::storage;
use crate::types::{BondConfig, CouponConfig, DataKey, FundConfig, PolicyConfig, TreasuryConfig};

/// One whole Dollar in its smallest unit.
pub const DOLLAR_UNIT: i128 = 10_000_000;

// ============================================================================
// Price band
// ============================================================================

/// Lowest accepted peg target (0.9).
pub const MIN_PRICE_ONE: i128 = PRICE_ONE * 9 / 10;
pub const MAX_PRICE_ONE: i128 = PRICE_ONE;
/// Ceiling may sit at most 20% above the peg target.
pub const MAX_CEILING_PERCENT: u32 = 12_000;
/// Default ceiling is 1% above the peg target.
pub const DEFAULT_CEILING_PERCENT: u32 = 10_100;

// ============================================================================
// Expansion / contraction
// ============================================================================

pub const MIN_SUPPLY_EXPANSION_PERCENT: u32 = 10;
pub const MAX_SUPPLY_EXPANSION_PERCENT: u32 = 1_000;
pub const MAX_SUPPLY_EXPANSION_PERCENT_IN_DEBT_PHASE: u32 = 1_500;
/// 3% per epoch.
pub const DEFAULT_SUPPLY_EXPANSION_PERCENT: u32 = 300;
/// 4.5% per epoch while bonds are outstanding.
pub const DEFAULT_SUPPLY_EXPANSION_PERCENT_IN_DEBT_PHASE: u32 = 450;

pub const MIN_BOND_DEPLETION_FLOOR_PERCENT: u32 = 500;
pub const MAX_BOND_DEPLETION_FLOOR_PERCENT: u32 = 10_000;
pub const DEFAULT_BOND_DEPLETION_FLOOR_PERCENT: u32 = 10_000;

pub const MIN_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT: u32 = 1_000;
pub const MAX_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT: u32 = 10_000;
pub const DEFAULT_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT: u32 = 3_500;

pub const MIN_SUPPLY_CONTRACTION_PERCENT: u32 = 100;
pub const MAX_SUPPLY_CONTRACTION_PERCENT: u32 = 1_500;
pub const DEFAULT_SUPPLY_CONTRACTION_PERCENT: u32 = 300;

pub const MIN_DEBT_RATIO_PERCENT: u32 = 1_000;
pub const MAX_DEBT_RATIO_PERCENT: u32 = 10_000;
pub const DEFAULT_DEBT_RATIO_PERCENT: u32 = 3_500;

pub const MIN_MINTING_FACTOR: u32 = 10_000;
pub const MAX_MINTING_FACTOR: u32 = 20_000;
pub const DEFAULT_MINTING_FACTOR: u32 = 10_000;

pub const MAX_BOOTSTRAP_EPOCHS: u64 = 120;
pub const DEFAULT_BOOTSTRAP_EPOCHS: u64 = 28;
pub const MIN_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT: u32 = 100;
pub const MAX_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT: u32 = 1_000;
pub const DEFAULT_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT: u32 = 450;

/// Epoch trigger salary is capped at 100 Dollar.
pub const MAX_ALLOCATE_SEIGNIORAGE_SALARY: i128 = 100 * DOLLAR_UNIT;

pub const MAX_EXTERNAL_REWARD_SHARED_PERCENT: u32 = 5_000;
pub const DEFAULT_EXTERNAL_REWARD_SHARED_PERCENT: u32 = 1_000;

// ============================================================================
// Bond and coupon curves
// ============================================================================

pub const MAX_CURVE_PERCENT: u32 = 20_000;
/// Lower bound of a non-zero rate clamp.
pub const MIN_RATE_CLAMP: i128 = PRICE_ONE;
pub const MAX_RATE_CLAMP: i128 = 2 * PRICE_ONE;
pub const DEFAULT_RATE_CLAMP: i128 = PRICE_ONE * 13 / 10;

pub const MAX_INCENTIVE_PERCENT: u32 = 1_000;
pub const MAX_CONTRACTION_REDEEM_PENALTY_PERCENT: u32 = 5_000;

pub const MAX_REDEEMABLE_COUPON_PERCENT: u32 = 10_000;
pub const DEFAULT_REDEEMABLE_COUPON_PERCENT: u32 = 500;

// ============================================================================
// Side funds
// ============================================================================

pub const MAX_DAO_FUND_SHARED_PERCENT: u32 = 3_000;
pub const MAX_BVAULTS_FUND_SHARED_PERCENT: u32 = 1_000;
pub const MAX_MARKETING_FUND_SHARED_PERCENT: u32 = 1_000;

// ============================================================================
// Defaults
// ============================================================================

pub fn default_policy() -> PolicyConfig {
    PolicyConfig {
        price_one: PRICE_ONE,
        price_ceiling: PRICE_ONE / 10_000 * DEFAULT_CEILING_PERCENT as i128,
        max_supply_expansion_percent: DEFAULT_SUPPLY_EXPANSION_PERCENT,
        max_expansion_percent_debt: DEFAULT_SUPPLY_EXPANSION_PERCENT_IN_DEBT_PHASE,
        bond_depletion_floor_percent: DEFAULT_BOND_DEPLETION_FLOOR_PERCENT,
        expansion_floor_percent: DEFAULT_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT,
        max_supply_contraction_percent: DEFAULT_SUPPLY_CONTRACTION_PERCENT,
        max_debt_ratio_percent: DEFAULT_DEBT_RATIO_PERCENT,
        minting_factor_for_paying_debt: DEFAULT_MINTING_FACTOR,
        bootstrap_epochs: DEFAULT_BOOTSTRAP_EPOCHS,
        bootstrap_expansion_percent: DEFAULT_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT,
        allocate_seigniorage_salary: 0,
        external_reward_shared_percent: DEFAULT_EXTERNAL_REWARD_SHARED_PERCENT,
    }
}

pub fn default_bonds() -> BondConfig {
    BondConfig {
        discount_percent: 0,
        premium_percent: 0,
        max_discount_rate: DEFAULT_RATE_CLAMP,
        max_premium_rate: DEFAULT_RATE_CLAMP,
        incentive_percent: 0,
        redeem_penalty_percent: 0,
    }
}

pub fn default_coupons() -> CouponConfig {
    CouponConfig {
        discount_percent: 0,
        premium_percent: 0,
        max_discount_rate: DEFAULT_RATE_CLAMP,
        max_premium_rate: DEFAULT_RATE_CLAMP,
        max_redeem_percent_per_epoch: DEFAULT_REDEEMABLE_COUPON_PERCENT,
    }
}

pub fn default_funds() -> FundConfig {
    FundConfig {
        dao_fund: None,
        dao_fund_shared_percent: 0,
        bvaults_fund: None,
        bvaults_fund_shared_percent: 0,
        marketing_fund: None,
        marketing_fund_shared_percent: 0,
    }
}

// ============================================================================
// Storage
// ============================================================================

pub fn read_policy(e: &Env) -> Result<PolicyConfig, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Policy)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_policy(e: &Env, policy: &PolicyConfig) {
    e.storage().instance().set(&DataKey::Policy, policy);
}

pub fn read_bonds(e: &Env) -> Result<BondConfig, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Bonds)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_bonds(e: &Env, bonds: &BondConfig) {
    e.storage().instance().set(&DataKey::Bonds, bonds);
}

pub fn read_coupons(e: &Env) -> Result<CouponConfig, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Coupons)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_coupons(e: &Env, coupons: &CouponConfig) {
    e.storage().instance().set(&DataKey::Coupons, coupons);
}

pub fn read_funds(e: &Env) -> Result<FundConfig, ContractError> {
    e.storage()
        .instance()
        .get(&DataKey::Funds)
        .ok_or(ContractError::NotInitialized)
}

pub fn write_funds(e: &Env, funds: &FundConfig) {
    e.storage().instance().set(&DataKey::Funds, funds);
}

pub fn read_config(e: &Env) -> Result<TreasuryConfig, ContractError> {
    Ok(TreasuryConfig {
        policy: read_policy(e)?,
        bonds: read_bonds(e)?,
        coupons: read_coupons(e)?,
        funds: read_funds(e)?,
    })
}

// ============================================================================
// Validation
// ============================================================================

fn check_range<T: PartialOrd>(value: T, min: T, max: T) -> Result<(), ContractError> {
    if value < min || value > max {
        return Err(ContractError::ParameterOutOfBounds);
    }
    Ok(())
}

/// A rate clamp is either disabled (0) or within `[1.0, 2.0]`.
fn check_rate_clamp(rate: i128) -> Result<(), ContractError> {
    if rate == 0 {
        return Ok(());
    }
    check_range(rate, MIN_RATE_CLAMP, MAX_RATE_CLAMP)
}

fn max_ceiling(price_one: i128) -> i128 {
    price_one / 10_000 * MAX_CEILING_PERCENT as i128
}

// ============================================================================
// Price band setters
// ============================================================================

pub fn set_price_one(e: &Env, admin: &Address, value: i128) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(value, MIN_PRICE_ONE, MAX_PRICE_ONE)?;
    let mut policy = read_policy(e)?;
    // keep price_one <= price_ceiling <= 1.2 * price_one
    if policy.price_ceiling < value || policy.price_ceiling > max_ceiling(value) {
        return Err(ContractError::ParameterOutOfBounds);
    }
    let old = policy.price_one;
    policy.price_one = value;
    write_policy(e, &policy);
    emit_parameter_changed(e, "price_one", old, value, admin);
    Ok(())
}

pub fn set_price_ceiling(e: &Env, admin: &Address, value: i128) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    let mut policy = read_policy(e)?;
    check_range(value, policy.price_one, max_ceiling(policy.price_one))?;
    let old = policy.price_ceiling;
    policy.price_ceiling = value;
    write_policy(e, &policy);
    emit_parameter_changed(e, "price_ceiling", old, value, admin);
    Ok(())
}

// ============================================================================
// Policy setters
// ============================================================================

pub fn set_max_supply_expansion_percents(
    e: &Env,
    admin: &Address,
    normal: u32,
    debt_phase: u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(
        normal,
        MIN_SUPPLY_EXPANSION_PERCENT,
        MAX_SUPPLY_EXPANSION_PERCENT,
    )?;
    check_range(
        debt_phase,
        MIN_SUPPLY_EXPANSION_PERCENT,
        MAX_SUPPLY_EXPANSION_PERCENT_IN_DEBT_PHASE,
    )?;
    let mut policy = read_policy(e)?;
    let (old_normal, old_debt) = (
        policy.max_supply_expansion_percent,
        policy.max_expansion_percent_debt,
    );
    policy.max_supply_expansion_percent = normal;
    policy.max_expansion_percent_debt = debt_phase;
    write_policy(e, &policy);
    emit_parameter_changed(e, "max_supply_expansion_percent", old_normal, normal, admin);
    emit_parameter_changed(
        e,
        "max_supply_expansion_percent_in_debt_phase",
        old_debt,
        debt_phase,
        admin,
    );
    Ok(())
}

/// Shared shape of the single-`u32` policy setters.
fn update_policy_percent(
    e: &Env,
    admin: &Address,
    name: &str,
    value: u32,
    min: u32,
    max: u32,
    field: fn(&mut PolicyConfig) -> &mut u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(value, min, max)?;
    let mut policy = read_policy(e)?;
    let slot = field(&mut policy);
    let old = *slot;
    *slot = value;
    write_policy(e, &policy);
    emit_parameter_changed(e, name, old, value, admin);
    Ok(())
}

pub fn set_bond_depletion_floor_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "bond_depletion_floor_percent",
        value,
        MIN_BOND_DEPLETION_FLOOR_PERCENT,
        MAX_BOND_DEPLETION_FLOOR_PERCENT,
        |p| &mut p.bond_depletion_floor_percent,
    )
}

pub fn set_max_supply_contraction_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "max_supply_contraction_percent",
        value,
        MIN_SUPPLY_CONTRACTION_PERCENT,
        MAX_SUPPLY_CONTRACTION_PERCENT,
        |p| &mut p.max_supply_contraction_percent,
    )
}

pub fn set_max_debt_ratio_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "max_debt_ratio_percent",
        value,
        MIN_DEBT_RATIO_PERCENT,
        MAX_DEBT_RATIO_PERCENT,
        |p| &mut p.max_debt_ratio_percent,
    )
}

pub fn set_minting_factor_for_paying_debt(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "minting_factor_for_paying_debt",
        value,
        MIN_MINTING_FACTOR,
        MAX_MINTING_FACTOR,
        |p| &mut p.minting_factor_for_paying_debt,
    )
}

pub fn set_seigniorage_expansion_floor_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "seigniorage_expansion_floor_percent",
        value,
        MIN_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT,
        MAX_SEIGNIORAGE_EXPANSION_FLOOR_PERCENT,
        |p| &mut p.expansion_floor_percent,
    )
}

pub fn set_external_reward_shared_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_policy_percent(
        e,
        admin,
        "external_reward_shared_percent",
        value,
        0,
        MAX_EXTERNAL_REWARD_SHARED_PERCENT,
        |p| &mut p.external_reward_shared_percent,
    )
}

pub fn set_bootstrap(
    e: &Env,
    admin: &Address,
    epochs: u64,
    percent: u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(epochs, 0, MAX_BOOTSTRAP_EPOCHS)?;
    check_range(
        percent,
        MIN_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT,
        MAX_BOOTSTRAP_SUPPLY_EXPANSION_PERCENT,
    )?;
    let mut policy = read_policy(e)?;
    let (old_epochs, old_percent) = (
        policy.bootstrap_epochs,
        policy.bootstrap_expansion_percent,
    );
    policy.bootstrap_epochs = epochs;
    policy.bootstrap_expansion_percent = percent;
    write_policy(e, &policy);
    emit_parameter_changed(e, "bootstrap_epochs", old_epochs, epochs, admin);
    emit_parameter_changed(
        e,
        "bootstrap_supply_expansion_percent",
        old_percent,
        percent,
        admin,
    );
    Ok(())
}

pub fn set_allocate_seigniorage_salary(
    e: &Env,
    admin: &Address,
    value: i128,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(value, 0, MAX_ALLOCATE_SEIGNIORAGE_SALARY)?;
    let mut policy = read_policy(e)?;
    let old = policy.allocate_seigniorage_salary;
    policy.allocate_seigniorage_salary = value;
    write_policy(e, &policy);
    emit_parameter_changed(e, "allocate_seigniorage_salary", old, value, admin);
    Ok(())
}

// ============================================================================
// Bond setters
// ============================================================================

pub fn set_max_discount_rate(e: &Env, admin: &Address, value: i128) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_rate_clamp(value)?;
    let mut bonds = read_bonds(e)?;
    let old = bonds.max_discount_rate;
    bonds.max_discount_rate = value;
    write_bonds(e, &bonds);
    emit_parameter_changed(e, "max_discount_rate", old, value, admin);
    Ok(())
}

pub fn set_max_premium_rate(e: &Env, admin: &Address, value: i128) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_rate_clamp(value)?;
    let mut bonds = read_bonds(e)?;
    let old = bonds.max_premium_rate;
    bonds.max_premium_rate = value;
    write_bonds(e, &bonds);
    emit_parameter_changed(e, "max_premium_rate", old, value, admin);
    Ok(())
}

fn update_bond_percent(
    e: &Env,
    admin: &Address,
    name: &str,
    value: u32,
    max: u32,
    field: fn(&mut BondConfig) -> &mut u32,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(value, 0, max)?;
    let mut bonds = read_bonds(e)?;
    let slot = field(&mut bonds);
    let old = *slot;
    *slot = value;
    write_bonds(e, &bonds);
    emit_parameter_changed(e, name, old, value, admin);
    Ok(())
}

pub fn set_discount_percent(e: &Env, admin: &Address, value: u32) -> Result<(), ContractError> {
    update_bond_percent(e, admin, "discount_percent", value, MAX_CURVE_PERCENT, |b| {
        &mut b.discount_percent
    })
}

pub fn set_premium_percent(e: &Env, admin: &Address, value: u32) -> Result<(), ContractError> {
    update_bond_percent(e, admin, "premium_percent", value, MAX_CURVE_PERCENT, |b| {
        &mut b.premium_percent
    })
}

pub fn set_incentive_percent(e: &Env, admin: &Address, value: u32) -> Result<(), ContractError> {
    update_bond_percent(
        e,
        admin,
        "incentive_percent",
        value,
        MAX_INCENTIVE_PERCENT,
        |b| &mut b.incentive_percent,
    )
}

pub fn set_contraction_redeem_penalty_percent(
    e: &Env,
    admin: &Address,
    value: u32,
) -> Result<(), ContractError> {
    update_bond_percent(
        e,
        admin,
        "contraction_redeem_penalty_percent",
        value,
        MAX_CONTRACTION_REDEEM_PENALTY_PERCENT,
        |b| &mut b.redeem_penalty_percent,
    )
}

// ============================================================================
// Coupon setters
// ============================================================================

pub fn set_coupon_parameters(
    e: &Env,
    admin: &Address,
    coupons: CouponConfig,
) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(coupons.discount_percent, 0, MAX_CURVE_PERCENT)?;
    check_range(coupons.premium_percent, 0, MAX_CURVE_PERCENT)?;
    check_rate_clamp(coupons.max_discount_rate)?;
    check_rate_clamp(coupons.max_premium_rate)?;
    check_range(
        coupons.max_redeem_percent_per_epoch,
        0,
        MAX_REDEEMABLE_COUPON_PERCENT,
    )?;
    let old = read_coupons(e)?;
    write_coupons(e, &coupons);
    emit_parameter_changed(
        e,
        "coupon_max_redeemable_percent_per_epoch",
        old.max_redeem_percent_per_epoch,
        coupons.max_redeem_percent_per_epoch,
        admin,
    );
    emit_parameter_changed(
        e,
        "coupon_discount_percent",
        old.discount_percent,
        coupons.discount_percent,
        admin,
    );
    emit_parameter_changed(
        e,
        "coupon_premium_percent",
        old.premium_percent,
        coupons.premium_percent,
        admin,
    );
    emit_parameter_changed(
        e,
        "coupon_max_discount_rate",
        old.max_discount_rate,
        coupons.max_discount_rate,
        admin,
    );
    emit_parameter_changed(
        e,
        "coupon_max_premium_rate",
        old.max_premium_rate,
        coupons.max_premium_rate,
        admin,
    );
    Ok(())
}

// ============================================================================
// Side funds
// ============================================================================

pub fn set_extra_funds(e: &Env, admin: &Address, funds: FundConfig) -> Result<(), ContractError> {
    storage::require_operator(e, admin)?;
    check_range(funds.dao_fund_shared_percent, 0, MAX_DAO_FUND_SHARED_PERCENT)?;
    check_range(
        funds.bvaults_fund_shared_percent,
        0,
        MAX_BVAULTS_FUND_SHARED_PERCENT,
    )?;
    check_range(
        funds.marketing_fund_shared_percent,
        0,
        MAX_MARKETING_FUND_SHARED_PERCENT,
    )?;
    let shares = [
        (&funds.dao_fund, funds.dao_fund_shared_percent),
        (&funds.bvaults_fund, funds.bvaults_fund_shared_percent),
        (&funds.marketing_fund, funds.marketing_fund_shared_percent),
    ];
    if shares.iter().any(|(fund, pct)| fund.is_none() && *pct > 0) {
        return Err(ContractError::FundNotSet);
    }
    let old = read_funds(e)?;
    write_funds(e, &funds);
    emit_parameter_changed(
        e,
        "dao_fund_shared_percent",
        old.dao_fund_shared_percent,
        funds.dao_fund_shared_percent,
        admin,
    );
    emit_parameter_changed(
        e,
        "bvaults_fund_shared_percent",
        old.bvaults_fund_shared_percent,
        funds.bvaults_fund_shared_percent,
        admin,
    );
    emit_parameter_changed(
        e,
        "marketing_fund_shared_percent",
        old.marketing_fund_shared_percent,
        funds.marketing_fund_shared_percent,
        admin,
    );
    Ok(())
}

// ============================================================================
// Event Emission
// ============================================================================

/// Publish `parameter_changed` with `(name, old, new, admin, timestamp)`.
pub fn emit_parameter_changed<V>(e: &Env, parameter: &str, old_value: V, new_value: V, updated_by: &Address)
where
    V: IntoVal<Env, Val>,
    Val: TryFromVal<Env, V>,
{
    let timestamp = e.ledger().timestamp();
    e.events().publish(
        (Symbol::new(e, "parameter_changed"),),
        (
            String::from_str(e, parameter),
            old_value,
            new_value,
            updated_by.clone(),
            timestamp,
        ),
    );
}
