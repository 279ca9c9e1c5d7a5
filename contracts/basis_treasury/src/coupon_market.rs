//! Coupon market for peg tokens.
//!
//! Coupons are not a token. A purchase burns peg tokens and records the coupon
//! amount against `(peg_token, holder, purchase_epoch)`; redemption pays
//! freshly minted peg tokens at the premium rate. Redemptions of one peg token
//! within one epoch are capped across all holders by a snapshot of
//! `total_supply * max_redeem_percent_per_epoch` taken at the epoch's
//! first redemption.

use basis_errors::ContractError;
use soroban_sdk::{token::TokenClient, Address, Env, Vec};

use crate::interfaces::ManagedAssetClient;
use crate::math::{add, apply_bps, at_rate, discount_rate, mul_div, premium_rate, sub, PRICE_ONE};
use crate::types::{CouponTotals, DataKey, PegTokenConfig};
use crate::{epoch, events, guard, oracle, parameters, peg_tokens, storage, supply};

// ─── Ledger helpers ────────────────────────────────────────────────────────

pub fn totals(e: &Env, token: &Address) -> CouponTotals {
    storage::read_persistent(e, &DataKey::CouponTotals(token.clone())).unwrap_or_default()
}

pub fn purchased(e: &Env, token: &Address, holder: &Address, epoch: u64) -> i128 {
    storage::read_persistent(
        e,
        &DataKey::CouponPurchased(token.clone(), holder.clone(), epoch),
    )
    .unwrap_or(0)
}

pub fn epochs_of(e: &Env, token: &Address, holder: &Address) -> Vec<u64> {
    storage::read_persistent(e, &DataKey::CouponEpochs(token.clone(), holder.clone()))
        .unwrap_or_else(|| Vec::new(e))
}

pub fn redeemed_in_epoch(e: &Env, token: &Address, epoch: u64) -> i128 {
    storage::read_persistent(e, &DataKey::CouponRedeemedInEpoch(token.clone(), epoch))
        .unwrap_or(0)
}

/// Outstanding coupons of `holder` across all purchase epochs.
pub fn balance(e: &Env, token: &Address, holder: &Address) -> Result<i128, ContractError> {
    let mut total = 0_i128;
    for ep in epochs_of(e, token, holder).iter() {
        total = add(total, purchased(e, token, holder, ep))?;
    }
    Ok(total)
}

fn checked_price(
    e: &Env,
    token: &Address,
    config: &PegTokenConfig,
    target_price: i128,
) -> Result<i128, ContractError> {
    let price = oracle::read_price(e, &config.oracle, token)?;
    if price != target_price {
        return Err(ContractError::PriceMoved);
    }
    Ok(price)
}

// ─── Rates and room ────────────────────────────────────────────────────────

pub fn coupon_discount_rate(e: &Env, token: &Address) -> Result<i128, ContractError> {
    let config = storage::read_peg_token(e, token)?;
    let policy = parameters::read_policy(e)?;
    let cfg = parameters::read_coupons(e)?;
    let price = oracle::read_price(e, &config.oracle, token)?;
    discount_rate(
        price,
        policy.price_one,
        cfg.discount_percent,
        cfg.max_discount_rate,
    )
}

pub fn coupon_premium_rate(e: &Env, token: &Address) -> Result<i128, ContractError> {
    let config = storage::read_peg_token(e, token)?;
    let policy = parameters::read_policy(e)?;
    let cfg = parameters::read_coupons(e)?;
    let price = oracle::read_price(e, &config.oracle, token)?;
    premium_rate(
        price,
        policy.price_one,
        policy.price_ceiling,
        cfg.premium_percent,
        cfg.max_premium_rate,
    )
}

/// `(circulating * max_debt_ratio - coupon_supply) / rate`, floored at 0.
fn burnable_room(
    e: &Env,
    token: &Address,
    config: &PegTokenConfig,
    rate: i128,
) -> Result<i128, ContractError> {
    if rate <= 0 {
        return Ok(0);
    }
    let policy = parameters::read_policy(e)?;
    let circulating = supply::peg_token_circulating(e, token, config)?;
    let max_coupons = apply_bps(circulating, policy.max_debt_ratio_percent)?;
    let room = sub(max_coupons, totals(e, token).supply)?;
    if room <= 0 {
        return Ok(0);
    }
    mul_div(room, PRICE_ONE, rate)
}

pub fn burnable_peg_token_left(e: &Env, token: &Address) -> Result<i128, ContractError> {
    let config = storage::read_peg_token(e, token)?;
    let policy = parameters::read_policy(e)?;
    let price = oracle::read_price(e, &config.oracle, token)?;
    if price >= policy.price_one {
        return Ok(0);
    }
    let rate = coupon_discount_rate(e, token)?;
    burnable_room(e, token, &config, rate)
}

// ─── Entry points ──────────────────────────────────────────────────────────

/// Burn `amount` of `token` for coupons. Returns the coupons recorded.
pub fn buy_coupons(
    e: &Env,
    buyer: &Address,
    token: &Address,
    amount: i128,
    target_price: i128,
) -> Result<i128, ContractError> {
    buyer.require_auth();
    storage::require_active(e)?;
    guard::with_slot_guard(e, buyer, || {
        if amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let current = epoch::current(e);
        let config = peg_tokens::require_active(e, token, current)?;
        let policy = parameters::read_policy(e)?;
        let cfg = parameters::read_coupons(e)?;

        let price = checked_price(e, token, &config, target_price)?;
        if price >= policy.price_one {
            return Err(ContractError::NotEligibleForPurchase);
        }
        let rate = discount_rate(
            price,
            policy.price_one,
            cfg.discount_percent,
            cfg.max_discount_rate,
        )?;
        if rate <= 0 {
            return Err(ContractError::InvalidRate);
        }
        if amount > burnable_room(e, token, &config, rate)? {
            return Err(ContractError::CouponBudgetExceeded);
        }

        TokenClient::new(e, token).burn(buyer, &amount);
        let coupons = at_rate(amount, rate)?;

        let key = DataKey::CouponPurchased(token.clone(), buyer.clone(), current);
        let held = purchased(e, token, buyer, current);
        storage::write_persistent(e, &key, &add(held, coupons)?);

        let mut epochs = epochs_of(e, token, buyer);
        if !epochs.contains(current) {
            epochs.push_back(current);
            storage::write_persistent(
                e,
                &DataKey::CouponEpochs(token.clone(), buyer.clone()),
                &epochs,
            );
        }

        let mut totals = totals(e, token);
        totals.supply = add(totals.supply, coupons)?;
        totals.issued = add(totals.issued, coupons)?;
        storage::write_persistent(e, &DataKey::CouponTotals(token.clone()), &totals);

        oracle::refresh(e, &config.oracle);
        events::emit_coupons_bought(e, buyer, token, current, amount, coupons);
        Ok(coupons)
    })
}

/// Redeem coupons bought in `purchase_epoch` for freshly minted peg tokens.
/// Returns the peg tokens paid.
pub fn redeem_coupons(
    e: &Env,
    holder: &Address,
    token: &Address,
    purchase_epoch: u64,
    coupon_amount: i128,
    target_price: i128,
) -> Result<i128, ContractError> {
    holder.require_auth();
    storage::require_active(e)?;
    guard::with_slot_guard(e, holder, || {
        if coupon_amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let config = storage::read_peg_token(e, token)?;
        let policy = parameters::read_policy(e)?;
        let cfg = parameters::read_coupons(e)?;

        let price = checked_price(e, token, &config, target_price)?;
        if price <= policy.price_ceiling {
            return Err(ContractError::NotEligibleForRedemption);
        }

        let held = purchased(e, token, holder, purchase_epoch);
        if held < coupon_amount {
            return Err(ContractError::InsufficientCoupons);
        }

        let current = epoch::current(e);
        let cap_key = DataKey::CouponEpochCap(token.clone(), current);
        let cap = match storage::read_persistent::<i128>(e, &cap_key) {
            Some(cap) => cap,
            None => {
                let cap = apply_bps(
                    supply::total_supply(e, token),
                    cfg.max_redeem_percent_per_epoch,
                )?;
                storage::write_persistent(e, &cap_key, &cap);
                cap
            }
        };
        let redeemed_now = add(redeemed_in_epoch(e, token, current), coupon_amount)?;
        if redeemed_now > cap {
            return Err(ContractError::CouponRedemptionCapExceeded);
        }

        let rate = premium_rate(
            price,
            policy.price_one,
            policy.price_ceiling,
            cfg.premium_percent,
            cfg.max_premium_rate,
        )?;
        if rate <= 0 {
            return Err(ContractError::InvalidRate);
        }
        let payout = at_rate(coupon_amount, rate)?;

        storage::write_persistent(
            e,
            &DataKey::CouponPurchased(token.clone(), holder.clone(), purchase_epoch),
            &sub(held, coupon_amount)?,
        );
        storage::write_persistent(
            e,
            &DataKey::CouponRedeemedInEpoch(token.clone(), current),
            &redeemed_now,
        );
        let mut totals = totals(e, token);
        totals.supply = sub(totals.supply, coupon_amount)?;
        totals.redeemed = add(totals.redeemed, coupon_amount)?;
        storage::write_persistent(e, &DataKey::CouponTotals(token.clone()), &totals);

        ManagedAssetClient::new(e, token).mint(holder, &payout);

        oracle::refresh(e, &config.oracle);
        events::emit_coupons_redeemed(e, holder, token, purchase_epoch, coupon_amount, payout);
        Ok(payout)
    })
}
