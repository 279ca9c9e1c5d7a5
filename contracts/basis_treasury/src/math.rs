//! Overflow-safe arithmetic and the rate curves of the bond and coupon markets.
//!
//! Every helper returns `ContractError` instead of panicking so entry points can
//! propagate arithmetic failures with `?`.

use basis_errors::ContractError;

/// 1.0 in price precision (18 decimals).
pub const PRICE_ONE: i128 = 1_000_000_000_000_000_000;

/// 100% in basis points.
pub const BPS: u32 = 10_000;

#[inline]
pub fn add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(ContractError::Overflow)
}

#[inline]
pub fn sub(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_sub(b).ok_or(ContractError::Underflow)
}

/// `a * b / denominator`, rounding toward zero.
#[inline]
pub fn mul_div(a: i128, b: i128, denominator: i128) -> Result<i128, ContractError> {
    if denominator == 0 {
        return Err(ContractError::DivisionByZero);
    }
    a.checked_mul(b)
        .ok_or(ContractError::Overflow)?
        .checked_div(denominator)
        .ok_or(ContractError::Overflow)
}

/// `amount * bps / 10_000`.
#[inline]
pub fn apply_bps(amount: i128, bps: u32) -> Result<i128, ContractError> {
    mul_div(amount, bps as i128, BPS as i128)
}

/// A basis-point percentage expressed as a price delta (`100 bps -> 0.01`).
#[inline]
pub fn bps_to_price(bps: u32) -> i128 {
    PRICE_ONE / BPS as i128 * bps as i128
}

/// `amount * rate / PRICE_ONE`.
#[inline]
pub fn at_rate(amount: i128, rate: i128) -> Result<i128, ContractError> {
    mul_div(amount, rate, PRICE_ONE)
}

/// Price delta above the peg, clamped to `cap_bps`. Zero at or below the peg.
pub fn capped_expansion(price: i128, price_one: i128, cap_bps: u32) -> i128 {
    if price <= price_one {
        return 0;
    }
    let delta = price - price_one;
    let cap = bps_to_price(cap_bps);
    if delta > cap {
        cap
    } else {
        delta
    }
}

/// Units received per unit burned below the peg.
///
/// `price_one + (price_one / price - price_one) * discount_percent`, clamped to
/// `max_rate` when it is non-zero. Returns 0 above the peg.
pub fn discount_rate(
    price: i128,
    price_one: i128,
    discount_percent: u32,
    max_rate: i128,
) -> Result<i128, ContractError> {
    if price <= 0 {
        return Err(ContractError::OracleReadFailed);
    }
    if price > price_one {
        return Ok(0);
    }
    if discount_percent == 0 {
        return Ok(price_one);
    }
    let per_unit = mul_div(price_one, PRICE_ONE, price)?;
    let discount = apply_bps(sub(per_unit, price_one)?, discount_percent)?;
    let rate = add(price_one, discount)?;
    if max_rate > 0 && rate > max_rate {
        Ok(max_rate)
    } else {
        Ok(rate)
    }
}

/// Units paid per unit redeemed above the ceiling.
///
/// `price_one + (price - price_one) * premium_percent`, clamped to `max_rate`
/// when it is non-zero. Returns 0 at or below the ceiling.
pub fn premium_rate(
    price: i128,
    price_one: i128,
    price_ceiling: i128,
    premium_percent: u32,
    max_rate: i128,
) -> Result<i128, ContractError> {
    if price <= price_ceiling {
        return Ok(0);
    }
    if premium_percent == 0 {
        return Ok(price_one);
    }
    let premium = apply_bps(sub(price, price_one)?, premium_percent)?;
    let rate = add(price_one, premium)?;
    if max_rate > 0 && rate > max_rate {
        Ok(max_rate)
    } else {
        Ok(rate)
    }
}

/// Bond redemption tax from the two-epoch contraction lookback, in bps paid out.
pub fn redeem_tax_rate(contraction_last_epoch: bool, contraction_two_epochs_ago: bool) -> u32 {
    if contraction_last_epoch {
        9_000
    } else if contraction_two_epochs_ago {
        9_500
    } else {
        BPS
    }
}

/// Peel `percents` off `amount` one after another, each against what is left.
/// Returns the peeled parts and the remainder.
pub fn peel_sequential(amount: i128, percents: [u32; 3]) -> Result<([i128; 3], i128), ContractError> {
    let mut parts = [0_i128; 3];
    let mut remaining = amount;
    for (part, percent) in parts.iter_mut().zip(percents.iter()) {
        *part = apply_bps(remaining, *percent)?;
        remaining = sub(remaining, *part)?;
    }
    Ok((parts, remaining))
}

/// Debt-phase split of `seigniorage` into (boardroom, bond reserve top-up).
///
/// The boardroom receives `expansion_floor_percent` of the seigniorage. The
/// rest is scaled by `minting_factor` and clamped so the two parts together
/// never exceed `mint_cap`.
pub fn debt_phase_split(
    seigniorage: i128,
    expansion_floor_percent: u32,
    minting_factor: u32,
    mint_cap: i128,
) -> Result<(i128, i128), ContractError> {
    let to_boardroom = apply_bps(seigniorage, expansion_floor_percent)?;
    let mut to_reserve = sub(seigniorage, to_boardroom)?;
    if minting_factor > 0 {
        to_reserve = apply_bps(to_reserve, minting_factor)?;
    }
    let headroom = sub(mint_cap, to_boardroom)?.max(0);
    Ok((to_boardroom, to_reserve.min(headroom)))
}
