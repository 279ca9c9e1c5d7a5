//! Bond market: burn Dollar for bonds below the peg, redeem bonds for Dollar
//! above the ceiling.

use basis_errors::ContractError;
use soroban_sdk::{token::TokenClient, Address, Env};

use crate::interfaces::ManagedAssetClient;
use crate::math::{
    add, apply_bps, at_rate, discount_rate, mul_div, premium_rate, redeem_tax_rate, sub,
    PRICE_ONE,
};
use crate::types::{DataKey, ManagedContracts};
use crate::{epoch, events, guard, oracle, parameters, storage, supply};

fn checked_price(
    e: &Env,
    contracts: &ManagedContracts,
    target_price: i128,
) -> Result<i128, ContractError> {
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    if price != target_price {
        return Err(ContractError::PriceMoved);
    }
    Ok(price)
}

/// Burn `dollar_amount` for bonds at the current discount rate.
/// Returns the bonds minted.
pub fn buy_bonds(
    e: &Env,
    buyer: &Address,
    dollar_amount: i128,
    target_price: i128,
) -> Result<i128, ContractError> {
    buyer.require_auth();
    storage::require_active(e)?;
    guard::with_slot_guard(e, buyer, || {
        if dollar_amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let contracts = storage::read_contracts(e)?;
        let policy = parameters::read_policy(e)?;
        let bonds_cfg = parameters::read_bonds(e)?;

        let price = checked_price(e, &contracts, target_price)?;
        if price >= policy.price_one {
            return Err(ContractError::NotEligibleForPurchase);
        }
        let left = storage::read_amount(e, &DataKey::EpochSupplyContractionLeft);
        if dollar_amount > left {
            return Err(ContractError::ContractionBudgetExceeded);
        }

        let rate = discount_rate(
            price,
            policy.price_one,
            bonds_cfg.discount_percent,
            bonds_cfg.max_discount_rate,
        )?;
        if rate <= 0 {
            return Err(ContractError::InvalidRate);
        }
        let bonds = at_rate(dollar_amount, rate)?;

        let dollar_supply = supply::total_supply(e, &contracts.dollar);
        let new_bond_supply = add(supply::total_supply(e, &contracts.bond), bonds)?;
        if new_bond_supply > apply_bps(dollar_supply, policy.max_debt_ratio_percent)? {
            return Err(ContractError::OverMaxDebtRatio);
        }

        let dollar = TokenClient::new(e, &contracts.dollar);
        let incentive = apply_bps(dollar_amount, bonds_cfg.incentive_percent)?;
        if incentive > 0 {
            dollar.transfer(buyer, &e.current_contract_address(), &incentive);
            let pool = storage::read_amount(e, &DataKey::IncentiveAmount);
            storage::write_amount(e, &DataKey::IncentiveAmount, add(pool, incentive)?);
        }
        dollar.burn(buyer, &sub(dollar_amount, incentive)?);
        ManagedAssetClient::new(e, &contracts.bond).mint(buyer, &bonds);

        storage::write_amount(
            e,
            &DataKey::EpochSupplyContractionLeft,
            sub(left, dollar_amount)?,
        );
        oracle::refresh(e, &contracts.dollar_oracle);

        events::emit_bonds_bought(e, buyer, dollar_amount, bonds);
        Ok(bonds)
    })
}

/// Burn `bond_amount` bonds for Dollar. Above the ceiling the payout comes
/// from the reserve at the premium rate less the redemption tax; below the
/// peg, if enabled, it is minted at the contraction penalty.
/// Returns the Dollar paid.
pub fn redeem_bonds(
    e: &Env,
    holder: &Address,
    bond_amount: i128,
    target_price: i128,
) -> Result<i128, ContractError> {
    holder.require_auth();
    storage::require_active(e)?;
    guard::with_slot_guard(e, holder, || {
        if bond_amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let contracts = storage::read_contracts(e)?;
        let policy = parameters::read_policy(e)?;
        let bonds_cfg = parameters::read_bonds(e)?;
        let price = checked_price(e, &contracts, target_price)?;

        let payout = if price > policy.price_ceiling {
            let rate = premium_rate(
                price,
                policy.price_one,
                policy.price_ceiling,
                bonds_cfg.premium_percent,
                bonds_cfg.max_premium_rate,
            )?;
            if rate <= 0 {
                return Err(ContractError::InvalidRate);
            }
            let payout = apply_bps(at_rate(bond_amount, rate)?, current_redeem_tax_rate(e))?;
            if payout > available_reserve(e, &contracts)? {
                return Err(ContractError::InsufficientReserve);
            }
            let saved = storage::read_amount(e, &DataKey::SeigniorageSaved);
            storage::write_amount(e, &DataKey::SeigniorageSaved, sub(saved, saved.min(payout))?);

            TokenClient::new(e, &contracts.bond).burn(holder, &bond_amount);
            TokenClient::new(e, &contracts.dollar).transfer(
                &e.current_contract_address(),
                holder,
                &payout,
            );
            payout
        } else if price < policy.price_one && bonds_cfg.redeem_penalty_percent > 0 {
            let penalty = apply_bps(bond_amount, bonds_cfg.redeem_penalty_percent)?;
            let payout = sub(bond_amount, penalty)?;
            TokenClient::new(e, &contracts.bond).burn(holder, &bond_amount);
            ManagedAssetClient::new(e, &contracts.dollar).mint(holder, &payout);
            payout
        } else {
            return Err(ContractError::NotEligibleForRedemption);
        };

        oracle::refresh(e, &contracts.dollar_oracle);
        events::emit_bonds_redeemed(e, holder, bond_amount, payout);
        Ok(payout)
    })
}

// ─── Views ─────────────────────────────────────────────────────────────────

/// Dollar held by the treasury that is not earmarked for reward pools.
pub fn available_reserve(e: &Env, contracts: &ManagedContracts) -> Result<i128, ContractError> {
    let balance = TokenClient::new(e, &contracts.dollar).balance(&e.current_contract_address());
    let earmarked = add(
        storage::read_amount(e, &DataKey::ExternalRewardAmount),
        storage::read_amount(e, &DataKey::IncentiveAmount),
    )?;
    Ok(sub(balance, earmarked)?.max(0))
}

/// Share of a premium redemption paid out, from the contraction lookback.
pub fn current_redeem_tax_rate(e: &Env) -> u32 {
    let (last, before) = epoch::contraction_lookback(e);
    redeem_tax_rate(last, before)
}

pub fn bond_discount_rate(e: &Env) -> Result<i128, ContractError> {
    let contracts = storage::read_contracts(e)?;
    let policy = parameters::read_policy(e)?;
    let cfg = parameters::read_bonds(e)?;
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    discount_rate(
        price,
        policy.price_one,
        cfg.discount_percent,
        cfg.max_discount_rate,
    )
}

pub fn bond_premium_rate(e: &Env) -> Result<i128, ContractError> {
    let contracts = storage::read_contracts(e)?;
    let policy = parameters::read_policy(e)?;
    let cfg = parameters::read_bonds(e)?;
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    premium_rate(
        price,
        policy.price_one,
        policy.price_ceiling,
        cfg.premium_percent,
        cfg.max_premium_rate,
    )
}

/// Dollar that can still be burned for bonds this epoch: the contraction
/// budget, limited by the room left under the debt ratio.
pub fn burnable_dollar_left(e: &Env) -> Result<i128, ContractError> {
    let contracts = storage::read_contracts(e)?;
    let policy = parameters::read_policy(e)?;
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    if price >= policy.price_one {
        return Ok(0);
    }
    let rate = bond_discount_rate(e)?;
    if rate <= 0 {
        return Ok(0);
    }
    let max_bonds = apply_bps(
        supply::total_supply(e, &contracts.dollar),
        policy.max_debt_ratio_percent,
    )?;
    let room = sub(max_bonds, supply::total_supply(e, &contracts.bond))?;
    if room <= 0 {
        return Ok(0);
    }
    let left = storage::read_amount(e, &DataKey::EpochSupplyContractionLeft);
    Ok(left.min(mul_div(room, PRICE_ONE, rate)?))
}

/// Bonds the current reserve can redeem at the premium rate.
pub fn redeemable_bonds(e: &Env) -> Result<i128, ContractError> {
    let contracts = storage::read_contracts(e)?;
    let policy = parameters::read_policy(e)?;
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    if price <= policy.price_ceiling {
        return Ok(0);
    }
    let rate = bond_premium_rate(e)?;
    if rate <= 0 {
        return Ok(0);
    }
    mul_div(available_reserve(e, &contracts)?, PRICE_ONE, rate)
}
