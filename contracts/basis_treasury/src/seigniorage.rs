//! Epoch transition: read the Dollar price, decide between bootstrap,
//! expansion and contraction, distribute, then advance the epoch.

use basis_errors::ContractError;
use soroban_sdk::{token::TokenClient, Address, Env};

use crate::distribution::{send_to_boardroom, Distribution};
use crate::interfaces::{ManagedAssetClient, RewardPoolClient};
use crate::math::{add, apply_bps, at_rate, capped_expansion, debt_phase_split, sub};
use crate::types::{DataKey, EpochReport, FundConfig, ManagedContracts, PolicyConfig};
use crate::{epoch, events, guard, oracle, parameters, peg_tokens, storage, supply};

/// Close the current epoch. `caller` receives the salary, if one is set.
pub fn allocate_seigniorage(e: &Env, caller: &Address) -> Result<EpochReport, ContractError> {
    caller.require_auth();
    storage::require_active(e)?;
    guard::with_slot_guard(e, caller, || run_epoch(e, caller))
}

/// The treasury must still hold every role it exercises during the epoch,
/// including those over active peg tokens and their boardrooms.
fn check_operator_roles(e: &Env, contracts: &ManagedContracts) -> Result<(), ContractError> {
    let me = e.current_contract_address();
    for asset in [&contracts.dollar, &contracts.bond, &contracts.share] {
        if ManagedAssetClient::new(e, asset).operator() != me {
            return Err(ContractError::TreasuryNotOperator);
        }
    }
    if RewardPoolClient::new(e, &contracts.boardroom).operator() != me {
        return Err(ContractError::TreasuryNotOperator);
    }
    let current = epoch::current(e);
    for token in storage::peg_tokens(e).iter() {
        let config = storage::read_peg_token(e, &token)?;
        if !peg_tokens::is_active(&config, current) {
            continue;
        }
        if ManagedAssetClient::new(e, &token).operator() != me
            || RewardPoolClient::new(e, &config.boardroom).operator() != me
        {
            return Err(ContractError::TreasuryNotOperator);
        }
    }
    Ok(())
}

fn run_epoch(e: &Env, caller: &Address) -> Result<EpochReport, ContractError> {
    epoch::require_open(e)?;
    let contracts = storage::read_contracts(e)?;
    check_operator_roles(e, &contracts)?;
    let policy = parameters::read_policy(e)?;
    let funds = parameters::read_funds(e)?;

    oracle::refresh(e, &contracts.dollar_oracle);
    let price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    storage::write_amount(e, &DataKey::PreviousEpochDollarPrice, price);

    let current = epoch::current(e);
    let mut report = EpochReport {
        epoch: current,
        dollar_price: price,
        boardroom_seigniorage: 0,
        reserve_top_up: 0,
        external_reward_paid: 0,
        contraction: false,
    };

    if current < policy.bootstrap_epochs {
        let circulating = supply::dollar_circulating(e, &contracts)?;
        let amount = apply_bps(circulating, policy.bootstrap_expansion_percent)?;
        send_to_boardroom(e, &contracts, &funds, amount)?;
        report.boardroom_seigniorage = amount;
    } else if price > policy.price_ceiling {
        expand(e, &contracts, &policy, &funds, price, &mut report)?;
    } else {
        contract_supply(e, &contracts, &policy, &mut report)?;
    }

    if policy.allocate_seigniorage_salary > 0 {
        ManagedAssetClient::new(e, &contracts.dollar)
            .mint(caller, &policy.allocate_seigniorage_salary);
    }

    for token in storage::peg_tokens(e).iter() {
        let config = storage::read_peg_token(e, &token)?;
        if peg_tokens::is_active(&config, current) {
            peg_tokens::allocate(e, &token, &policy, &funds)?;
        }
    }

    epoch::advance(e)?;
    let fresh_price = oracle::read_price(e, &contracts.dollar_oracle, &contracts.dollar)?;
    let contraction_left = if fresh_price > policy.price_ceiling {
        0
    } else {
        apply_bps(
            supply::dollar_circulating(e, &contracts)?,
            policy.max_supply_contraction_percent,
        )?
    };
    storage::write_amount(e, &DataKey::EpochSupplyContractionLeft, contraction_left);

    events::emit_epoch_allocated(e, &report);
    Ok(report)
}

fn expand(
    e: &Env,
    contracts: &ManagedContracts,
    policy: &PolicyConfig,
    funds: &FundConfig,
    price: i128,
    report: &mut EpochReport,
) -> Result<(), ContractError> {
    let saved = storage::read_amount(e, &DataKey::SeigniorageSaved);
    let circulating = supply::dollar_circulating(e, contracts)?;
    let dollar_supply = sub(circulating, saved)?.max(0);
    let bond_supply = supply::total_supply(e, &contracts.bond);

    if saved >= apply_bps(bond_supply, policy.bond_depletion_floor_percent)? {
        let rate = capped_expansion(price, policy.price_one, policy.max_supply_expansion_percent);
        let seigniorage = at_rate(dollar_supply, rate)?;
        report.boardroom_seigniorage = seigniorage;
        send_to_boardroom(e, contracts, funds, seigniorage)?;
        return Ok(());
    }

    let cap = policy.max_expansion_percent_debt;
    let seigniorage = at_rate(dollar_supply, capped_expansion(price, policy.price_one, cap))?;
    let (to_boardroom, to_reserve) = debt_phase_split(
        seigniorage,
        policy.expansion_floor_percent,
        policy.minting_factor_for_paying_debt,
        apply_bps(dollar_supply, cap)?,
    )?;

    if to_reserve > 0 {
        ManagedAssetClient::new(e, &contracts.dollar)
            .mint(&e.current_contract_address(), &to_reserve);
        storage::write_amount(e, &DataKey::SeigniorageSaved, add(saved, to_reserve)?);
        events::emit_treasury_funded(e, to_reserve);
    }
    report.reserve_top_up = to_reserve;
    report.boardroom_seigniorage = to_boardroom;
    send_to_boardroom(e, contracts, funds, to_boardroom)?;
    Ok(())
}

/// No minting. Pay the external reward share and the bond incentive pool.
fn contract_supply(
    e: &Env,
    contracts: &ManagedContracts,
    policy: &PolicyConfig,
    report: &mut EpochReport,
) -> Result<(), ContractError> {
    let pool = storage::read_amount(e, &DataKey::ExternalRewardAmount);
    let incentive = storage::read_amount(e, &DataKey::IncentiveAmount);
    let balance = TokenClient::new(e, &contracts.dollar).balance(&e.current_contract_address());

    let reward = apply_bps(pool, policy.external_reward_shared_percent)?
        .min(pool)
        .min(balance);
    let incentive_paid = incentive.min(sub(balance, reward)?.max(0));
    let total = add(reward, incentive_paid)?;

    if total > 0 {
        storage::write_amount(e, &DataKey::ExternalRewardAmount, sub(pool, reward)?);
        storage::write_amount(e, &DataKey::IncentiveAmount, sub(incentive, incentive_paid)?);
        Distribution::Dollar {
            boardroom: contracts.boardroom.clone(),
            dollar: contracts.dollar.clone(),
        }
        .deliver(e, total);
        events::emit_external_reward_shared(e, reward, incentive_paid);
    }

    epoch::mark_contraction(e, report.epoch);
    report.external_reward_paid = total;
    report.contraction = true;
    Ok(())
}
