//! # Basis Treasury Contract
//!
//! Monetary policy engine of the Basis protocol. Once per epoch (6 hours) the
//! treasury reads the Dollar TWAP and either
//!
//! * expands supply above the ceiling, minting seigniorage for the boardroom
//!   (and, while bonds are under-reserved, for the bond reserve);
//! * or contracts, paying the boardroom from the external reward and bond
//!   incentive pools and opening a bond purchase budget for the next epoch.
//!
//! The same engine drives every registered peg token with its own oracle,
//! boardroom and coupon ledger.
//!
//! ## Storage Layout
//!
//! | Key                                   | Tier           |
//! |---------------------------------------|----------------|
//! | operator, contracts, configs, pools   | `instance()`   |
//! | peg token configs, coupon ledgers     | `persistent()` |
//! | contraction flags                     | `persistent()` |
//! | last-call sequence per caller         | `temporary()`  |
//!
//! ## Roles
//! The treasury must be operator of Dollar, Bond, Share, the main boardroom and
//! every peg token it expands. Governance calls take an explicit `admin`
//! address that must equal the stored operator.

#![no_std]

pub mod bond_market;
pub mod coupon_market;
pub mod distribution;
pub mod epoch;
pub mod events;
pub mod guard;
pub mod interfaces;
pub mod math;
pub mod oracle;
pub mod parameters;
pub mod peg_tokens;
pub mod seigniorage;
pub mod storage;
pub mod supply;
pub mod types;

pub use basis_errors::ContractError;
pub use types::*;

use soroban_sdk::{contract, contractimpl, token::TokenClient, Address, Env, Vec};

use interfaces::ManagedAssetClient;
use math::add;

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod test_bonds;
#[cfg(test)]
mod test_coupons;
#[cfg(test)]
mod test_governance;

#[contract]
pub struct BasisTreasury;

#[contractimpl]
impl BasisTreasury {
    // ─── Lifecycle ─────────────────────────────────────────────────────────

    /// One-shot setup. Dollar already held by the treasury becomes the bond
    /// reserve.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        e: Env,
        admin: Address,
        dollar: Address,
        bond: Address,
        share: Address,
        dollar_oracle: Address,
        boardroom: Address,
        start_time: u64,
    ) -> Result<(), ContractError> {
        admin.require_auth();
        if storage::is_initialized(&e) {
            return Err(ContractError::AlreadyInitialized);
        }
        let saved = TokenClient::new(&e, &dollar).balance(&e.current_contract_address());

        storage::write_operator(&e, &admin);
        storage::write_contracts(
            &e,
            &ManagedContracts {
                dollar,
                bond,
                share,
                dollar_oracle,
                boardroom,
            },
        );
        let policy = parameters::default_policy();
        storage::write_amount(&e, &DataKey::PreviousEpochDollarPrice, policy.price_one);
        parameters::write_policy(&e, &policy);
        parameters::write_bonds(&e, &parameters::default_bonds());
        parameters::write_coupons(&e, &parameters::default_coupons());
        parameters::write_funds(&e, &parameters::default_funds());

        let instance = e.storage().instance();
        instance.set(&DataKey::StartTime, &start_time);
        instance.set(&DataKey::Epoch, &0_u64);
        instance.set(&DataKey::Migrated, &false);
        storage::write_amount(&e, &DataKey::SeigniorageSaved, saved);
        storage::extend_instance(&e);
        Ok(())
    }

    /// Hand Dollar, Bond and Share operator roles and balances to `target`.
    /// Every later mutating call fails with `AlreadyMigrated`.
    pub fn migrate(e: Env, admin: Address, target: Address) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        let contracts = storage::read_contracts(&e)?;
        let me = e.current_contract_address();
        for asset in [&contracts.dollar, &contracts.bond, &contracts.share] {
            ManagedAssetClient::new(&e, asset).transfer_operator(&target);
            let token = TokenClient::new(&e, asset);
            let held = token.balance(&me);
            if held > 0 {
                token.transfer(&me, &target, &held);
            }
        }
        e.storage().instance().set(&DataKey::Migrated, &true);
        events::emit_treasury_migrated(&e, &target);
        Ok(())
    }

    // ─── Epoch ─────────────────────────────────────────────────────────────

    /// Close the current epoch. Anyone may call once the epoch has elapsed.
    pub fn allocate_seigniorage(e: Env, caller: Address) -> Result<EpochReport, ContractError> {
        seigniorage::allocate_seigniorage(&e, &caller)
    }

    /// Deposit Dollar into the external reward pool shared out in contraction
    /// epochs.
    pub fn fund_external_reward(e: Env, from: Address, amount: i128) -> Result<(), ContractError> {
        from.require_auth();
        storage::require_active(&e)?;
        if amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let contracts = storage::read_contracts(&e)?;
        TokenClient::new(&e, &contracts.dollar).transfer(
            &from,
            &e.current_contract_address(),
            &amount,
        );
        let pool = add(
            storage::read_amount(&e, &DataKey::ExternalRewardAmount),
            amount,
        )?;
        storage::write_amount(&e, &DataKey::ExternalRewardAmount, pool);
        events::emit_external_reward_funded(&e, &from, amount, pool);
        Ok(())
    }

    // ─── Bonds ─────────────────────────────────────────────────────────────

    pub fn buy_bonds(
        e: Env,
        buyer: Address,
        dollar_amount: i128,
        target_price: i128,
    ) -> Result<i128, ContractError> {
        bond_market::buy_bonds(&e, &buyer, dollar_amount, target_price)
    }

    pub fn redeem_bonds(
        e: Env,
        holder: Address,
        bond_amount: i128,
        target_price: i128,
    ) -> Result<i128, ContractError> {
        bond_market::redeem_bonds(&e, &holder, bond_amount, target_price)
    }

    // ─── Coupons ───────────────────────────────────────────────────────────

    pub fn buy_coupons(
        e: Env,
        buyer: Address,
        peg_token: Address,
        amount: i128,
        target_price: i128,
    ) -> Result<i128, ContractError> {
        coupon_market::buy_coupons(&e, &buyer, &peg_token, amount, target_price)
    }

    pub fn redeem_coupons(
        e: Env,
        holder: Address,
        peg_token: Address,
        purchase_epoch: u64,
        coupon_amount: i128,
        target_price: i128,
    ) -> Result<i128, ContractError> {
        coupon_market::redeem_coupons(
            &e,
            &holder,
            &peg_token,
            purchase_epoch,
            coupon_amount,
            target_price,
        )
    }

    // ─── Governance: roles and contracts ───────────────────────────────────

    pub fn set_operator(e: Env, admin: Address, operator: Address) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        storage::write_operator(&e, &operator);
        parameters::emit_parameter_changed(&e, "operator", admin.clone(), operator, &admin);
        Ok(())
    }

    pub fn set_boardroom(e: Env, admin: Address, boardroom: Address) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        let mut contracts = storage::read_contracts(&e)?;
        let old = contracts.boardroom.clone();
        contracts.boardroom = boardroom.clone();
        storage::write_contracts(&e, &contracts);
        parameters::emit_parameter_changed(&e, "boardroom", old, boardroom, &admin);
        Ok(())
    }

    pub fn set_dollar_oracle(e: Env, admin: Address, oracle: Address) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        let mut contracts = storage::read_contracts(&e)?;
        let old = contracts.dollar_oracle.clone();
        contracts.dollar_oracle = oracle.clone();
        storage::write_contracts(&e, &contracts);
        parameters::emit_parameter_changed(&e, "dollar_oracle", old, oracle, &admin);
        Ok(())
    }

    /// Include or exclude `account`'s Dollar balance from circulating supply.
    pub fn set_excluded_from_total_supply(
        e: Env,
        admin: Address,
        account: Address,
        excluded: bool,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        let mut accounts = storage::excluded_from_supply(&e);
        let was = accounts.first_index_of(&account);
        match (was, excluded) {
            (None, true) => accounts.push_back(account),
            (Some(i), false) => {
                accounts.remove(i);
            }
            _ => return Ok(()),
        }
        storage::write_excluded_from_supply(&e, &accounts);
        parameters::emit_parameter_changed(
            &e,
            "excluded_from_total_supply",
            was.is_some(),
            excluded,
            &admin,
        );
        Ok(())
    }

    /// Rescue tokens sent here by mistake. Protocol tokens are refused.
    pub fn governance_recover_unsupported(
        e: Env,
        admin: Address,
        token: Address,
        amount: i128,
        to: Address,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        storage::require_operator(&e, &admin)?;
        if amount <= 0 {
            return Err(ContractError::AmountMustBePositive);
        }
        let contracts = storage::read_contracts(&e)?;
        if token == contracts.dollar
            || token == contracts.bond
            || token == contracts.share
            || storage::peg_tokens(&e).contains(&token)
        {
            return Err(ContractError::ProtectedToken);
        }
        TokenClient::new(&e, &token).transfer(&e.current_contract_address(), &to, &amount);
        Ok(())
    }

    // ─── Governance: policy ────────────────────────────────────────────────

    pub fn set_price_one(e: Env, admin: Address, value: i128) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_price_one(&e, &admin, value)
    }

    pub fn set_price_ceiling(e: Env, admin: Address, value: i128) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_price_ceiling(&e, &admin, value)
    }

    pub fn set_max_expansion_percents(
        e: Env,
        admin: Address,
        normal: u32,
        debt_phase: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_max_supply_expansion_percents(&e, &admin, normal, debt_phase)
    }

    pub fn set_bond_depletion_floor_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_bond_depletion_floor_percent(&e, &admin, value)
    }

    pub fn set_max_contraction_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_max_supply_contraction_percent(&e, &admin, value)
    }

    pub fn set_max_debt_ratio_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_max_debt_ratio_percent(&e, &admin, value)
    }

    pub fn set_bootstrap(
        e: Env,
        admin: Address,
        epochs: u64,
        percent: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_bootstrap(&e, &admin, epochs, percent)
    }

    pub fn set_extra_funds(e: Env, admin: Address, funds: FundConfig) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_extra_funds(&e, &admin, funds)
    }

    pub fn set_allocate_seigniorage_salary(
        e: Env,
        admin: Address,
        value: i128,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_allocate_seigniorage_salary(&e, &admin, value)
    }

    pub fn set_minting_factor(e: Env, admin: Address, value: u32) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_minting_factor_for_paying_debt(&e, &admin, value)
    }

    pub fn set_expansion_floor_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_seigniorage_expansion_floor_percent(&e, &admin, value)
    }

    pub fn set_external_reward_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_external_reward_shared_percent(&e, &admin, value)
    }

    // ─── Governance: bond and coupon curves ────────────────────────────────

    pub fn set_max_discount_rate(e: Env, admin: Address, value: i128) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_max_discount_rate(&e, &admin, value)
    }

    pub fn set_max_premium_rate(e: Env, admin: Address, value: i128) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_max_premium_rate(&e, &admin, value)
    }

    pub fn set_discount_percent(e: Env, admin: Address, value: u32) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_discount_percent(&e, &admin, value)
    }

    pub fn set_premium_percent(e: Env, admin: Address, value: u32) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_premium_percent(&e, &admin, value)
    }

    pub fn set_incentive_percent(e: Env, admin: Address, value: u32) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_incentive_percent(&e, &admin, value)
    }

    pub fn set_redeem_penalty_percent(
        e: Env,
        admin: Address,
        value: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_contraction_redeem_penalty_percent(&e, &admin, value)
    }

    pub fn set_coupon_parameters(
        e: Env,
        admin: Address,
        coupons: CouponConfig,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        parameters::set_coupon_parameters(&e, &admin, coupons)
    }

    // ─── Governance: peg tokens ────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn add_peg_token(
        e: Env,
        admin: Address,
        token: Address,
        oracle: Address,
        boardroom: Address,
        farming_pool: Option<Address>,
        supply_target: i128,
        max_expansion_percent: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        peg_tokens::add_peg_token(
            &e,
            &admin,
            &token,
            &oracle,
            &boardroom,
            farming_pool,
            supply_target,
            max_expansion_percent,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_peg_token_config(
        e: Env,
        admin: Address,
        token: Address,
        oracle: Address,
        boardroom: Address,
        farming_pool: Option<Address>,
        supply_target: i128,
        max_expansion_percent: u32,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        peg_tokens::set_peg_token_config(
            &e,
            &admin,
            &token,
            &oracle,
            &boardroom,
            farming_pool,
            supply_target,
            max_expansion_percent,
        )
    }

    /// Activate `token` from `epoch_start` on; 0 deactivates it.
    pub fn set_peg_token_epoch_start(
        e: Env,
        admin: Address,
        token: Address,
        epoch_start: u64,
    ) -> Result<(), ContractError> {
        storage::require_active(&e)?;
        peg_tokens::set_peg_token_epoch_start(&e, &admin, &token, epoch_start)
    }

    // ─── Views: epoch and state ────────────────────────────────────────────

    pub fn epoch(e: Env) -> u64 {
        epoch::current(&e)
    }

    pub fn next_epoch_point(e: Env) -> u64 {
        epoch::next_epoch_point(&e)
    }

    pub fn is_contraction_epoch(e: Env, epoch: u64) -> bool {
        epoch::is_contraction(&e, epoch)
    }

    pub fn previous_epoch_dollar_price(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::PreviousEpochDollarPrice)
    }

    pub fn seigniorage_saved(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::SeigniorageSaved)
    }

    pub fn external_reward_amount(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::ExternalRewardAmount)
    }

    pub fn incentive_amount(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::IncentiveAmount)
    }

    pub fn epoch_supply_contraction_left(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::EpochSupplyContractionLeft)
    }

    pub fn is_migrated(e: Env) -> bool {
        storage::is_migrated(&e)
    }

    pub fn is_operator(e: Env, account: Address) -> bool {
        storage::read_operator(&e).map_or(false, |op| op == account)
    }

    pub fn operator(e: Env) -> Result<Address, ContractError> {
        storage::read_operator(&e)
    }

    pub fn get_config(e: Env) -> Result<TreasuryConfig, ContractError> {
        parameters::read_config(&e)
    }

    pub fn get_contracts(e: Env) -> Result<ManagedContracts, ContractError> {
        storage::read_contracts(&e)
    }

    pub fn get_excluded_from_total_supply(e: Env) -> Vec<Address> {
        storage::excluded_from_supply(&e)
    }

    // ─── Views: Dollar ─────────────────────────────────────────────────────

    /// Last published Dollar TWAP.
    pub fn get_dollar_price(e: Env) -> Result<i128, ContractError> {
        let contracts = storage::read_contracts(&e)?;
        oracle::read_price(&e, &contracts.dollar_oracle, &contracts.dollar)
    }

    /// Dollar TWAP including the still-open oracle window.
    pub fn get_dollar_updated_price(e: Env) -> Result<i128, ContractError> {
        let contracts = storage::read_contracts(&e)?;
        oracle::read_twap(&e, &contracts.dollar_oracle, &contracts.dollar)
    }

    pub fn get_dollar_circulating_supply(e: Env) -> Result<i128, ContractError> {
        let contracts = storage::read_contracts(&e)?;
        supply::dollar_circulating(&e, &contracts)
    }

    pub fn get_reserve(e: Env) -> i128 {
        storage::read_amount(&e, &DataKey::SeigniorageSaved)
    }

    pub fn get_bond_discount_rate(e: Env) -> Result<i128, ContractError> {
        bond_market::bond_discount_rate(&e)
    }

    pub fn get_bond_premium_rate(e: Env) -> Result<i128, ContractError> {
        bond_market::bond_premium_rate(&e)
    }

    /// Share of a premium bond redemption paid out, in basis points.
    pub fn get_redeem_tax_rate(e: Env) -> u32 {
        bond_market::current_redeem_tax_rate(&e)
    }

    pub fn get_burnable_dollar_left(e: Env) -> Result<i128, ContractError> {
        bond_market::burnable_dollar_left(&e)
    }

    pub fn get_redeemable_bonds(e: Env) -> Result<i128, ContractError> {
        bond_market::redeemable_bonds(&e)
    }

    // ─── Views: peg tokens and coupons ─────────────────────────────────────

    pub fn get_peg_tokens(e: Env) -> Vec<Address> {
        peg_tokens::registered(&e)
    }

    pub fn get_peg_token_config(e: Env, token: Address) -> Result<PegTokenConfig, ContractError> {
        storage::read_peg_token(&e, &token)
    }

    pub fn get_peg_token_price(e: Env, token: Address) -> Result<i128, ContractError> {
        let config = storage::read_peg_token(&e, &token)?;
        oracle::read_price(&e, &config.oracle, &token)
    }

    pub fn get_peg_token_circulating_supply(e: Env, token: Address) -> Result<i128, ContractError> {
        let config = storage::read_peg_token(&e, &token)?;
        supply::peg_token_circulating(&e, &token, &config)
    }

    pub fn get_peg_token_expansion_rate(e: Env, token: Address) -> Result<i128, ContractError> {
        let policy = parameters::read_policy(&e)?;
        peg_tokens::expansion_rate(&e, &token, &policy)
    }

    pub fn get_coupon_balance(e: Env, token: Address, holder: Address) -> Result<i128, ContractError> {
        coupon_market::balance(&e, &token, &holder)
    }

    pub fn get_coupon_purchased(e: Env, token: Address, holder: Address, epoch: u64) -> i128 {
        coupon_market::purchased(&e, &token, &holder, epoch)
    }

    pub fn get_coupon_epochs(e: Env, token: Address, holder: Address) -> Vec<u64> {
        coupon_market::epochs_of(&e, &token, &holder)
    }

    pub fn get_coupon_supply(e: Env, token: Address) -> i128 {
        coupon_market::totals(&e, &token).supply
    }

    pub fn get_coupons_issued(e: Env, token: Address) -> i128 {
        coupon_market::totals(&e, &token).issued
    }

    pub fn get_coupons_redeemed(e: Env, token: Address) -> i128 {
        coupon_market::totals(&e, &token).redeemed
    }

    pub fn get_coupon_redeemed_in_epoch(e: Env, token: Address, epoch: u64) -> i128 {
        coupon_market::redeemed_in_epoch(&e, &token, epoch)
    }

    pub fn get_coupon_discount_rate(e: Env, token: Address) -> Result<i128, ContractError> {
        coupon_market::coupon_discount_rate(&e, &token)
    }

    pub fn get_coupon_premium_rate(e: Env, token: Address) -> Result<i128, ContractError> {
        coupon_market::coupon_premium_rate(&e, &token)
    }

    pub fn get_burnable_peg_token_left(e: Env, token: Address) -> Result<i128, ContractError> {
        coupon_market::burnable_peg_token_left(&e, &token)
    }
}
