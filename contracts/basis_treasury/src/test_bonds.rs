#![cfg(test)]

use crate::test_helpers::*;
use crate::ContractError;
use soroban_sdk::Env;

/// Close epoch 0 in contraction at 0.97, opening a 3 Dollar budget.
fn contraction_setup(e: &Env) -> Protocol<'_> {
    let p = setup(e);
    close_epoch(e, &p, price(97));
    p
}

#[test]
fn test_buy_bonds_burns_dollar_and_mints_bonds() {
    let e = Env::default();
    let p = contraction_setup(&e);

    let bonds = p.treasury.buy_bonds(&p.holder, &UNIT, &price(97));
    // flat rate with the default zero discount
    assert_eq!(bonds, UNIT);
    assert_eq!(p.bond.balance(&p.holder), UNIT);
    assert_eq!(p.dollar.balance(&p.holder), INITIAL_DOLLAR - UNIT);
    assert_eq!(p.dollar.total_supply(), INITIAL_DOLLAR - UNIT);
    assert_eq!(p.treasury.epoch_supply_contraction_left(), 2 * UNIT);
}

#[test]
fn test_buy_bonds_with_discount_curve() {
    let e = Env::default();
    let p = setup(&e);
    p.treasury.set_discount_percent(&p.admin, &10_000);
    p.treasury.set_max_discount_rate(&p.admin, &0);
    close_epoch(&e, &p, price(80));

    // 1 / 0.8 = 1.25 bonds per Dollar
    assert_eq!(p.treasury.get_bond_discount_rate(), price(125));
    let bonds = p.treasury.buy_bonds(&p.holder, &(2 * UNIT), &price(80));
    assert_eq!(bonds, 25 * UNIT / 10);
}

#[test]
fn test_buy_bonds_rejects_moved_price() {
    let e = Env::default();
    let p = contraction_setup(&e);
    let result = p.treasury.try_buy_bonds(&p.holder, &UNIT, &price(98));
    assert_eq!(result, Err(Ok(ContractError::PriceMoved)));
}

#[test]
fn test_buy_bonds_above_peg_not_eligible() {
    let e = Env::default();
    let p = setup(&e);
    close_epoch(&e, &p, price(100));
    let result = p.treasury.try_buy_bonds(&p.holder, &UNIT, &price(100));
    assert_eq!(result, Err(Ok(ContractError::NotEligibleForPurchase)));
}

#[test]
fn test_buy_bonds_respects_contraction_budget() {
    let e = Env::default();
    let p = contraction_setup(&e);

    let result = p.treasury.try_buy_bonds(&p.holder, &(4 * UNIT), &price(97));
    assert_eq!(result, Err(Ok(ContractError::ContractionBudgetExceeded)));

    p.treasury.buy_bonds(&p.holder, &(2 * UNIT), &price(97));
    next_ledger(&e);
    let result = p.treasury.try_buy_bonds(&p.holder, &(2 * UNIT), &price(97));
    assert_eq!(result, Err(Ok(ContractError::ContractionBudgetExceeded)));
    assert_eq!(p.treasury.get_burnable_dollar_left(), UNIT);
}

#[test]
fn test_buy_bonds_respects_max_debt_ratio() {
    let e = Env::default();
    let p = setup_with_bonds(&e, 10 * UNIT);
    p.treasury.set_max_debt_ratio_percent(&p.admin, &1_000);
    close_epoch(&e, &p, price(97));

    let result = p.treasury.try_buy_bonds(&p.holder, &UNIT, &price(97));
    assert_eq!(result, Err(Ok(ContractError::OverMaxDebtRatio)));
    assert_eq!(p.treasury.get_burnable_dollar_left(), 0);
}

#[test]
fn test_buy_bonds_rejects_zero_amount() {
    let e = Env::default();
    let p = contraction_setup(&e);
    let result = p.treasury.try_buy_bonds(&p.holder, &0, &price(97));
    assert_eq!(result, Err(Ok(ContractError::AmountMustBePositive)));
}

#[test]
fn test_second_purchase_in_same_ledger_rejected() {
    let e = Env::default();
    let p = contraction_setup(&e);
    p.treasury.buy_bonds(&p.holder, &UNIT, &price(97));
    let result = p.treasury.try_buy_bonds(&p.holder, &UNIT, &price(97));
    assert_eq!(result, Err(Ok(ContractError::SameSlotCall)));
}

#[test]
fn test_incentive_skim_funds_contraction_payout() {
    let e = Env::default();
    let p = contraction_setup(&e);
    p.treasury.set_incentive_percent(&p.admin, &500);

    p.treasury.buy_bonds(&p.holder, &(2 * UNIT), &price(97));
    assert_eq!(p.treasury.incentive_amount(), UNIT / 10);
    assert_eq!(p.dollar.balance(&p.treasury.address), UNIT / 10);
    assert_eq!(p.dollar.total_supply(), INITIAL_DOLLAR - 19 * UNIT / 10);

    // the whole incentive pool goes to the boardroom next contraction epoch
    let report = close_epoch(&e, &p, price(97));
    assert_eq!(report.external_reward_paid, UNIT / 10);
    assert_eq!(p.treasury.incentive_amount(), 0);
    assert_eq!(
        p.boardroom.reward_state(&p.dollar.address).total_allocated,
        UNIT / 10
    );
}

// ─── Redemption ────────────────────────────────────────────────────────────

/// Contraction in epoch 0, bonds bought in epoch 1, debt-phase expansion at
/// 1.05 closes epoch 1. The holder owns 1 bond; the reserve is funded.
fn redeemable_setup(e: &Env) -> Protocol<'_> {
    let p = contraction_setup(e);
    p.treasury.buy_bonds(&p.holder, &UNIT, &price(97));
    let report = close_epoch(e, &p, price(105));
    // 99 Dollar circulating, 4.5% cap, 65% to the reserve
    assert_eq!(report.reserve_top_up, 28_957_500);
    p
}

#[test]
fn test_redeem_bonds_pays_less_than_burned_after_contraction() {
    let e = Env::default();
    let p = redeemable_setup(&e);

    // epoch 2: contraction two epochs ago -> 95% paid
    assert_eq!(p.treasury.get_redeem_tax_rate(), 9_500);
    let paid = p.treasury.redeem_bonds(&p.holder, &UNIT, &price(105));
    assert_eq!(paid, 9_500_000);
    assert!(paid < UNIT);
    assert_eq!(p.bond.balance(&p.holder), 0);
    assert_eq!(p.treasury.seigniorage_saved(), 28_957_500 - 9_500_000);
}

#[test]
fn test_redeem_tax_lookback_one_epoch() {
    let e = Env::default();
    let p = contraction_setup(&e);
    assert_eq!(p.treasury.get_redeem_tax_rate(), 9_000);
    close_epoch(&e, &p, price(105));
    assert_eq!(p.treasury.get_redeem_tax_rate(), 9_500);
    close_epoch(&e, &p, price(105));
    assert_eq!(p.treasury.get_redeem_tax_rate(), 10_000);
}

#[test]
fn test_redeem_bonds_rejects_moved_price() {
    let e = Env::default();
    let p = redeemable_setup(&e);
    let result = p.treasury.try_redeem_bonds(&p.holder, &UNIT, &price(104));
    assert_eq!(result, Err(Ok(ContractError::PriceMoved)));
}

#[test]
fn test_redeem_bonds_between_peg_and_ceiling_not_eligible() {
    let e = Env::default();
    let p = redeemable_setup(&e);
    publish_price(&e, &p.oracle, price(100));
    let result = p.treasury.try_redeem_bonds(&p.holder, &UNIT, &price(100));
    assert_eq!(result, Err(Ok(ContractError::NotEligibleForRedemption)));
}

#[test]
fn test_redeem_bonds_limited_by_reserve() {
    let e = Env::default();
    let p = setup_with_bonds(&e, 50 * UNIT);
    // reserve stays empty: premium redemption must fail
    close_epoch(&e, &p, price(97));
    publish_price(&e, &p.oracle, price(110));

    let result = p.treasury.try_redeem_bonds(&p.holder, &UNIT, &price(110));
    assert_eq!(result, Err(Ok(ContractError::InsufficientReserve)));
    assert_eq!(p.treasury.get_redeemable_bonds(), 0);
}

#[test]
fn test_earmarked_pools_are_not_reserve() {
    let e = Env::default();
    let p = setup_with_bonds(&e, 10 * UNIT);
    p.treasury.fund_external_reward(&p.holder, &(5 * UNIT));
    close_epoch(&e, &p, price(97));
    publish_price(&e, &p.oracle, price(110));

    // 5 Dollar in the treasury minus 0.5 paid out, all of it earmarked
    let result = p.treasury.try_redeem_bonds(&p.holder, &UNIT, &price(110));
    assert_eq!(result, Err(Ok(ContractError::InsufficientReserve)));
}

#[test]
fn test_sub_peg_redemption_with_penalty() {
    let e = Env::default();
    let p = setup_with_bonds(&e, 10 * UNIT);
    close_epoch(&e, &p, price(97));

    let result = p.treasury.try_redeem_bonds(&p.holder, &UNIT, &price(97));
    assert_eq!(result, Err(Ok(ContractError::NotEligibleForRedemption)));

    p.treasury.set_redeem_penalty_percent(&p.admin, &2_000);
    next_ledger(&e);
    let paid = p.treasury.redeem_bonds(&p.holder, &(5 * UNIT), &price(97));
    assert_eq!(paid, 4 * UNIT);
    assert_eq!(p.bond.balance(&p.holder), 5 * UNIT);
    assert_eq!(p.dollar.balance(&p.holder), INITIAL_DOLLAR + 4 * UNIT);
}

#[test]
fn test_premium_rate_curve_applies_on_redemption() {
    let e = Env::default();
    let p = redeemable_setup(&e);
    p.treasury.set_premium_percent(&p.admin, &10_000);

    // 1 + 0.05 = 1.05 per bond, 95% after tax
    assert_eq!(p.treasury.get_bond_premium_rate(), price(105));
    let paid = p.treasury.redeem_bonds(&p.holder, &UNIT, &price(105));
    assert_eq!(paid, 9_975_000);
}
