#![cfg(test)]

use crate::test_helpers::*;
use crate::types::CouponConfig;
use crate::ContractError;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{vec, Address, Env};

struct Market<'a> {
    p: Protocol<'a>,
    peg: PegToken<'a>,
    alice: Address,
    bob: Address,
}

/// 100 peg tokens split 60/40, token active from epoch 1, epoch 0 closed.
fn market(e: &Env) -> Market<'_> {
    let p = setup(e);
    let alice = Address::generate(e);
    let bob = Address::generate(e);
    let peg = setup_peg_token(e, &p, &alice, 100 * UNIT, 1_000 * UNIT, 300);
    peg.token.transfer(&alice, &bob, &(40 * UNIT));
    close_epoch(e, &p, price(100));
    Market { p, peg, alice, bob }
}

#[test]
fn test_inactive_peg_token_rejects_purchase() {
    let e = Env::default();
    let p = setup(&e);
    let alice = Address::generate(&e);
    let peg = setup_peg_token(&e, &p, &alice, 100 * UNIT, 1_000 * UNIT, 300);

    // active from epoch 1, still in epoch 0
    let result = p
        .treasury
        .try_buy_coupons(&alice, &peg.token.address, &UNIT, &price(100));
    assert_eq!(result, Err(Ok(ContractError::PegTokenInactive)));
}

#[test]
fn test_unregistered_token_rejected() {
    let e = Env::default();
    let m = market(&e);
    let stranger = deploy_asset(&e, &m.p.admin, "XYZ");
    let result = m
        .p
        .treasury
        .try_buy_coupons(&m.alice, &stranger.address, &UNIT, &price(80));
    assert_eq!(result, Err(Ok(ContractError::PegTokenNotRegistered)));
}

#[test]
fn test_coupon_purchase_and_epoch_capped_redemption() {
    let e = Env::default();
    let m = market(&e);
    let peg = &m.peg.token.address;
    publish_price(&e, &m.peg.oracle, price(80));

    // 35% of 100 circulating
    let result = m
        .p
        .treasury
        .try_buy_coupons(&m.alice, peg, &(36 * UNIT), &price(80));
    assert_eq!(result, Err(Ok(ContractError::CouponBudgetExceeded)));

    next_ledger(&e);
    let coupons = m.p.treasury.buy_coupons(&m.alice, peg, &(20 * UNIT), &price(80));
    assert_eq!(coupons, 20 * UNIT);
    m.p.treasury.buy_coupons(&m.bob, peg, &(5 * UNIT), &price(80));

    assert_eq!(m.peg.token.total_supply(), 75 * UNIT);
    assert_eq!(m.p.treasury.get_coupon_balance(peg, &m.alice), 20 * UNIT);
    assert_eq!(m.p.treasury.get_coupon_purchased(peg, &m.bob, &1), 5 * UNIT);
    assert_eq!(m.p.treasury.get_coupon_epochs(peg, &m.alice), vec![&e, 1_u64]);
    assert_eq!(m.p.treasury.get_coupon_supply(peg), 25 * UNIT);
    // 75 * 35% - 25
    assert_eq!(m.p.treasury.get_burnable_peg_token_left(peg), 125 * UNIT / 100);

    next_ledger(&e);
    let result = m
        .p
        .treasury
        .try_redeem_coupons(&m.alice, peg, &1, &UNIT, &price(80));
    assert_eq!(result, Err(Ok(ContractError::NotEligibleForRedemption)));

    publish_price(&e, &m.peg.oracle, price(120));
    assert_eq!(m.p.treasury.epoch(), 1);

    // cap: 5% of the 75 supply at the first redemption
    let paid = m
        .p
        .treasury
        .redeem_coupons(&m.alice, peg, &1, &(25 * UNIT / 10), &price(120));
    assert_eq!(paid, 25 * UNIT / 10);
    assert_eq!(m.peg.token.total_supply(), 775 * UNIT / 10);

    // 3.8 would fit a fresh snapshot of the grown supply, not the stored one
    let result = m
        .p
        .treasury
        .try_redeem_coupons(&m.bob, peg, &1, &(13 * UNIT / 10), &price(120));
    assert_eq!(result, Err(Ok(ContractError::CouponRedemptionCapExceeded)));

    next_ledger(&e);
    m.p.treasury
        .redeem_coupons(&m.bob, peg, &1, &(125 * UNIT / 100), &price(120));
    assert_eq!(
        m.p.treasury.get_coupon_redeemed_in_epoch(peg, &1),
        375 * UNIT / 100
    );

    next_ledger(&e);
    let result = m
        .p
        .treasury
        .try_redeem_coupons(&m.alice, peg, &1, &(18 * UNIT), &price(120));
    assert_eq!(result, Err(Ok(ContractError::InsufficientCoupons)));

    assert_eq!(m.p.treasury.get_coupons_issued(peg), 25 * UNIT);
    assert_eq!(m.p.treasury.get_coupons_redeemed(peg), 375 * UNIT / 100);
    assert_eq!(m.p.treasury.get_coupon_supply(peg), 2125 * UNIT / 100);
    assert_eq!(
        m.p.treasury.get_coupon_balance(peg, &m.alice),
        175 * UNIT / 10
    );
    assert_eq!(
        m.p.treasury.get_coupon_balance(peg, &m.bob),
        375 * UNIT / 100
    );
}

#[test]
fn test_coupon_discount_curve() {
    let e = Env::default();
    let m = market(&e);
    let peg = &m.peg.token.address;
    m.p.treasury.set_coupon_parameters(
        &m.p.admin,
        &CouponConfig {
            discount_percent: 10_000,
            premium_percent: 0,
            max_discount_rate: 0,
            max_premium_rate: 0,
            max_redeem_percent_per_epoch: 500,
        },
    );
    publish_price(&e, &m.peg.oracle, price(80));

    assert_eq!(m.p.treasury.get_coupon_discount_rate(peg), price(125));
    let coupons = m.p.treasury.buy_coupons(&m.alice, peg, &(8 * UNIT), &price(80));
    assert_eq!(coupons, 10 * UNIT);
    assert_eq!(m.peg.token.balance(&m.alice), 52 * UNIT);
}

#[test]
fn test_coupon_purchase_rejects_moved_price() {
    let e = Env::default();
    let m = market(&e);
    publish_price(&e, &m.peg.oracle, price(80));
    let result = m
        .p
        .treasury
        .try_buy_coupons(&m.alice, &m.peg.token.address, &UNIT, &price(81));
    assert_eq!(result, Err(Ok(ContractError::PriceMoved)));
}

#[test]
fn test_coupons_redeemable_after_deactivation() {
    let e = Env::default();
    let m = market(&e);
    let peg = &m.peg.token.address;
    publish_price(&e, &m.peg.oracle, price(80));
    m.p.treasury.buy_coupons(&m.alice, peg, &(2 * UNIT), &price(80));

    m.p.treasury.set_peg_token_epoch_start(&m.p.admin, peg, &0);
    publish_price(&e, &m.peg.oracle, price(120));
    let paid = m.p.treasury.redeem_coupons(&m.alice, peg, &1, &UNIT, &price(120));
    assert_eq!(paid, UNIT);
}
