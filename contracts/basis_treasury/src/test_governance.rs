//! Operator-only setters, parameter bounds, recovery and migration.

#![cfg(test)]

use crate::test_helpers::*;
use crate::types::{CouponConfig, FundConfig};
use crate::ContractError;
use soroban_sdk::testutils::{Address as _, Events};
use soroban_sdk::{Address, Env, FromVal, InvokeError, String, Symbol, Val, Vec};

fn out_of_bounds<T>(result: Result<T, Result<ContractError, InvokeError>>) -> bool {
    matches!(result, Err(Ok(ContractError::ParameterOutOfBounds)))
}

/// Names carried by the treasury's `parameter_changed` events so far.
fn changed_parameters(e: &Env, p: &Protocol) -> Vec<String> {
    let mut names = Vec::new(e);
    for (contract, topics, data) in e.events().all().into_iter() {
        if contract != p.treasury.address {
            continue;
        }
        let topic = Symbol::from_val(e, &topics.get(0).unwrap());
        if topic != Symbol::new(e, "parameter_changed") {
            continue;
        }
        let (name, _, _, _, _): (String, Val, Val, Address, u64) = FromVal::from_val(e, &data);
        names.push_back(name);
    }
    names
}

#[test]
fn test_initialize_twice_fails() {
    let e = Env::default();
    let p = setup(&e);
    let result = p.treasury.try_initialize(
        &p.admin,
        &p.dollar.address,
        &p.bond.address,
        &p.share.address,
        &p.oracle.address,
        &p.boardroom.address,
        &T0,
    );
    assert_eq!(result, Err(Ok(ContractError::AlreadyInitialized)));
}

#[test]
fn test_non_operator_cannot_govern() {
    let e = Env::default();
    let p = setup(&e);
    let stranger = Address::generate(&e);

    let result = p.treasury.try_set_discount_percent(&stranger, &5_000);
    assert_eq!(result, Err(Ok(ContractError::NotOperator)));
    let result = p.treasury.try_set_boardroom(&stranger, &stranger);
    assert_eq!(result, Err(Ok(ContractError::NotOperator)));
    let result = p.treasury.try_migrate(&stranger, &stranger);
    assert_eq!(result, Err(Ok(ContractError::NotOperator)));
}

#[test]
fn test_operator_handover() {
    let e = Env::default();
    let p = setup(&e);
    let next = Address::generate(&e);

    p.treasury.set_operator(&p.admin, &next);
    assert!(p.treasury.is_operator(&next));
    assert_eq!(p.treasury.operator(), next);
    let result = p.treasury.try_set_premium_percent(&p.admin, &100);
    assert_eq!(result, Err(Ok(ContractError::NotOperator)));
    p.treasury.set_premium_percent(&next, &100);
}

#[test]
fn test_parameter_change_emits_event() {
    let e = Env::default();
    let p = setup(&e);
    p.treasury.set_discount_percent(&p.admin, &5_000);

    let events = e.events().all();
    let changed = events
        .into_iter()
        .rev()
        .find(|ev| ev.0 == p.treasury.address)
        .unwrap();
    let topic = Symbol::from_val(&e, &changed.1.get(0).unwrap());
    assert_eq!(topic, Symbol::new(&e, "parameter_changed"));

    let (name, old, new, by, _): (String, u32, u32, Address, u64) =
        FromVal::from_val(&e, &changed.2);
    assert_eq!(name, String::from_str(&e, "discount_percent"));
    assert_eq!(old, 0);
    assert_eq!(new, 5_000);
    assert_eq!(by, p.admin);
}

#[test]
fn test_policy_bounds() {
    let e = Env::default();
    let p = setup(&e);
    let t = &p.treasury;
    let a = &p.admin;

    assert!(out_of_bounds(t.try_set_max_expansion_percents(a, &5, &450)));
    assert!(out_of_bounds(t.try_set_max_expansion_percents(a, &300, &1_501)));
    assert!(out_of_bounds(t.try_set_bond_depletion_floor_percent(a, &499)));
    assert!(out_of_bounds(t.try_set_max_contraction_percent(a, &1_501)));
    assert!(out_of_bounds(t.try_set_max_debt_ratio_percent(a, &999)));
    assert!(out_of_bounds(t.try_set_bootstrap(a, &121, &450)));
    assert!(out_of_bounds(t.try_set_bootstrap(a, &28, &99)));
    assert!(out_of_bounds(t.try_set_allocate_seigniorage_salary(a, &(101 * UNIT))));
    assert!(out_of_bounds(t.try_set_minting_factor(a, &9_999)));
    assert!(out_of_bounds(t.try_set_expansion_floor_percent(a, &999)));
    assert!(out_of_bounds(t.try_set_external_reward_percent(a, &5_001)));

    t.set_max_expansion_percents(a, &500, &1_000);
    let config = t.get_config();
    assert_eq!(config.policy.max_supply_expansion_percent, 500);
    assert_eq!(config.policy.max_expansion_percent_debt, 1_000);
}

#[test]
fn test_curve_bounds() {
    let e = Env::default();
    let p = setup(&e);
    let t = &p.treasury;
    let a = &p.admin;

    assert!(out_of_bounds(t.try_set_discount_percent(a, &20_001)));
    assert!(out_of_bounds(t.try_set_premium_percent(a, &20_001)));
    // a clamp is either 0 (off) or within [1, 2]
    assert!(out_of_bounds(t.try_set_max_discount_rate(a, &price(50))));
    assert!(out_of_bounds(t.try_set_max_premium_rate(a, &price(201))));
    assert!(out_of_bounds(t.try_set_incentive_percent(a, &1_001)));
    assert!(out_of_bounds(t.try_set_redeem_penalty_percent(a, &5_001)));

    let coupons = CouponConfig {
        discount_percent: 0,
        premium_percent: 0,
        max_discount_rate: 0,
        max_premium_rate: 0,
        max_redeem_percent_per_epoch: 10_001,
    };
    assert!(out_of_bounds(t.try_set_coupon_parameters(a, &coupons)));

    t.set_max_premium_rate(a, &price(200));
    assert_eq!(t.get_config().bonds.max_premium_rate, price(200));
}

#[test]
fn test_coupon_and_peg_token_updates_emit_every_field() {
    let e = Env::default();
    let p = setup(&e);
    p.treasury.set_coupon_parameters(
        &p.admin,
        &CouponConfig {
            discount_percent: 100,
            premium_percent: 200,
            max_discount_rate: price(150),
            max_premium_rate: price(120),
            max_redeem_percent_per_epoch: 300,
        },
    );
    let names = changed_parameters(&e, &p);
    for name in [
        "coupon_discount_percent",
        "coupon_premium_percent",
        "coupon_max_discount_rate",
        "coupon_max_premium_rate",
    ] {
        assert!(names.contains(String::from_str(&e, name)), "{name} not emitted");
    }

    let holder = Address::generate(&e);
    let peg = setup_peg_token(&e, &p, &holder, 100 * UNIT, 1_000 * UNIT, 300);
    let pool = Address::generate(&e);
    p.treasury.set_peg_token_config(
        &p.admin,
        &peg.token.address,
        &peg.oracle.address,
        &peg.boardroom.address,
        &Some(pool),
        &(2_000 * UNIT),
        &200,
    );
    let names = changed_parameters(&e, &p);
    for name in [
        "peg_token_oracle",
        "peg_token_boardroom",
        "peg_token_farming_pool",
        "peg_token_supply_target",
        "peg_token_max_expansion_percent",
    ] {
        assert!(names.contains(String::from_str(&e, name)), "{name} not emitted");
    }
}

#[test]
fn test_price_band_invariant() {
    let e = Env::default();
    let p = setup(&e);
    let t = &p.treasury;
    let a = &p.admin;

    assert!(out_of_bounds(t.try_set_price_ceiling(a, &price(99))));
    assert!(out_of_bounds(t.try_set_price_ceiling(a, &price(121))));
    // the current 1.01 ceiling would sit below the new peg
    assert!(out_of_bounds(t.try_set_price_one(a, &price(102))));
    assert!(out_of_bounds(t.try_set_price_one(a, &price(89))));

    t.set_price_one(a, &price(95));
    t.set_price_ceiling(a, &price(110));
    let policy = t.get_config().policy;
    assert_eq!(policy.price_one, price(95));
    assert_eq!(policy.price_ceiling, price(110));
}

#[test]
fn test_extra_funds_validation() {
    let e = Env::default();
    let p = setup(&e);
    let dao = Address::generate(&e);

    let mut funds = FundConfig {
        dao_fund: Some(dao),
        dao_fund_shared_percent: 3_001,
        bvaults_fund: None,
        bvaults_fund_shared_percent: 0,
        marketing_fund: None,
        marketing_fund_shared_percent: 0,
    };
    assert!(out_of_bounds(p.treasury.try_set_extra_funds(&p.admin, &funds)));

    funds.dao_fund_shared_percent = 3_000;
    funds.marketing_fund_shared_percent = 500;
    let result = p.treasury.try_set_extra_funds(&p.admin, &funds);
    assert_eq!(result, Err(Ok(ContractError::FundNotSet)));

    funds.marketing_fund_shared_percent = 0;
    p.treasury.set_extra_funds(&p.admin, &funds);
    assert_eq!(p.treasury.get_config().funds, funds);
}

#[test]
fn test_excluded_from_total_supply_list() {
    let e = Env::default();
    let p = setup(&e);
    let pool = Address::generate(&e);

    p.treasury
        .set_excluded_from_total_supply(&p.admin, &pool, &true);
    p.treasury
        .set_excluded_from_total_supply(&p.admin, &pool, &true);
    assert_eq!(p.treasury.get_excluded_from_total_supply().len(), 1);

    p.treasury
        .set_excluded_from_total_supply(&p.admin, &pool, &false);
    assert!(p.treasury.get_excluded_from_total_supply().is_empty());
}

#[test]
fn test_recover_unsupported_token() {
    let e = Env::default();
    let p = setup(&e);
    let stray = deploy_asset(&e, &p.admin, "STRAY");
    stray.mint(&p.treasury.address, &(5 * UNIT));

    p.treasury
        .governance_recover_unsupported(&p.admin, &stray.address, &(5 * UNIT), &p.admin);
    assert_eq!(stray.balance(&p.admin), 5 * UNIT);

    for protected in [&p.dollar.address, &p.bond.address, &p.share.address] {
        let result =
            p.treasury
                .try_governance_recover_unsupported(&p.admin, protected, &UNIT, &p.admin);
        assert_eq!(result, Err(Ok(ContractError::ProtectedToken)));
    }
}

#[test]
fn test_migration_hands_over_and_freezes() {
    let e = Env::default();
    let p = setup(&e);
    let successor = Address::generate(&e);
    p.treasury.fund_external_reward(&p.holder, &(5 * UNIT));

    p.treasury.migrate(&p.admin, &successor);
    assert!(p.treasury.is_migrated());
    assert_eq!(p.dollar.operator(), successor);
    assert_eq!(p.bond.operator(), successor);
    assert_eq!(p.share.operator(), successor);
    assert_eq!(p.dollar.balance(&successor), 5 * UNIT);
    assert_eq!(p.dollar.balance(&p.treasury.address), 0);

    advance_time(&e, 2 * crate::epoch::PERIOD);
    let result = p.treasury.try_allocate_seigniorage(&p.keeper);
    assert_eq!(result, Err(Ok(ContractError::AlreadyMigrated)));
    let result = p.treasury.try_set_discount_percent(&p.admin, &100);
    assert_eq!(result, Err(Ok(ContractError::AlreadyMigrated)));
    let result = p.treasury.try_migrate(&p.admin, &successor);
    assert_eq!(result, Err(Ok(ContractError::AlreadyMigrated)));

    let stray = deploy_asset(&e, &p.admin, "STRAY");
    stray.mint(&p.treasury.address, &UNIT);
    let result =
        p.treasury
            .try_governance_recover_unsupported(&p.admin, &stray.address, &UNIT, &p.admin);
    assert_eq!(result, Err(Ok(ContractError::AlreadyMigrated)));
    assert_eq!(stray.balance(&p.treasury.address), UNIT);
}
