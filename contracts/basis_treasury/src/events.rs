use soroban_sdk::{Address, Env, Symbol};

use crate::types::EpochReport;

/// Emitted once per epoch transition.
///
/// # Topics
/// * `Symbol` - "epoch_allocated"
/// * `u64` - The epoch that was closed
///
/// # Data
/// * `EpochReport` - Price and amounts of the transition
pub fn emit_epoch_allocated(e: &Env, report: &EpochReport) {
    let topics = (Symbol::new(e, "epoch_allocated"), report.epoch);
    e.events().publish(topics, report.clone());
}

/// Emitted when debt-phase seigniorage tops up the bond reserve.
pub fn emit_treasury_funded(e: &Env, amount: i128) {
    let topics = (Symbol::new(e, "treasury_funded"),);
    e.events().publish(topics, (e.ledger().timestamp(), amount));
}

/// Emitted when Dollar seigniorage reaches the main boardroom.
pub fn emit_boardroom_funded(e: &Env, amount: i128) {
    let topics = (Symbol::new(e, "boardroom_funded"),);
    e.events().publish(topics, (e.ledger().timestamp(), amount));
}

/// Emitted for each side fund paid during a fan-out.
///
/// # Topics
/// * `Symbol` - "dao_funded", "bvaults_funded" or "marketing_funded"
/// * `Address` - The token paid out
///
/// # Data
/// * `u64` - Ledger timestamp
/// * `i128` - Amount paid
pub fn emit_fund_paid(e: &Env, name: &str, token: &Address, amount: i128) {
    let topics = (Symbol::new(e, name), token.clone());
    e.events().publish(topics, (e.ledger().timestamp(), amount));
}

/// Emitted when a peg token's seigniorage reaches its boardroom.
pub fn emit_peg_token_funded(e: &Env, token: &Address, minted: i128, to_boardroom: i128) {
    let topics = (Symbol::new(e, "peg_token_funded"), token.clone());
    e.events()
        .publish(topics, (e.ledger().timestamp(), minted, to_boardroom));
}

/// Emitted when a peg token reaches its supply target and the ratchet moves.
///
/// # Data
/// * `i128` - New supply target
/// * `u32` - New max expansion percent
pub fn emit_peg_token_target_raised(e: &Env, token: &Address, target: i128, max_expansion: u32) {
    let topics = (Symbol::new(e, "peg_token_target_raised"), token.clone());
    e.events().publish(topics, (target, max_expansion));
}

/// Emitted in a contraction epoch with the reward and incentive paid out.
pub fn emit_external_reward_shared(e: &Env, reward: i128, incentive: i128) {
    let topics = (Symbol::new(e, "external_reward_shared"),);
    e.events()
        .publish(topics, (e.ledger().timestamp(), reward, incentive));
}

pub fn emit_external_reward_funded(e: &Env, from: &Address, amount: i128, pool: i128) {
    let topics = (Symbol::new(e, "external_reward_funded"), from.clone());
    e.events().publish(topics, (amount, pool));
}

/// # Data
/// * `i128` - Dollar burned (including the incentive skim)
/// * `i128` - Bonds minted
pub fn emit_bonds_bought(e: &Env, buyer: &Address, dollar_amount: i128, bonds: i128) {
    let topics = (Symbol::new(e, "bonds_bought"), buyer.clone());
    e.events().publish(topics, (dollar_amount, bonds));
}

/// # Data
/// * `i128` - Bonds burned
/// * `i128` - Dollar paid
pub fn emit_bonds_redeemed(e: &Env, holder: &Address, bonds: i128, dollar_amount: i128) {
    let topics = (Symbol::new(e, "bonds_redeemed"), holder.clone());
    e.events().publish(topics, (bonds, dollar_amount));
}

/// # Data
/// * `u64` - Purchase epoch
/// * `i128` - Peg tokens burned
/// * `i128` - Coupons recorded
pub fn emit_coupons_bought(
    e: &Env,
    buyer: &Address,
    token: &Address,
    epoch: u64,
    amount: i128,
    coupons: i128,
) {
    let topics = (Symbol::new(e, "coupons_bought"), buyer.clone(), token.clone());
    e.events().publish(topics, (epoch, amount, coupons));
}

pub fn emit_coupons_redeemed(
    e: &Env,
    holder: &Address,
    token: &Address,
    purchase_epoch: u64,
    coupons: i128,
    payout: i128,
) {
    let topics = (Symbol::new(e, "coupons_redeemed"), holder.clone(), token.clone());
    e.events().publish(topics, (purchase_epoch, coupons, payout));
}

pub fn emit_treasury_migrated(e: &Env, target: &Address) {
    let topics = (Symbol::new(e, "treasury_migrated"),);
    e.events()
        .publish(topics, (target.clone(), e.ledger().timestamp()));
}
