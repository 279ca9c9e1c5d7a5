//! Client interfaces of the contracts the treasury drives.
//!
//! The treasury never links against a concrete oracle, asset or boardroom; it
//! only relies on these entry points. Transfers, balances and burns go through
//! `soroban_sdk::token::TokenClient`.

use soroban_sdk::{contractclient, Address, Env};

/// Time-weighted price feed for one token.
#[contractclient(name = "PriceOracleClient")]
pub trait OracleInterface {
    /// Quote at the last published average.
    fn consult(env: Env, token: Address, amount_in: i128) -> i128;
    /// Quote including the still-open averaging window.
    fn twap(env: Env, token: Address, amount_in: i128) -> i128;
    /// Roll the average forward. May fail when the window has not elapsed.
    fn update(env: Env);
}

/// Operator-gated supply surface of Dollar, Bond, Share and peg tokens.
#[contractclient(name = "ManagedAssetClient")]
pub trait BasisAssetInterface {
    fn mint(env: Env, to: Address, amount: i128) -> bool;
    fn total_supply(env: Env) -> i128;
    fn operator(env: Env) -> Address;
    fn transfer_operator(env: Env, new_operator: Address);
}

/// Reward sink for seigniorage. Tokens are transferred first, then notified.
#[contractclient(name = "RewardPoolClient")]
pub trait BoardroomInterface {
    fn operator(env: Env) -> Address;
    fn allocate_seigniorage(env: Env, amount: i128);
    fn allocate_seigniorage_peg_token(env: Env, token: Address, amount: i128);
}
