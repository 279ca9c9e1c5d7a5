//! # Basis Oracle Contract
//!
//! Fixed-window time-weighted average price for a single token, quoted in the
//! peg reference asset with 18-decimal precision (`PRICE_ONE` = 1.0).
//!
//! Observations are pushed by the feeder (the AMM reading is outside this
//! contract). Each observation closes the running segment of the price
//! accumulator. `update` rolls the published average forward and may only run
//! once per `period`; calling it early panics, which is why the treasury wraps
//! it as a best-effort refresh.
//!
//! * `consult` returns the last published average (stale until `update`).
//! * `twap` returns the average from the last update up to now (fresh).

#![no_std]

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Symbol};


/// 1.0 in price precision.
pub const PRICE_ONE: i128 = 1_000_000_000_000_000_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Observation {
    /// Latest pushed price.
    pub price: i128,
    /// Sum of `price * seconds` since deployment.
    pub price_cumulative: i128,
    /// Timestamp the accumulator was last advanced to.
    pub timestamp: u64,
}

#[contracttype]
pub enum DataKey {
    /// Feeder allowed to push observations.
    Admin,
    /// The token this oracle prices.
    Token,
    /// Minimum seconds between two `update` calls.
    Period,
    /// Running accumulator.
    Observation,
    /// Accumulator value at the last `update`.
    CumulativeLast,
    /// Timestamp of the last `update`.
    UpdatedAt,
    /// Average published by the last `update`.
    Average,
}

#[contract]
pub struct BasisOracle;

#[contractimpl]
impl BasisOracle {
    /// Initialize the oracle for `token` with a starting price.
    pub fn initialize(e: Env, admin: Address, token: Address, period: u64, price: i128) {
        if e.storage().instance().has(&DataKey::Admin) {
            panic!("already initialized");
        }
        if period == 0 {
            panic!("period must be greater than zero");
        }
        if price <= 0 {
            panic!("price must be positive");
        }
        let now = e.ledger().timestamp();
        let storage = e.storage().instance();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Token, &token);
        storage.set(&DataKey::Period, &period);
        storage.set(
            &DataKey::Observation,
            &Observation {
                price,
                price_cumulative: 0,
                timestamp: now,
            },
        );
        storage.set(&DataKey::CumulativeLast, &0_i128);
        storage.set(&DataKey::UpdatedAt, &now);
        storage.set(&DataKey::Average, &price);
    }

    /// Push a new spot observation. Feeder only.
    pub fn set_price(e: Env, price: i128) {
        let admin: Address = e
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .unwrap_or_else(|| panic!("not initialized"));
        admin.require_auth();
        if price <= 0 {
            panic!("price must be positive");
        }

        let mut obs = Self::accumulate(&e);
        obs.price = price;
        e.storage().instance().set(&DataKey::Observation, &obs);

        e.events()
            .publish((Symbol::new(&e, "price_observed"),), (price, obs.timestamp));
    }

    /// Publish the average over the elapsed window. Panics when called before
    /// `period` seconds have passed since the last update.
    pub fn update(e: Env) {
        let period = Self::period(e.clone());
        let updated_at: u64 = e
            .storage()
            .instance()
            .get(&DataKey::UpdatedAt)
            .unwrap_or_else(|| panic!("not initialized"));
        let now = e.ledger().timestamp();
        let elapsed = now.saturating_sub(updated_at);
        if elapsed < period {
            panic!("period not elapsed");
        }

        let obs = Self::accumulate(&e);
        e.storage().instance().set(&DataKey::Observation, &obs);

        let cumulative_last: i128 = e
            .storage()
            .instance()
            .get(&DataKey::CumulativeLast)
            .unwrap_or(0);
        let average = (obs.price_cumulative - cumulative_last) / elapsed as i128;

        let storage = e.storage().instance();
        storage.set(&DataKey::CumulativeLast, &obs.price_cumulative);
        storage.set(&DataKey::UpdatedAt, &now);
        storage.set(&DataKey::Average, &average);

        e.events()
            .publish((Symbol::new(&e, "oracle_updated"),), (average, now));
    }

    /// Value of `amount_in` of `token` at the last published average.
    pub fn consult(e: Env, token: Address, amount_in: i128) -> i128 {
        Self::require_token(&e, &token);
        let average: i128 = e
            .storage()
            .instance()
            .get(&DataKey::Average)
            .unwrap_or_else(|| panic!("not initialized"));
        amount_in
            .checked_mul(average)
            .unwrap_or_else(|| panic!("quote overflow"))
            / PRICE_ONE
    }

    /// Value of `amount_in` of `token` at the average since the last update,
    /// including the still-open segment.
    pub fn twap(e: Env, token: Address, amount_in: i128) -> i128 {
        Self::require_token(&e, &token);
        let obs = Self::accumulate(&e);
        let cumulative_last: i128 = e
            .storage()
            .instance()
            .get(&DataKey::CumulativeLast)
            .unwrap_or(0);
        let updated_at: u64 = e
            .storage()
            .instance()
            .get(&DataKey::UpdatedAt)
            .unwrap_or(0);
        let elapsed = obs.timestamp.saturating_sub(updated_at);
        let average = if elapsed == 0 {
            obs.price
        } else {
            (obs.price_cumulative - cumulative_last) / elapsed as i128
        };
        amount_in
            .checked_mul(average)
            .unwrap_or_else(|| panic!("quote overflow"))
            / PRICE_ONE
    }

    pub fn period(e: Env) -> u64 {
        e.storage()
            .instance()
            .get(&DataKey::Period)
            .unwrap_or_else(|| panic!("not initialized"))
    }

    pub fn token(e: Env) -> Address {
        e.storage()
            .instance()
            .get(&DataKey::Token)
            .unwrap_or_else(|| panic!("not initialized"))
    }
}

impl BasisOracle {
    fn require_token(e: &Env, token: &Address) {
        let tracked: Address = e
            .storage()
            .instance()
            .get(&DataKey::Token)
            .unwrap_or_else(|| panic!("not initialized"));
        if tracked != *token {
            panic!("invalid token");
        }
    }

    /// Advance the accumulator to the current ledger time with the latest price.
    fn accumulate(e: &Env) -> Observation {
        let mut obs: Observation = e
            .storage()
            .instance()
            .get(&DataKey::Observation)
            .unwrap_or_else(|| panic!("not initialized"));
        let now = e.ledger().timestamp();
        if now > obs.timestamp {
            let elapsed = (now - obs.timestamp) as i128;
            obs.price_cumulative = obs
                .price_cumulative
                .checked_add(obs.price * elapsed)
                .unwrap_or_else(|| panic!("accumulator overflow"));
            obs.timestamp = now;
        }
        obs
    }
}
