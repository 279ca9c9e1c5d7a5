//! Shared fixtures for the treasury tests.
//! Deploys Dollar, Bond, Share, the Dollar oracle and the main boardroom, hands
//! their operator roles to the treasury and stakes a Share holder so that
//! boardroom allocations have a recipient.

#![cfg(test)]

use crate::epoch::PERIOD;
use crate::{BasisTreasury, BasisTreasuryClient, EpochReport};
use basis_asset::{BasisAsset, BasisAssetClient};
use basis_oracle::{BasisOracle, BasisOracleClient, PRICE_ONE};
use boardroom::{Boardroom, BoardroomClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{Address, Env, String};

/// One whole token in smallest units (7 decimals).
pub const UNIT: i128 = 10_000_000;
/// Ledger time at deployment.
pub const T0: u64 = 1_000_000;
/// Oracle averaging window.
pub const ORACLE_PERIOD: u64 = 3_600;
/// Dollar supply held by `holder` at setup.
pub const INITIAL_DOLLAR: i128 = 100 * UNIT;

/// `percent / 100` as a price (`price(103) == 1.03`).
pub fn price(percent: i128) -> i128 {
    PRICE_ONE / 100 * percent
}

pub struct Protocol<'a> {
    pub treasury: BasisTreasuryClient<'a>,
    pub dollar: BasisAssetClient<'a>,
    pub bond: BasisAssetClient<'a>,
    pub share: BasisAssetClient<'a>,
    pub oracle: BasisOracleClient<'a>,
    pub boardroom: BoardroomClient<'a>,
    pub admin: Address,
    /// Holds the whole initial Dollar supply.
    pub holder: Address,
    /// Staked in every boardroom.
    pub staker: Address,
    /// Triggers epochs.
    pub keeper: Address,
}

pub fn deploy_asset<'a>(e: &'a Env, operator: &Address, symbol: &str) -> BasisAssetClient<'a> {
    let id = e.register(BasisAsset, ());
    let client = BasisAssetClient::new(e, &id);
    client.initialize(
        operator,
        &7,
        &String::from_str(e, symbol),
        &String::from_str(e, symbol),
    );
    client
}

pub fn deploy_oracle<'a>(e: &'a Env, admin: &Address, token: &Address) -> BasisOracleClient<'a> {
    let id = e.register(BasisOracle, ());
    let client = BasisOracleClient::new(e, &id);
    client.initialize(admin, token, &ORACLE_PERIOD, &PRICE_ONE);
    client
}

pub fn deploy_boardroom<'a>(
    e: &'a Env,
    operator: &Address,
    share: &Address,
    dollar: &Address,
) -> BoardroomClient<'a> {
    let id = e.register(Boardroom, ());
    let client = BoardroomClient::new(e, &id);
    client.initialize(operator, share, dollar);
    client
}

/// Post-bootstrap protocol with no outstanding bonds.
pub fn setup(e: &Env) -> Protocol<'_> {
    setup_with_bonds(e, 0)
}

/// Post-bootstrap protocol with `bond_supply` bonds already held by `holder`.
pub fn setup_with_bonds(e: &Env, bond_supply: i128) -> Protocol<'_> {
    e.mock_all_auths();
    e.ledger().with_mut(|li| {
        li.timestamp = T0;
        li.sequence_number = 100;
    });

    let admin = Address::generate(e);
    let holder = Address::generate(e);
    let staker = Address::generate(e);
    let keeper = Address::generate(e);

    let dollar = deploy_asset(e, &admin, "BSD");
    let bond = deploy_asset(e, &admin, "BSDB");
    let share = deploy_asset(e, &admin, "BSDS");
    let oracle = deploy_oracle(e, &admin, &dollar.address);
    let boardroom = deploy_boardroom(e, &admin, &share.address, &dollar.address);

    dollar.mint(&holder, &INITIAL_DOLLAR);
    if bond_supply > 0 {
        bond.mint(&holder, &bond_supply);
    }
    share.mint(&staker, &(100 * UNIT));
    boardroom.stake(&staker, &(10 * UNIT));

    let treasury_id = e.register(BasisTreasury, ());
    let treasury = BasisTreasuryClient::new(e, &treasury_id);
    treasury.initialize(
        &admin,
        &dollar.address,
        &bond.address,
        &share.address,
        &oracle.address,
        &boardroom.address,
        &(T0 + PERIOD),
    );

    dollar.transfer_operator(&treasury_id);
    bond.transfer_operator(&treasury_id);
    share.transfer_operator(&treasury_id);
    boardroom.set_operator(&treasury_id);

    treasury.set_bootstrap(&admin, &0, &450);

    Protocol {
        treasury,
        dollar,
        bond,
        share,
        oracle,
        boardroom,
        admin,
        holder,
        staker,
        keeper,
    }
}

/// Move to the next ledger without moving time.
pub fn next_ledger(e: &Env) {
    e.ledger().with_mut(|li| li.sequence_number += 1);
}

pub fn advance_time(e: &Env, seconds: u64) {
    e.ledger().with_mut(|li| {
        li.timestamp += seconds;
        li.sequence_number += 1;
    });
}

/// Push `price` to `oracle` and publish it as the average of a full window.
pub fn publish_price(e: &Env, oracle: &BasisOracleClient, price: i128) {
    oracle.set_price(&price);
    advance_time(e, ORACLE_PERIOD);
    oracle.update();
    advance_time(e, ORACLE_PERIOD);
    oracle.update();
}

/// Observe `price` on the Dollar oracle for the rest of the epoch, jump to the
/// next epoch point and close the epoch.
pub fn close_epoch(e: &Env, p: &Protocol, price: i128) -> EpochReport {
    p.oracle.set_price(&price);
    let next = p.treasury.next_epoch_point();
    e.ledger().with_mut(|li| {
        if li.timestamp < next {
            li.timestamp = next;
        }
        li.sequence_number += 1;
    });
    p.treasury.allocate_seigniorage(&p.keeper)
}

pub struct PegToken<'a> {
    pub token: BasisAssetClient<'a>,
    pub oracle: BasisOracleClient<'a>,
    pub boardroom: BoardroomClient<'a>,
}

/// Deploy a peg token with its oracle and boardroom, register it with the
/// treasury from epoch 1 and hand its roles over. `supply` is minted to
/// `holder` so the token has circulating supply.
pub fn setup_peg_token<'a>(
    e: &'a Env,
    p: &Protocol<'a>,
    holder: &Address,
    supply: i128,
    supply_target: i128,
    max_expansion_percent: u32,
) -> PegToken<'a> {
    let token = deploy_asset(e, &p.admin, "PEG");
    let oracle = deploy_oracle(e, &p.admin, &token.address);
    let boardroom = deploy_boardroom(e, &p.admin, &p.share.address, &token.address);
    token.mint(holder, &supply);
    boardroom.stake(&p.staker, &(10 * UNIT));

    p.treasury.add_peg_token(
        &p.admin,
        &token.address,
        &oracle.address,
        &boardroom.address,
        &None,
        &supply_target,
        &max_expansion_percent,
    );
    p.treasury
        .set_peg_token_epoch_start(&p.admin, &token.address, &1);
    token.transfer_operator(&p.treasury.address);
    boardroom.set_operator(&p.treasury.address);

    PegToken {
        token,
        oracle,
        boardroom,
    }
}
