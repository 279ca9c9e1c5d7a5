//! Delivery of seigniorage to reward distributors and side funds.

use basis_errors::ContractError;
use soroban_sdk::{token::TokenClient, Address, Env};

use crate::events;
use crate::interfaces::{ManagedAssetClient, RewardPoolClient};
use crate::math::{apply_bps, peel_sequential, sub};
use crate::types::{FundConfig, ManagedContracts};

/// Where a seigniorage payout ends up.
#[derive(Clone, Debug)]
pub enum Distribution {
    /// Dollar seigniorage into the main boardroom.
    Dollar { boardroom: Address, dollar: Address },
    /// Peg token seigniorage into that token's boardroom.
    PegToken { boardroom: Address, token: Address },
}

impl Distribution {
    pub fn token(&self) -> &Address {
        match self {
            Distribution::Dollar { dollar, .. } => dollar,
            Distribution::PegToken { token, .. } => token,
        }
    }

    /// Transfer `amount` held by the treasury to the boardroom and notify it.
    pub fn deliver(&self, e: &Env, amount: i128) {
        if amount <= 0 {
            return;
        }
        let (boardroom, token) = match self {
            Distribution::Dollar { boardroom, dollar } => (boardroom, dollar),
            Distribution::PegToken { boardroom, token } => (boardroom, token),
        };
        TokenClient::new(e, token).transfer(&e.current_contract_address(), boardroom, &amount);
        let pool = RewardPoolClient::new(e, boardroom);
        match self {
            Distribution::Dollar { .. } => pool.allocate_seigniorage(&amount),
            Distribution::PegToken { token, .. } => {
                pool.allocate_seigniorage_peg_token(token, &amount)
            }
        }
    }
}

/// A fund without an address takes nothing.
fn percent_if_set(fund: &Option<Address>, percent: u32) -> u32 {
    if fund.is_some() {
        percent
    } else {
        0
    }
}

fn pay_fund(e: &Env, token: &Address, fund: &Option<Address>, amount: i128, event: &str) {
    if let Some(fund) = fund {
        if amount > 0 {
            TokenClient::new(e, token).transfer(&e.current_contract_address(), fund, &amount);
            events::emit_fund_paid(e, event, token, amount);
        }
    }
}

/// Mint `amount` Dollar, peel the side funds off one after another and send
/// the remainder to the main boardroom. Returns what the boardroom received.
pub fn send_to_boardroom(
    e: &Env,
    contracts: &ManagedContracts,
    funds: &FundConfig,
    amount: i128,
) -> Result<i128, ContractError> {
    if amount <= 0 {
        return Ok(0);
    }
    ManagedAssetClient::new(e, &contracts.dollar).mint(&e.current_contract_address(), &amount);

    let ([dao, bvaults, marketing], remaining) = peel_sequential(
        amount,
        [
            percent_if_set(&funds.dao_fund, funds.dao_fund_shared_percent),
            percent_if_set(&funds.bvaults_fund, funds.bvaults_fund_shared_percent),
            percent_if_set(&funds.marketing_fund, funds.marketing_fund_shared_percent),
        ],
    )?;
    pay_fund(e, &contracts.dollar, &funds.dao_fund, dao, "dao_funded");
    pay_fund(e, &contracts.dollar, &funds.bvaults_fund, bvaults, "bvaults_funded");
    pay_fund(e, &contracts.dollar, &funds.marketing_fund, marketing, "marketing_funded");

    Distribution::Dollar {
        boardroom: contracts.boardroom.clone(),
        dollar: contracts.dollar.clone(),
    }
    .deliver(e, remaining);
    events::emit_boardroom_funded(e, remaining);
    Ok(remaining)
}

/// Peg token fan-out: DAO and marketing shares are both taken from `minted`,
/// the remainder goes to the token's boardroom.
pub fn send_peg_token_seigniorage(
    e: &Env,
    target: &Distribution,
    funds: &FundConfig,
    minted: i128,
    dao_percent: u32,
    marketing_percent: u32,
) -> Result<i128, ContractError> {
    let token = target.token();
    let dao = apply_bps(minted, percent_if_set(&funds.dao_fund, dao_percent))?;
    let marketing = apply_bps(
        minted,
        percent_if_set(&funds.marketing_fund, marketing_percent),
    )?;
    pay_fund(e, token, &funds.dao_fund, dao, "dao_funded");
    pay_fund(e, token, &funds.marketing_fund, marketing, "marketing_funded");
    let remaining = sub(sub(minted, dao)?, marketing)?;
    target.deliver(e, remaining);
    Ok(remaining)
}
