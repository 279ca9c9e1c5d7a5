//! Circulating supply of the Dollar and of peg tokens.

use basis_errors::ContractError;
use soroban_sdk::{token::TokenClient, Address, Env};

use crate::interfaces::ManagedAssetClient;
use crate::math::sub;
use crate::storage;
use crate::types::{ManagedContracts, PegTokenConfig};

pub fn total_supply(e: &Env, token: &Address) -> i128 {
    ManagedAssetClient::new(e, token).total_supply()
}

/// Dollar total supply minus the balances of excluded accounts.
pub fn dollar_circulating(e: &Env, contracts: &ManagedContracts) -> Result<i128, ContractError> {
    let dollar = TokenClient::new(e, &contracts.dollar);
    let mut circulating = total_supply(e, &contracts.dollar);
    for account in storage::excluded_from_supply(e).iter() {
        circulating = sub(circulating, dollar.balance(&account))?;
    }
    Ok(circulating.max(0))
}

/// Peg token total supply minus what sits in its farming pool.
pub fn peg_token_circulating(
    e: &Env,
    token: &Address,
    config: &PegTokenConfig,
) -> Result<i128, ContractError> {
    let supply = total_supply(e, token);
    let circulating = match &config.farming_pool {
        Some(pool) => sub(supply, TokenClient::new(e, token).balance(pool))?,
        None => supply,
    };
    Ok(circulating.max(0))
}
