//! Price reads against the oracle interface.
//!
//! Reads that feed a decision are fatal on failure. Refreshes are best effort:
//! an oracle whose window has not elapsed rejects `update`, and that must not
//! block an epoch or a trade.

use basis_errors::ContractError;
use soroban_sdk::{log, Address, Env};

use crate::interfaces::PriceOracleClient;
use crate::math::PRICE_ONE;

/// Last published price of one unit of `token`.
pub fn read_price(e: &Env, oracle: &Address, token: &Address) -> Result<i128, ContractError> {
    match PriceOracleClient::new(e, oracle).try_consult(token, &PRICE_ONE) {
        Ok(Ok(price)) if price > 0 => Ok(price),
        _ => Err(ContractError::OracleReadFailed),
    }
}

/// Time-weighted price including the open window.
pub fn read_twap(e: &Env, oracle: &Address, token: &Address) -> Result<i128, ContractError> {
    match PriceOracleClient::new(e, oracle).try_twap(token, &PRICE_ONE) {
        Ok(Ok(price)) if price > 0 => Ok(price),
        _ => Err(ContractError::OracleReadFailed),
    }
}

pub fn refresh(e: &Env, oracle: &Address) {
    if !matches!(PriceOracleClient::new(e, oracle).try_update(), Ok(Ok(()))) {
        log!(e, "oracle refresh skipped", oracle.clone());
    }
}
