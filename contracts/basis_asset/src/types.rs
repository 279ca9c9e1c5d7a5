use soroban_sdk::{contracttype, Address, String};

/// Spending allowance granted by `from` to `spender`.
#[contracttype]
#[derive(Clone, Debug)]
pub struct AllowanceValue {
    pub amount: i128,
    /// Last ledger sequence at which the allowance can be spent.
    pub expiration_ledger: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TokenMetadata {
    pub decimals: u32,
    pub name: String,
    pub symbol: String,
}

#[contracttype]
pub enum DataKey {
    /// Only address allowed to mint; normally the treasury.
    Operator,
    /// Sum of all balances.
    TotalSupply,
    /// Name, symbol and decimals.
    Metadata,
    /// Per-holder balance.
    Balance(Address),
    /// Allowance keyed by (owner, spender).
    Allowance(Address, Address),
}
