/// All panic messages used by the basis_asset contract.
///
/// Using string constants avoids typos in `#[should_panic(expected = "...")]` tests.
pub const ERR_ALREADY_INITIALIZED: &str = "already initialized";
pub const ERR_NOT_INITIALIZED: &str = "not initialized";
pub const ERR_NEGATIVE_AMOUNT: &str = "negative amount is not allowed";
pub const ERR_INSUFFICIENT_BALANCE: &str = "insufficient balance";
pub const ERR_INSUFFICIENT_ALLOWANCE: &str = "insufficient allowance";
pub const ERR_EXPIRED_LEDGER: &str = "expiration ledger is in the past";
pub const ERR_DECIMALS_TOO_LARGE: &str = "decimals must not exceed 18";
