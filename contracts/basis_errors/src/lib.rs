#![no_std]

use soroban_sdk::contracterror;

/// @title  ErrorCategory
/// @notice Groups errors by domain for monitoring, alerting, and dashboards.
/// @dev    Off-chain keepers should switch on this value first, then ask
///         `is_retriable`. Within `Oracle` only `PriceMoved` is retriable
///         (re-quote); a failed feed read is fatal. Budget and reserve
///         errors under `Market` clear next epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Contract setup, initialization and migration errors (codes 1-99).
    Initialization,
    /// Caller identity and operator-authority errors (codes 100-199).
    Authorization,
    /// Epoch clock and same-slot guard errors (codes 200-299).
    Epoch,
    /// Price feed errors (codes 300-399).
    Oracle,
    /// Bond and coupon market errors (codes 400-499).
    Market,
    /// Governance parameter errors (codes 500-599).
    Governance,
    /// Safe-math errors (codes 700-799).
    Arithmetic,
}

/// @title  ContractError
/// @notice Canonical error enum shared by the Basis contracts.
/// @dev    Codes are wire-stable. Never renumber a variant after deployment.
///         Append new variants at the end of their category block only.
///
/// Error Code Layout:
///   1  -  99  : Initialization
///   100 - 199 : Authorization
///   200 - 299 : Epoch
///   300 - 399 : Oracle
///   400 - 499 : Market
///   500 - 599 : Governance
///   700 - 799 : Arithmetic
#[contracterror]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // --- Initialization (1-99) ---
    /// Contract has not been initialized yet.
    NotInitialized = 1,

    /// Contract has already been initialized and cannot be re-initialized.
    AlreadyInitialized = 2,

    /// Treasury handed its operator roles to a successor and is frozen.
    AlreadyMigrated = 3,

    // --- Authorization (100-199) ---
    /// Caller is not the treasury operator.
    NotOperator = 100,

    /// The treasury is not the operator of a managed asset or boardroom.
    TreasuryNotOperator = 101,

    // --- Epoch (200-299) ---
    /// Ledger time is before the treasury start time.
    NotStarted = 200,

    /// Ledger time is before the next epoch point.
    EpochNotOpened = 201,

    /// A guarded entry point was re-entered within the same invocation.
    ReentrancyDetected = 202,

    /// The same caller already used a guarded entry point in this ledger.
    SameSlotCall = 203,

    // --- Oracle (300-399) ---
    /// The oracle could not produce a price quote.
    OracleReadFailed = 300,

    /// The caller's target price no longer matches the oracle price.
    PriceMoved = 301,

    /// A discount or premium rate evaluated to zero.
    InvalidRate = 302,

    // --- Market (400-499) ---
    /// Amount argument must be strictly positive (> 0).
    AmountMustBePositive = 400,

    /// Price is on the wrong side of the band for a purchase.
    NotEligibleForPurchase = 401,

    /// Price is on the wrong side of the band for a redemption.
    NotEligibleForRedemption = 402,

    /// Purchase exceeds the epoch's remaining contraction budget.
    ContractionBudgetExceeded = 403,

    /// Purchase would push outstanding debt over the max debt ratio.
    OverMaxDebtRatio = 404,

    /// Treasury reserve cannot cover the redemption payout.
    InsufficientReserve = 405,

    /// Peg token is not registered with the treasury.
    PegTokenNotRegistered = 406,

    /// Peg token is registered but its activation epoch has not arrived.
    PegTokenInactive = 407,

    /// Peg token is already registered.
    PegTokenAlreadyRegistered = 408,

    /// Coupon purchase exceeds the burnable room for the peg token.
    CouponBudgetExceeded = 409,

    /// Holder's coupon record for the epoch does not cover the amount.
    InsufficientCoupons = 410,

    /// Redemption exceeds the per-epoch coupon redemption cap.
    CouponRedemptionCapExceeded = 411,

    /// Token is managed by the treasury and cannot be recovered.
    ProtectedToken = 412,

    // --- Governance (500-599) ---
    /// Parameter value is outside its allowed range.
    ParameterOutOfBounds = 500,

    /// A side fund share is configured without a fund address.
    FundNotSet = 501,

    // --- Arithmetic (700-799) ---
    /// Integer overflow detected during a checked arithmetic operation.
    Overflow = 700,

    /// Integer underflow detected during a checked arithmetic operation.
    Underflow = 701,

    /// Division by zero detected during a checked arithmetic operation.
    DivisionByZero = 702,
}

/// @title  ErrorExt
/// @notice Provides category() and description() on every ContractError variant.
pub trait ErrorExt {
    /// @return The ErrorCategory bucket this error belongs to.
    fn category(&self) -> ErrorCategory;

    /// @return A static string description safe for logging or display.
    fn description(&self) -> &'static str;

    /// @return True when the same call may succeed after re-quoting or in a
    ///         later epoch.
    fn is_retriable(&self) -> bool;
}

impl ErrorExt for ContractError {
    fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::AlreadyMigrated => ErrorCategory::Initialization,

            ContractError::NotOperator | ContractError::TreasuryNotOperator => {
                ErrorCategory::Authorization
            }

            ContractError::NotStarted
            | ContractError::EpochNotOpened
            | ContractError::ReentrancyDetected
            | ContractError::SameSlotCall => ErrorCategory::Epoch,

            ContractError::OracleReadFailed
            | ContractError::PriceMoved
            | ContractError::InvalidRate => ErrorCategory::Oracle,

            ContractError::AmountMustBePositive
            | ContractError::NotEligibleForPurchase
            | ContractError::NotEligibleForRedemption
            | ContractError::ContractionBudgetExceeded
            | ContractError::OverMaxDebtRatio
            | ContractError::InsufficientReserve
            | ContractError::PegTokenNotRegistered
            | ContractError::PegTokenInactive
            | ContractError::PegTokenAlreadyRegistered
            | ContractError::CouponBudgetExceeded
            | ContractError::InsufficientCoupons
            | ContractError::CouponRedemptionCapExceeded
            | ContractError::ProtectedToken => ErrorCategory::Market,

            ContractError::ParameterOutOfBounds | ContractError::FundNotSet => {
                ErrorCategory::Governance
            }

            ContractError::Overflow
            | ContractError::Underflow
            | ContractError::DivisionByZero => ErrorCategory::Arithmetic,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract has already been initialized",
            ContractError::AlreadyMigrated => "Treasury has been migrated",
            ContractError::NotOperator => "Caller is not the treasury operator",
            ContractError::TreasuryNotOperator => {
                "Treasury is not the operator of a managed contract"
            }
            ContractError::NotStarted => "Treasury has not started yet",
            ContractError::EpochNotOpened => "Next epoch has not opened yet",
            ContractError::ReentrancyDetected => "Reentrancy detected; call rejected",
            ContractError::SameSlotCall => "Caller already used this entry point in this ledger",
            ContractError::OracleReadFailed => "Oracle failed to produce a price",
            ContractError::PriceMoved => "Price moved since it was quoted",
            ContractError::InvalidRate => "Discount or premium rate is zero",
            ContractError::AmountMustBePositive => "Amount must be strictly positive (> 0)",
            ContractError::NotEligibleForPurchase => "Price not eligible for purchase",
            ContractError::NotEligibleForRedemption => "Price not eligible for redemption",
            ContractError::ContractionBudgetExceeded => {
                "Not enough contraction budget left this epoch"
            }
            ContractError::OverMaxDebtRatio => "Purchase exceeds the max debt ratio",
            ContractError::InsufficientReserve => "Treasury reserve cannot cover the payout",
            ContractError::PegTokenNotRegistered => "Peg token is not registered",
            ContractError::PegTokenInactive => "Peg token is not active yet",
            ContractError::PegTokenAlreadyRegistered => "Peg token is already registered",
            ContractError::CouponBudgetExceeded => "Not enough coupon room left to burn",
            ContractError::InsufficientCoupons => "Not enough coupons purchased in that epoch",
            ContractError::CouponRedemptionCapExceeded => {
                "Coupon redemption cap for this epoch reached"
            }
            ContractError::ProtectedToken => "Token is managed by the treasury",
            ContractError::ParameterOutOfBounds => "Parameter value out of bounds",
            ContractError::FundNotSet => "Fund share configured without a fund address",
            ContractError::Overflow => "Integer overflow in checked arithmetic",
            ContractError::Underflow => "Integer underflow in checked arithmetic",
            ContractError::DivisionByZero => "Division by zero in checked arithmetic",
        }
    }

    fn is_retriable(&self) -> bool {
        matches!(
            self,
            ContractError::EpochNotOpened
                | ContractError::SameSlotCall
                | ContractError::PriceMoved
                | ContractError::ContractionBudgetExceeded
                | ContractError::OverMaxDebtRatio
                | ContractError::InsufficientReserve
                | ContractError::CouponBudgetExceeded
                | ContractError::CouponRedemptionCapExceeded
        )
    }
}
