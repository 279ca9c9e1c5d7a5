use soroban_sdk::{contracttype, Address};

// ─── Managed contracts ─────────────────────────────────────────────────────

/// Addresses fixed at initialization (boardroom and oracle are re-pointable
/// by governance).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManagedContracts {
    pub dollar: Address,
    pub bond: Address,
    pub share: Address,
    pub dollar_oracle: Address,
    pub boardroom: Address,
}

// ─── Monetary policy ───────────────────────────────────────────────────────

/// Price band and expansion / contraction parameters. Percentages are in
/// basis points, prices in `PRICE_ONE` precision.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PolicyConfig {
    /// Peg target.
    pub price_one: i128,
    /// Expansion trigger.
    pub price_ceiling: i128,
    pub max_supply_expansion_percent: u32,
    pub max_expansion_percent_debt: u32,
    /// Reserve below `bond_supply * floor` means the debt phase is active.
    pub bond_depletion_floor_percent: u32,
    /// Share of debt-phase seigniorage that still reaches the boardroom.
    pub expansion_floor_percent: u32,
    pub max_supply_contraction_percent: u32,
    pub max_debt_ratio_percent: u32,
    /// Multiplier on the bond-reserve top-up in the debt phase (10_000 = 1x).
    pub minting_factor_for_paying_debt: u32,
    pub bootstrap_epochs: u64,
    pub bootstrap_expansion_percent: u32,
    /// Flat Dollar mint to whoever triggers the epoch.
    pub allocate_seigniorage_salary: i128,
    /// Share of the external reward pool paid out per contraction epoch.
    pub external_reward_shared_percent: u32,
}

/// Bond market curve parameters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondConfig {
    pub discount_percent: u32,
    pub premium_percent: u32,
    /// 0 = no clamp.
    pub max_discount_rate: i128,
    /// 0 = no clamp.
    pub max_premium_rate: i128,
    /// Part of the Dollar paid for bonds kept as boardroom incentive.
    pub incentive_percent: u32,
    /// 0 disables sub-peg redemption.
    pub redeem_penalty_percent: u32,
}

/// Coupon market curve parameters, shared by every peg token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CouponConfig {
    pub discount_percent: u32,
    pub premium_percent: u32,
    pub max_discount_rate: i128,
    pub max_premium_rate: i128,
    pub max_redeem_percent_per_epoch: u32,
}

/// Side funds peeled off every boardroom send.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundConfig {
    pub dao_fund: Option<Address>,
    pub dao_fund_shared_percent: u32,
    pub bvaults_fund: Option<Address>,
    pub bvaults_fund_shared_percent: u32,
    pub marketing_fund: Option<Address>,
    pub marketing_fund_shared_percent: u32,
}

/// Every tunable of the treasury in one read, as returned by `get_config`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreasuryConfig {
    pub policy: PolicyConfig,
    pub bonds: BondConfig,
    pub coupons: CouponConfig,
    pub funds: FundConfig,
}

// ─── Peg tokens ────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PegTokenConfig {
    pub oracle: Address,
    /// Dedicated boardroom receiving this token's seigniorage.
    pub boardroom: Address,
    /// Balance held here is excluded from circulating supply.
    pub farming_pool: Option<Address>,
    /// Activation epoch; 0 = inactive.
    pub epoch_start: u64,
    /// Circulating supply that triggers the self-damping ratchet.
    pub supply_target: i128,
    pub max_expansion_percent: u32,
}

/// Lifetime coupon counters for one peg token.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CouponTotals {
    /// Outstanding, unredeemed coupons.
    pub supply: i128,
    pub issued: i128,
    pub redeemed: i128,
}

/// Outcome of one epoch transition, returned to the caller.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EpochReport {
    /// Epoch that was closed.
    pub epoch: u64,
    pub dollar_price: i128,
    /// Dollar minted for the boardroom path (before side funds).
    pub boardroom_seigniorage: i128,
    /// Dollar minted into the bond reserve.
    pub reserve_top_up: i128,
    /// Dollar paid from the external reward and incentive pools.
    pub external_reward_paid: i128,
    pub contraction: bool,
}

// ─── Storage keys ──────────────────────────────────────────────────────────

#[contracttype]
pub enum DataKey {
    /// Governance address.
    Operator,
    Contracts,
    Policy,
    Bonds,
    Coupons,
    Funds,
    StartTime,
    Epoch,
    Migrated,
    /// Dollar held as bond redemption reserve.
    SeigniorageSaved,
    /// Dollar deposited for contraction-epoch rewards.
    ExternalRewardAmount,
    /// Dollar skimmed from bond purchases.
    IncentiveAmount,
    EpochSupplyContractionLeft,
    PreviousEpochDollarPrice,
    /// Accounts whose Dollar balance is not circulating.
    ExcludedFromSupply,
    PegTokens,
    /// Reentrancy lock for guarded entry points.
    Lock,
    /// Ledger sequence of the caller's last guarded call (temporary tier).
    LastCall(Address),
    /// Set when the epoch closed in contraction (persistent tier).
    ContractionEpoch(u64),
    PegToken(Address),
    /// (peg token, holder, purchase epoch) -> coupons.
    CouponPurchased(Address, Address, u64),
    /// (peg token, holder) -> epochs with a purchase.
    CouponEpochs(Address, Address),
    CouponTotals(Address),
    /// (peg token, epoch) -> coupons redeemed during that epoch.
    CouponRedeemedInEpoch(Address, u64),
    /// (peg token, epoch) -> redemption cap snapshotted at first redemption.
    CouponEpochCap(Address, u64),
}
