//! Instruction definitions for the Stakepool Market Program

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// All instructions supported by the Stakepool Market Program
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum PredictionPoolInstruction {
    // =========================================================================
    // Initialization (0)
    // =========================================================================

    /// Initialize the engine configuration and achievement catalog
    ///
    /// The payer becomes the administrator.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer)
    /// 1. `[writable]` EngineConfig PDA
    /// 2. `[writable]` AchievementCatalog PDA
    /// 3. `[]` System Program
    Initialize(InitializeArgs),

    // =========================================================================
    // Administration (1-9)
    // =========================================================================

    /// Set the contract-wide pause flag (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[writable]` EngineConfig
    SetPaused(SetPausedArgs),

    /// Update the oracle identity (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[writable]` EngineConfig
    UpdateOracle(UpdateOracleArgs),

    /// Update the treasury identity (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[writable]` EngineConfig
    UpdateTreasury(UpdateTreasuryArgs),

    /// Hand the administrator role to another account (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[writable]` EngineConfig
    UpdateAdmin(UpdateAdminArgs),

    /// Update the platform fee rate (Admin only, max 1000 bps)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[writable]` EngineConfig
    SetFeeRate(SetFeeRateArgs),

    // =========================================================================
    // Market Lifecycle (10-19)
    // =========================================================================

    /// Create a new prediction market (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer)
    /// 1. `[writable]` EngineConfig
    /// 2. `[writable]` Market PDA
    /// 3. `[writable]` Market Vault PDA
    /// 4. `[]` System Program
    CreateMarket(CreateMarketArgs),

    /// Lock a market once its lock height has passed (Oracle or Admin)
    ///
    /// Accounts:
    /// 0. `[signer]` Oracle or Admin
    /// 1. `[]` EngineConfig
    /// 2. `[writable]` Market
    LockMarket(LockMarketArgs),

    /// Resolve a market to its winning outcome (Oracle only)
    ///
    /// Transfers the platform fee to the treasury and snapshots the fee
    /// rate into the market for claim-time arithmetic.
    ///
    /// Accounts:
    /// 0. `[signer]` Oracle
    /// 1. `[]` EngineConfig
    /// 2. `[writable]` Market
    /// 3. `[writable]` Market Vault
    /// 4. `[writable]` Treasury
    ResolveMarket(ResolveMarketArgs),

    /// Cancel a market that has not resolved (Admin only)
    ///
    /// Stakers on every outcome become eligible for a full refund via
    /// ClaimWinnings.
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` EngineConfig
    /// 2. `[writable]` Market
    CancelMarket(CancelMarketArgs),

    // =========================================================================
    // Staking (20-29)
    // =========================================================================

    /// Stake on one outcome of an active market
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Staker (payer)
    /// 1. `[]` EngineConfig
    /// 2. `[writable]` Market
    /// 3. `[writable]` Market Vault
    /// 4. `[writable]` OutcomePool PDA
    /// 5. `[writable]` StakePosition PDA
    /// 6. `[writable]` AccountStats PDA
    /// 7. `[]` AchievementCatalog
    /// 8. `[]` System Program
    /// 9. `[writable]` Achievement record PDAs for any credential due
    ///    (remaining accounts, optional)
    PlaceStake(PlaceStakeArgs),

    // =========================================================================
    // Settlement (30-39)
    // =========================================================================

    /// Claim winnings from a resolved market, or a refund from a
    /// cancelled one
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Claimer (payer)
    /// 1. `[]` EngineConfig
    /// 2. `[]` Market
    /// 3. `[]` OutcomePool for the claimed outcome
    /// 4. `[writable]` StakePosition
    /// 5. `[writable]` Market Vault
    /// 6. `[writable]` AccountStats PDA
    /// 7. `[]` AchievementCatalog
    /// 8. `[]` System Program
    /// 9. `[writable]` Achievement record PDAs for any credential due
    ///    (remaining accounts, optional)
    ClaimWinnings(ClaimWinningsArgs),

    // =========================================================================
    // Achievements (40-49)
    // =========================================================================

    /// Mint an achievement credential explicitly (Admin only)
    ///
    /// Unlike the automatic path, failures here are hard errors.
    ///
    /// Accounts:
    /// 0. `[signer, writable]` Admin (payer)
    /// 1. `[]` EngineConfig
    /// 2. `[]` AchievementCatalog
    /// 3. `[writable]` AchievementRecord PDA
    /// 4. `[writable]` Owner's AccountStats PDA
    /// 5. `[]` System Program
    MintAchievement(MintAchievementArgs),

    /// Update one achievement catalog entry (Admin only)
    ///
    /// Accounts:
    /// 0. `[signer]` Admin
    /// 1. `[]` EngineConfig
    /// 2. `[writable]` AchievementCatalog
    ConfigureAchievement(ConfigureAchievementArgs),
}

// ============================================================================
// Instruction Arguments
// ============================================================================

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct InitializeArgs {
    /// Oracle identity (locks and resolves markets)
    pub oracle: Pubkey,
    /// Treasury identity (receives platform fees)
    pub treasury: Pubkey,
    /// Platform fee rate (basis points, max 1000)
    pub fee_bps: u16,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct SetPausedArgs {
    /// New pause flag
    pub paused: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct UpdateOracleArgs {
    /// New oracle identity
    pub oracle: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct UpdateTreasuryArgs {
    /// New treasury identity
    pub treasury: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct UpdateAdminArgs {
    /// New administrator identity
    pub admin: Pubkey,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct SetFeeRateArgs {
    /// New fee rate (basis points, max 1000)
    pub fee_bps: u16,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CreateMarketArgs {
    /// Market title
    pub title: String,
    /// Market description
    pub description: String,
    /// Market category
    pub category: String,
    /// Ordered outcome labels (2-10)
    pub outcomes: Vec<String>,
    /// Height after which staking closes
    pub lock_height: u64,
    /// Earliest height at which the oracle may resolve
    pub resolution_height: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct LockMarketArgs {
    /// Market ID
    pub market_id: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ResolveMarketArgs {
    /// Market ID
    pub market_id: u64,
    /// Winning outcome index (0-based)
    pub winning_outcome: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CancelMarketArgs {
    /// Market ID
    pub market_id: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct PlaceStakeArgs {
    /// Market ID
    pub market_id: u64,
    /// Outcome index (0-based)
    pub outcome_index: u8,
    /// Stake amount (smallest units)
    pub amount: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ClaimWinningsArgs {
    /// Market ID
    pub market_id: u64,
    /// Outcome index the caller staked on. Resolved markets only pay the
    /// winning index; cancelled markets refund any index.
    pub outcome_index: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct MintAchievementArgs {
    /// Credential owner
    pub owner: Pubkey,
    /// Achievement kind index
    pub kind: u8,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct ConfigureAchievementArgs {
    /// Achievement kind index
    pub kind: u8,
    /// New metadata URI
    pub uri: String,
    /// New enablement flag
    pub enabled: bool,
}

// ============================================================================
// Tests
// ============================================================================
