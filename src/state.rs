//! State definitions for the Stakepool Market Program
//!
//! All account structures used by the program.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::error::PredictionPoolError;

// ============================================================================
// Discriminators
// ============================================================================

pub const CONFIG_DISCRIMINATOR: u64 = 0x53504D5F4346475F; // "SPM_CFG_"
pub const MARKET_DISCRIMINATOR: u64 = 0x53504D5F4D4B545F; // "SPM_MKT_"
pub const OUTCOME_POOL_DISCRIMINATOR: u64 = 0x53504D5F504F4F4C; // "SPM_POOL"
pub const STAKE_DISCRIMINATOR: u64 = 0x53504D5F53544B5F; // "SPM_STK_"
pub const ACHIEVEMENT_DISCRIMINATOR: u64 = 0x53504D5F4143485F; // "SPM_ACH_"
pub const STATS_DISCRIMINATOR: u64 = 0x53504D5F53544154; // "SPM_STAT"
pub const CATALOG_DISCRIMINATOR: u64 = 0x53504D5F4341545F; // "SPM_CAT_"

// ============================================================================
// PDA Seeds
// ============================================================================

pub const CONFIG_SEED: &[u8] = b"config";
pub const MARKET_SEED: &[u8] = b"market";
pub const MARKET_VAULT_SEED: &[u8] = b"market_vault";
pub const OUTCOME_POOL_SEED: &[u8] = b"outcome_pool";
pub const STAKE_SEED: &[u8] = b"stake";
pub const ACHIEVEMENT_SEED: &[u8] = b"achievement";
pub const STATS_SEED: &[u8] = b"stats";
pub const CATALOG_SEED: &[u8] = b"achievement_catalog";

// ============================================================================
// Constants
// ============================================================================

/// Minimum number of outcomes per market
pub const MIN_OUTCOMES: usize = 2;

/// Maximum number of outcomes per market
pub const MAX_OUTCOMES: usize = 10;

/// Maximum length of market title (bytes)
pub const MAX_TITLE_LEN: usize = 128;

/// Maximum length of market description (bytes)
pub const MAX_DESCRIPTION_LEN: usize = 512;

/// Maximum length of market category (bytes)
pub const MAX_CATEGORY_LEN: usize = 64;

/// Maximum length of an outcome label (bytes)
pub const MAX_OUTCOME_LABEL_LEN: usize = 64;

/// Maximum length of an achievement URI (bytes)
pub const MAX_ACHIEVEMENT_URI_LEN: usize = 200;

/// Minimum stake (1 native token unit, smallest units)
pub const MIN_STAKE: u64 = 1_000_000;

/// Maximum stake (100 native token units, smallest units)
pub const MAX_STAKE: u64 = 100_000_000;

/// Maximum platform fee (10%)
pub const MAX_FEE_BPS: u16 = 1000;

/// Default platform fee (3%)
pub const DEFAULT_FEE_BPS: u16 = 300;

/// Basis point denominator (10000 bps = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Cumulative winnings required for the HighEarner credential
/// (100 native token units, smallest units)
pub const HIGH_EARNER_THRESHOLD: u64 = 100_000_000;

// ============================================================================
// Enums
// ============================================================================

/// Market lifecycle status
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketStatus {
    /// Open for staking
    Active = 0,
    /// Past lock height, awaiting resolution
    Locked = 1,
    /// Resolved with a winning outcome (claims available)
    Resolved = 2,
    /// Cancelled (refunds available)
    Cancelled = 3,
}

impl Default for MarketStatus {
    fn default() -> Self {
        MarketStatus::Active
    }
}

/// Achievement credential kinds
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementKind {
    /// First stake ever placed
    FirstPrediction = 0,
    /// First winning claim
    FirstWin = 1,
    /// Five winning claims
    FiveWins = 2,
    /// Ten winning claims
    TenWins = 3,
    /// Cumulative winnings reached HIGH_EARNER_THRESHOLD
    HighEarner = 4,
}

/// Number of achievement kinds
pub const ACHIEVEMENT_KIND_COUNT: usize = 5;

impl AchievementKind {
    /// All kinds, in catalog order
    pub const ALL: [AchievementKind; ACHIEVEMENT_KIND_COUNT] = [
        AchievementKind::FirstPrediction,
        AchievementKind::FirstWin,
        AchievementKind::FiveWins,
        AchievementKind::TenWins,
        AchievementKind::HighEarner,
    ];

    /// Catalog index / PDA seed byte
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Parse from a raw index
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(AchievementKind::FirstPrediction),
            1 => Some(AchievementKind::FirstWin),
            2 => Some(AchievementKind::FiveWins),
            3 => Some(AchievementKind::TenWins),
            4 => Some(AchievementKind::HighEarner),
            _ => None,
        }
    }

    /// Default metadata URI for the catalog
    pub fn default_uri(self) -> &'static str {
        match self {
            AchievementKind::FirstPrediction => "ipfs://achievements/first-prediction.json",
            AchievementKind::FirstWin => "ipfs://achievements/first-win.json",
            AchievementKind::FiveWins => "ipfs://achievements/five-wins.json",
            AchievementKind::TenWins => "ipfs://achievements/ten-wins.json",
            AchievementKind::HighEarner => "ipfs://achievements/high-earner.json",
        }
    }
}

// ============================================================================
// Account Structures
// ============================================================================

/// Global configuration for the Stakepool Market Program
///
/// PDA Seeds: ["config"]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct EngineConfig {
    /// Account discriminator
    pub discriminator: u64,

    /// Program administrator
    pub admin: Pubkey,

    /// Oracle authority (locks and resolves markets)
    pub oracle: Pubkey,

    /// Treasury account (receives platform fees)
    pub treasury: Pubkey,

    /// Platform fee rate (basis points, max MAX_FEE_BPS)
    pub fee_bps: u16,

    /// Next market ID
    pub next_market_id: u64,

    /// Total markets created
    pub total_markets: u64,

    /// Is the program paused?
    pub is_paused: bool,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl EngineConfig {
    pub const SIZE: usize = 8   // discriminator
        + 32  // admin
        + 32  // oracle
        + 32  // treasury
        + 2   // fee_bps
        + 8   // next_market_id
        + 8   // total_markets
        + 1   // is_paused
        + 1   // bump
        + 64; // reserved

    /// PDA seeds
    pub fn seeds() -> Vec<Vec<u8>> {
        vec![CONFIG_SEED.to_vec()]
    }

    /// Create new config
    pub fn new(admin: Pubkey, oracle: Pubkey, treasury: Pubkey, fee_bps: u16, bump: u8) -> Self {
        Self {
            discriminator: CONFIG_DISCRIMINATOR,
            admin,
            oracle,
            treasury,
            fee_bps,
            next_market_id: 1,
            total_markets: 0,
            is_paused: false,
            bump,
            reserved: [0u8; 64],
        }
    }

    /// Check the caller is the administrator
    pub fn ensure_admin(&self, caller: &Pubkey) -> Result<(), PredictionPoolError> {
        if self.admin != *caller {
            return Err(PredictionPoolError::NotAuthorized);
        }
        Ok(())
    }

    /// Check the caller is the oracle (administrator alone is insufficient)
    pub fn ensure_oracle(&self, caller: &Pubkey) -> Result<(), PredictionPoolError> {
        if self.oracle != *caller {
            return Err(PredictionPoolError::InvalidOracle);
        }
        Ok(())
    }

    /// Check the caller is either the oracle or the administrator
    pub fn ensure_oracle_or_admin(&self, caller: &Pubkey) -> Result<(), PredictionPoolError> {
        if self.oracle != *caller && self.admin != *caller {
            return Err(PredictionPoolError::NotAuthorized);
        }
        Ok(())
    }

    /// Check the pause flag is clear
    pub fn ensure_not_paused(&self) -> Result<(), PredictionPoolError> {
        if self.is_paused {
            return Err(PredictionPoolError::Paused);
        }
        Ok(())
    }

    /// Update the fee rate, enforcing the configuration bound
    pub fn set_fee_bps(&mut self, fee_bps: u16) -> Result<(), PredictionPoolError> {
        if fee_bps > MAX_FEE_BPS {
            return Err(PredictionPoolError::InvalidFee);
        }
        self.fee_bps = fee_bps;
        Ok(())
    }
}

/// A single prediction market
///
/// PDA Seeds: ["market", market_id.to_le_bytes()]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct Market {
    /// Account discriminator
    pub discriminator: u64,

    /// Unique market ID
    pub market_id: u64,

    /// Market creator (administrator at creation time)
    pub creator: Pubkey,

    /// Market title
    pub title: String,

    /// Market description
    pub description: String,

    /// Market category
    pub category: String,

    /// Ordered outcome labels (2-10)
    pub outcomes: Vec<String>,

    /// Number of outcomes
    pub num_outcomes: u8,

    /// Current market status
    pub status: MarketStatus,

    /// Height after which staking closes
    pub lock_height: u64,

    /// Earliest height at which the oracle may resolve
    pub resolution_height: u64,

    /// Market creation height
    pub created_at_height: u64,

    /// Total staked across all outcomes (smallest units)
    pub total_pool: u64,

    /// Winning outcome index (set on resolution)
    pub winning_outcome: Option<u8>,

    /// Fee rate snapshotted at resolution; claims must use this value,
    /// never the live configuration
    pub resolved_fee_bps: Option<u16>,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 32],
}

impl Market {
    /// Maximum borsh-encoded size (strings and outcome list at capacity)
    pub const SIZE: usize = 8   // discriminator
        + 8   // market_id
        + 32  // creator
        + 4 + MAX_TITLE_LEN        // title
        + 4 + MAX_DESCRIPTION_LEN  // description
        + 4 + MAX_CATEGORY_LEN     // category
        + 4 + MAX_OUTCOMES * (4 + MAX_OUTCOME_LABEL_LEN) // outcomes
        + 1   // num_outcomes
        + 1   // status
        + 8   // lock_height
        + 8   // resolution_height
        + 8   // created_at_height
        + 8   // total_pool
        + 1 + 1 // winning_outcome (Option<u8>)
        + 1 + 2 // resolved_fee_bps (Option<u16>)
        + 1   // bump
        + 32; // reserved

    /// PDA seeds
    pub fn seeds(market_id: u64) -> Vec<Vec<u8>> {
        vec![
            MARKET_SEED.to_vec(),
            market_id.to_le_bytes().to_vec(),
        ]
    }

    /// Market vault PDA seeds (native-asset custody account)
    pub fn vault_seeds(market_id: u64) -> Vec<Vec<u8>> {
        vec![
            MARKET_VAULT_SEED.to_vec(),
            market_id.to_le_bytes().to_vec(),
        ]
    }

    /// Check the market has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, MarketStatus::Resolved | MarketStatus::Cancelled)
    }

    /// Check the market is resolved with a winning outcome
    pub fn is_resolved(&self) -> bool {
        self.status == MarketStatus::Resolved && self.winning_outcome.is_some()
    }

    /// Check an outcome index is within range
    pub fn validate_outcome(&self, outcome_index: u8) -> Result<(), PredictionPoolError> {
        if outcome_index >= self.num_outcomes {
            return Err(PredictionPoolError::InvalidOutcome);
        }
        Ok(())
    }

    /// Check the market accepts stakes at the given height
    pub fn ensure_open_for_staking(&self, current_height: u64) -> Result<(), PredictionPoolError> {
        if self.status != MarketStatus::Active {
            return Err(PredictionPoolError::MarketClosed);
        }
        if current_height >= self.lock_height {
            return Err(PredictionPoolError::MarketLocked);
        }
        Ok(())
    }

    /// Check the market can transition Active -> Locked at the given height
    pub fn ensure_lockable(&self, current_height: u64) -> Result<(), PredictionPoolError> {
        if self.status != MarketStatus::Active {
            return Err(PredictionPoolError::InvalidMarketState);
        }
        if current_height < self.lock_height {
            return Err(PredictionPoolError::InvalidDate);
        }
        Ok(())
    }

    /// Check the market can be resolved to the given outcome at the given height
    pub fn ensure_resolvable(
        &self,
        current_height: u64,
        winning_outcome: u8,
    ) -> Result<(), PredictionPoolError> {
        if self.is_terminal() {
            return Err(PredictionPoolError::MarketAlreadyResolved);
        }
        if current_height < self.resolution_height {
            return Err(PredictionPoolError::InvalidDate);
        }
        self.validate_outcome(winning_outcome)
    }

    /// Check the market can be cancelled (never from Resolved)
    pub fn ensure_cancellable(&self) -> Result<(), PredictionPoolError> {
        if self.is_terminal() {
            return Err(PredictionPoolError::InvalidMarketState);
        }
        Ok(())
    }
}

/// Aggregate pool for one outcome of a market
///
/// Created lazily on the first stake into that outcome.
///
/// PDA Seeds: ["outcome_pool", market_id.to_le_bytes(), outcome_index]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct OutcomePool {
    /// Account discriminator
    pub discriminator: u64,

    /// Market ID
    pub market_id: u64,

    /// Outcome index
    pub outcome_index: u8,

    /// Total staked on this outcome (smallest units)
    pub total_staked: u64,

    /// Number of distinct stakers on this outcome
    pub staker_count: u64,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 16],
}

impl OutcomePool {
    pub const SIZE: usize = 8   // discriminator
        + 8   // market_id
        + 1   // outcome_index
        + 8   // total_staked
        + 8   // staker_count
        + 1   // bump
        + 16; // reserved

    /// PDA seeds
    pub fn seeds(market_id: u64, outcome_index: u8) -> Vec<Vec<u8>> {
        vec![
            OUTCOME_POOL_SEED.to_vec(),
            market_id.to_le_bytes().to_vec(),
            vec![outcome_index],
        ]
    }

    /// Create a new empty pool
    pub fn new(market_id: u64, outcome_index: u8, bump: u8) -> Self {
        Self {
            discriminator: OUTCOME_POOL_DISCRIMINATOR,
            market_id,
            outcome_index,
            total_staked: 0,
            staker_count: 0,
            bump,
            reserved: [0u8; 16],
        }
    }
}

/// An account's cumulative stake on one outcome of a market
///
/// Repeated stakes on the same outcome accumulate into this single record.
///
/// PDA Seeds: ["stake", market_id.to_le_bytes(), outcome_index, staker]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct StakePosition {
    /// Account discriminator
    pub discriminator: u64,

    /// Market ID
    pub market_id: u64,

    /// Outcome index
    pub outcome_index: u8,

    /// Staker account
    pub staker: Pubkey,

    /// Cumulative staked amount (smallest units)
    pub amount: u64,

    /// Height of the last stake into this record
    pub updated_at_height: u64,

    /// Set once by the claim operation, never reverts
    pub claimed: bool,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 16],
}

impl StakePosition {
    pub const SIZE: usize = 8   // discriminator
        + 8   // market_id
        + 1   // outcome_index
        + 32  // staker
        + 8   // amount
        + 8   // updated_at_height
        + 1   // claimed
        + 1   // bump
        + 16; // reserved

    /// PDA seeds
    pub fn seeds(market_id: u64, outcome_index: u8, staker: &Pubkey) -> Vec<Vec<u8>> {
        vec![
            STAKE_SEED.to_vec(),
            market_id.to_le_bytes().to_vec(),
            vec![outcome_index],
            staker.to_bytes().to_vec(),
        ]
    }

    /// Create a new empty stake record
    pub fn new(market_id: u64, outcome_index: u8, staker: Pubkey, bump: u8) -> Self {
        Self {
            discriminator: STAKE_DISCRIMINATOR,
            market_id,
            outcome_index,
            staker,
            amount: 0,
            updated_at_height: 0,
            claimed: false,
            bump,
            reserved: [0u8; 16],
        }
    }

    /// Check the record has not been claimed yet
    pub fn ensure_unclaimed(&self) -> Result<(), PredictionPoolError> {
        if self.claimed {
            return Err(PredictionPoolError::AlreadyClaimed);
        }
        Ok(())
    }
}

/// A soulbound achievement credential
///
/// At most one record ever exists per (owner, kind); its presence is the
/// "already granted" marker. No transfer operation exists.
///
/// PDA Seeds: ["achievement", owner, kind]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct AchievementRecord {
    /// Account discriminator
    pub discriminator: u64,

    /// Credential owner (permanent)
    pub owner: Pubkey,

    /// Achievement kind
    pub kind: AchievementKind,

    /// Height at which the credential was minted
    pub minted_at_height: u64,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 16],
}

impl AchievementRecord {
    pub const SIZE: usize = 8   // discriminator
        + 32  // owner
        + 1   // kind
        + 8   // minted_at_height
        + 1   // bump
        + 16; // reserved

    /// PDA seeds
    pub fn seeds(owner: &Pubkey, kind: AchievementKind) -> Vec<Vec<u8>> {
        vec![
            ACHIEVEMENT_SEED.to_vec(),
            owner.to_bytes().to_vec(),
            vec![kind.index()],
        ]
    }

    /// Create a new credential record
    pub fn new(owner: Pubkey, kind: AchievementKind, minted_at_height: u64, bump: u8) -> Self {
        Self {
            discriminator: ACHIEVEMENT_DISCRIMINATOR,
            owner,
            kind,
            minted_at_height,
            bump,
            reserved: [0u8; 16],
        }
    }
}

/// Per-account lifetime statistics
///
/// All counters are monotonically non-decreasing.
///
/// PDA Seeds: ["stats", owner]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct AccountStats {
    /// Account discriminator
    pub discriminator: u64,

    /// Stats owner
    pub owner: Pubkey,

    /// Total predictions made (stake operations)
    pub total_predictions: u64,

    /// Total winning claims
    pub total_wins: u64,

    /// Total value earned from winning claims (smallest units)
    pub total_value_earned: u64,

    /// Achievement credentials minted
    pub achievement_count: u64,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 16],
}

impl AccountStats {
    pub const SIZE: usize = 8   // discriminator
        + 32  // owner
        + 8   // total_predictions
        + 8   // total_wins
        + 8   // total_value_earned
        + 8   // achievement_count
        + 1   // bump
        + 16; // reserved

    /// PDA seeds
    pub fn seeds(owner: &Pubkey) -> Vec<Vec<u8>> {
        vec![
            STATS_SEED.to_vec(),
            owner.to_bytes().to_vec(),
        ]
    }

    /// Create a new zeroed stats record
    pub fn new(owner: Pubkey, bump: u8) -> Self {
        Self {
            discriminator: STATS_DISCRIMINATOR,
            owner,
            total_predictions: 0,
            total_wins: 0,
            total_value_earned: 0,
            achievement_count: 0,
            bump,
            reserved: [0u8; 16],
        }
    }

    /// Record a stake operation; returns the new prediction total
    pub fn record_prediction(&mut self) -> u64 {
        self.total_predictions = self.total_predictions.saturating_add(1);
        self.total_predictions
    }

    /// Record a winning claim; returns the new win total
    pub fn record_win(&mut self) -> u64 {
        self.total_wins = self.total_wins.saturating_add(1);
        self.total_wins
    }

    /// Record earned value; returns the new cumulative total
    pub fn record_earnings(&mut self, amount: u64) -> u64 {
        self.total_value_earned = self.total_value_earned.saturating_add(amount);
        self.total_value_earned
    }
}

/// One achievement catalog entry
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct CatalogEntry {
    /// Achievement kind
    pub kind: AchievementKind,

    /// Can this kind currently be minted?
    pub enabled: bool,

    /// Metadata URI
    pub uri: String,
}

impl CatalogEntry {
    pub const SIZE: usize = 1   // kind
        + 1   // enabled
        + 4 + MAX_ACHIEVEMENT_URI_LEN; // uri
}

/// Achievement metadata catalog
///
/// The mint path consults this registry for enablement and URIs.
///
/// PDA Seeds: ["achievement_catalog"]
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub struct AchievementCatalog {
    /// Account discriminator
    pub discriminator: u64,

    /// One entry per achievement kind, in AchievementKind::ALL order
    pub entries: Vec<CatalogEntry>,

    /// PDA bump
    pub bump: u8,

    /// Reserved for future use
    pub reserved: [u8; 16],
}

impl AchievementCatalog {
    pub const SIZE: usize = 8   // discriminator
        + 4 + ACHIEVEMENT_KIND_COUNT * CatalogEntry::SIZE // entries
        + 1   // bump
        + 16; // reserved

    /// PDA seeds
    pub fn seeds() -> Vec<Vec<u8>> {
        vec![CATALOG_SEED.to_vec()]
    }

    /// Create a catalog with every kind enabled at its default URI
    pub fn new(bump: u8) -> Self {
        Self {
            discriminator: CATALOG_DISCRIMINATOR,
            entries: AchievementKind::ALL
                .iter()
                .map(|&kind| CatalogEntry {
                    kind,
                    enabled: true,
                    uri: kind.default_uri().to_string(),
                })
                .collect(),
            bump,
            reserved: [0u8; 16],
        }
    }

    /// Look up the entry for a kind
    pub fn entry(&self, kind: AchievementKind) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Check a kind is present and enabled
    pub fn is_enabled(&self, kind: AchievementKind) -> bool {
        self.entry(kind).map(|e| e.enabled).unwrap_or(false)
    }

    /// Update one entry
    pub fn set_entry(
        &mut self,
        kind: AchievementKind,
        uri: String,
        enabled: bool,
    ) -> Result<(), PredictionPoolError> {
        if uri.len() > MAX_ACHIEVEMENT_URI_LEN {
            return Err(PredictionPoolError::InvalidInput);
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.kind == kind)
            .ok_or(PredictionPoolError::InvalidAchievement)?;
        entry.uri = uri;
        entry.enabled = enabled;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::pubkey::Pubkey;

    fn test_market(lock_height: u64, resolution_height: u64) -> Market {
        Market {
            discriminator: MARKET_DISCRIMINATOR,
            market_id: 1,
            creator: Pubkey::new_unique(),
            title: "Test market".to_string(),
            description: "A test market".to_string(),
            category: "test".to_string(),
            outcomes: vec!["A".to_string(), "B".to_string()],
            num_outcomes: 2,
            status: MarketStatus::Active,
            lock_height,
            resolution_height,
            created_at_height: 100,
            total_pool: 0,
            winning_outcome: None,
            resolved_fee_bps: None,
            bump: 255,
            reserved: [0u8; 32],
        }
    }

    #[test]
    fn test_account_sizes() {
        assert_eq!(EngineConfig::SIZE, 188);
        assert_eq!(OutcomePool::SIZE, 50);
        assert_eq!(StakePosition::SIZE, 83);
        assert_eq!(AchievementRecord::SIZE, 66);
        assert_eq!(AccountStats::SIZE, 89);
        assert!(Market::SIZE > 0);
        assert!(AchievementCatalog::SIZE > 0);
    }

    #[test]
    fn test_market_size_covers_max_encoding() {
        let market = Market {
            title: "t".repeat(MAX_TITLE_LEN),
            description: "d".repeat(MAX_DESCRIPTION_LEN),
            category: "c".repeat(MAX_CATEGORY_LEN),
            outcomes: (0..MAX_OUTCOMES)
                .map(|_| "o".repeat(MAX_OUTCOME_LABEL_LEN))
                .collect(),
            num_outcomes: MAX_OUTCOMES as u8,
            winning_outcome: Some(9),
            resolved_fee_bps: Some(MAX_FEE_BPS),
            ..test_market(200, 300)
        };
        let encoded = market.try_to_vec().unwrap();
        assert!(encoded.len() <= Market::SIZE);
    }

    #[test]
    fn test_catalog_size_covers_max_encoding() {
        let mut catalog = AchievementCatalog::new(255);
        for kind in AchievementKind::ALL {
            catalog
                .set_entry(kind, "u".repeat(MAX_ACHIEVEMENT_URI_LEN), true)
                .unwrap();
        }
        let encoded = catalog.try_to_vec().unwrap();
        assert!(encoded.len() <= AchievementCatalog::SIZE);
    }

    #[test]
    fn test_config_authorization() {
        let admin = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();
        let stranger = Pubkey::new_unique();
        let config = EngineConfig::new(admin, oracle, Pubkey::new_unique(), DEFAULT_FEE_BPS, 255);

        assert!(config.ensure_admin(&admin).is_ok());
        assert_eq!(
            config.ensure_admin(&oracle),
            Err(PredictionPoolError::NotAuthorized)
        );

        assert!(config.ensure_oracle(&oracle).is_ok());
        // Administrator alone is insufficient to resolve
        assert_eq!(
            config.ensure_oracle(&admin),
            Err(PredictionPoolError::InvalidOracle)
        );

        assert!(config.ensure_oracle_or_admin(&admin).is_ok());
        assert!(config.ensure_oracle_or_admin(&oracle).is_ok());
        assert_eq!(
            config.ensure_oracle_or_admin(&stranger),
            Err(PredictionPoolError::NotAuthorized)
        );
    }

    #[test]
    fn test_config_pause_gate() {
        let mut config = EngineConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            DEFAULT_FEE_BPS,
            255,
        );
        assert!(config.ensure_not_paused().is_ok());
        config.is_paused = true;
        assert_eq!(config.ensure_not_paused(), Err(PredictionPoolError::Paused));
    }

    #[test]
    fn test_fee_rate_boundary() {
        let mut config = EngineConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            DEFAULT_FEE_BPS,
            255,
        );
        // 10.01% is rejected, 10% accepted
        assert_eq!(config.set_fee_bps(1001), Err(PredictionPoolError::InvalidFee));
        assert_eq!(config.fee_bps, DEFAULT_FEE_BPS);
        assert!(config.set_fee_bps(1000).is_ok());
        assert_eq!(config.fee_bps, 1000);
        assert!(config.set_fee_bps(0).is_ok());
    }

    #[test]
    fn test_staking_gates() {
        let market = test_market(200, 300);

        assert!(market.ensure_open_for_staking(150).is_ok());
        assert_eq!(
            market.ensure_open_for_staking(200),
            Err(PredictionPoolError::MarketLocked)
        );

        let mut locked = test_market(200, 300);
        locked.status = MarketStatus::Locked;
        assert_eq!(
            locked.ensure_open_for_staking(150),
            Err(PredictionPoolError::MarketClosed)
        );
    }

    #[test]
    fn test_lock_transition() {
        let market = test_market(200, 300);
        assert_eq!(
            market.ensure_lockable(199),
            Err(PredictionPoolError::InvalidDate)
        );
        assert!(market.ensure_lockable(200).is_ok());

        let mut resolved = test_market(200, 300);
        resolved.status = MarketStatus::Resolved;
        assert_eq!(
            resolved.ensure_lockable(250),
            Err(PredictionPoolError::InvalidMarketState)
        );
    }

    #[test]
    fn test_resolve_transition() {
        let market = test_market(200, 300);
        // Too early
        assert_eq!(
            market.ensure_resolvable(299, 0),
            Err(PredictionPoolError::InvalidDate)
        );
        // Resolvable from Active
        assert!(market.ensure_resolvable(300, 0).is_ok());
        // Out-of-range outcome
        assert_eq!(
            market.ensure_resolvable(300, 2),
            Err(PredictionPoolError::InvalidOutcome)
        );

        // Resolvable from Locked
        let mut locked = test_market(200, 300);
        locked.status = MarketStatus::Locked;
        assert!(locked.ensure_resolvable(300, 1).is_ok());

        // Never twice
        let mut resolved = test_market(200, 300);
        resolved.status = MarketStatus::Resolved;
        assert_eq!(
            resolved.ensure_resolvable(300, 0),
            Err(PredictionPoolError::MarketAlreadyResolved)
        );

        let mut cancelled = test_market(200, 300);
        cancelled.status = MarketStatus::Cancelled;
        assert_eq!(
            cancelled.ensure_resolvable(300, 0),
            Err(PredictionPoolError::MarketAlreadyResolved)
        );
    }

    #[test]
    fn test_cancel_transition() {
        let market = test_market(200, 300);
        assert!(market.ensure_cancellable().is_ok());

        let mut locked = test_market(200, 300);
        locked.status = MarketStatus::Locked;
        assert!(locked.ensure_cancellable().is_ok());

        // Never from Resolved
        let mut resolved = test_market(200, 300);
        resolved.status = MarketStatus::Resolved;
        assert_eq!(
            resolved.ensure_cancellable(),
            Err(PredictionPoolError::InvalidMarketState)
        );

        let mut cancelled = test_market(200, 300);
        cancelled.status = MarketStatus::Cancelled;
        assert_eq!(
            cancelled.ensure_cancellable(),
            Err(PredictionPoolError::InvalidMarketState)
        );
    }

    #[test]
    fn test_stake_claim_flag() {
        let mut stake = StakePosition::new(1, 0, Pubkey::new_unique(), 255);
        assert!(stake.ensure_unclaimed().is_ok());
        stake.claimed = true;
        assert_eq!(
            stake.ensure_unclaimed(),
            Err(PredictionPoolError::AlreadyClaimed)
        );
    }

    #[test]
    fn test_stats_counters() {
        let mut stats = AccountStats::new(Pubkey::new_unique(), 255);
        assert_eq!(stats.record_prediction(), 1);
        assert_eq!(stats.record_prediction(), 2);
        assert_eq!(stats.record_win(), 1);
        assert_eq!(stats.record_earnings(5_000_000), 5_000_000);
        assert_eq!(stats.record_earnings(2_000_000), 7_000_000);
        assert_eq!(stats.total_predictions, 2);
        assert_eq!(stats.total_wins, 1);
    }

    #[test]
    fn test_catalog_operations() {
        let mut catalog = AchievementCatalog::new(255);
        assert_eq!(catalog.entries.len(), ACHIEVEMENT_KIND_COUNT);
        assert!(catalog.is_enabled(AchievementKind::FirstWin));

        catalog
            .set_entry(AchievementKind::FirstWin, "ipfs://new".to_string(), false)
            .unwrap();
        assert!(!catalog.is_enabled(AchievementKind::FirstWin));
        assert_eq!(
            catalog.entry(AchievementKind::FirstWin).unwrap().uri,
            "ipfs://new"
        );

        // Oversized URI rejected
        let too_long = "u".repeat(MAX_ACHIEVEMENT_URI_LEN + 1);
        assert_eq!(
            catalog.set_entry(AchievementKind::FirstWin, too_long, true),
            Err(PredictionPoolError::InvalidInput)
        );
    }

    #[test]
    fn test_achievement_kind_roundtrip() {
        for kind in AchievementKind::ALL {
            assert_eq!(AchievementKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(AchievementKind::from_index(5), None);
    }
}
