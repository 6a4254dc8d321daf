//! Read-only query helpers
//!
//! Off-ledger callers deserialize program accounts and use these helpers to
//! inspect markets, stakes, pools, credentials and configuration. Nothing
//! here mutates state.

use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;

use crate::state::{
    AccountStats, AchievementRecord, EngineConfig, Market, OutcomePool, StakePosition,
    ACHIEVEMENT_DISCRIMINATOR, BPS_DENOMINATOR, CONFIG_DISCRIMINATOR, MARKET_DISCRIMINATOR,
    OUTCOME_POOL_DISCRIMINATOR, STAKE_DISCRIMINATOR, STATS_DISCRIMINATOR,
};
use crate::utils::{amount_after_fee, deserialize_account};

/// Process-wide configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub is_paused: bool,
    pub oracle: Pubkey,
    pub treasury: Pubkey,
    pub fee_bps: u16,
    pub next_market_id: u64,
}

/// Snapshot the engine configuration
pub fn config_snapshot(config: &EngineConfig) -> ConfigSnapshot {
    ConfigSnapshot {
        is_paused: config.is_paused,
        oracle: config.oracle,
        treasury: config.treasury,
        fee_bps: config.fee_bps,
        next_market_id: config.next_market_id,
    }
}

/// Current odds for one outcome, in basis points; zero on an empty pool
pub fn odds_bps(outcome_staked: u64, total_pool: u64) -> u64 {
    if total_pool == 0 {
        return 0;
    }
    ((outcome_staked as u128) * (BPS_DENOMINATOR as u128) / (total_pool as u128)) as u64
}

/// Estimate the payout for a hypothetical additional stake
///
/// Simulates adding `amount` on the given outcome on top of the caller's
/// existing stake there, then recomputes the distributable share with the
/// current fee rate. An estimate only: the pool keeps moving until lock.
pub fn potential_winnings(
    total_pool: u64,
    outcome_staked: u64,
    existing_stake: u64,
    amount: u64,
    fee_bps: u16,
) -> u64 {
    let new_total = total_pool.saturating_add(amount);
    let new_outcome_pool = outcome_staked.saturating_add(amount);
    if new_outcome_pool == 0 {
        return 0;
    }
    let distributable = amount_after_fee(new_total, fee_bps);
    let share = existing_stake.saturating_add(amount);
    ((distributable as u128) * (share as u128) / (new_outcome_pool as u128)) as u64
}

/// Market detail by account data
pub fn load_market(data: &[u8]) -> Result<Market, ProgramError> {
    let market: Market = deserialize_account(data)?;
    if market.discriminator != MARKET_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(market)
}

/// Stake detail by account data
pub fn load_stake(data: &[u8]) -> Result<StakePosition, ProgramError> {
    let stake: StakePosition = deserialize_account(data)?;
    if stake.discriminator != STAKE_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(stake)
}

/// Outcome-pool aggregate by account data
pub fn load_outcome_pool(data: &[u8]) -> Result<OutcomePool, ProgramError> {
    let pool: OutcomePool = deserialize_account(data)?;
    if pool.discriminator != OUTCOME_POOL_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(pool)
}

/// Credential ownership by account data
pub fn load_achievement(data: &[u8]) -> Result<AchievementRecord, ProgramError> {
    let record: AchievementRecord = deserialize_account(data)?;
    if record.discriminator != ACHIEVEMENT_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(record)
}

/// Per-account statistics by account data
pub fn load_stats(data: &[u8]) -> Result<AccountStats, ProgramError> {
    let stats: AccountStats = deserialize_account(data)?;
    if stats.discriminator != STATS_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(stats)
}

/// Engine configuration by account data
pub fn load_config(data: &[u8]) -> Result<EngineConfig, ProgramError> {
    let config: EngineConfig = deserialize_account(data)?;
    if config.discriminator != CONFIG_DISCRIMINATOR {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_FEE_BPS;
    use borsh::BorshSerialize;

    #[test]
    fn test_odds_bps() {
        // Empty pool
        assert_eq!(odds_bps(0, 0), 0);
        // 10 of 15 staked on this outcome = 66.66%
        assert_eq!(odds_bps(10_000_000, 15_000_000), 6666);
        // 5 of 15 = 33.33%
        assert_eq!(odds_bps(5_000_000, 15_000_000), 3333);
        // Whole pool on one outcome
        assert_eq!(odds_bps(15_000_000, 15_000_000), 10_000);
    }

    #[test]
    fn test_potential_winnings_first_staker() {
        // Empty market: a 10-unit stake would own the whole pool
        let est = potential_winnings(0, 0, 0, 10_000_000, DEFAULT_FEE_BPS);
        assert_eq!(est, amount_after_fee(10_000_000, DEFAULT_FEE_BPS));
    }

    #[test]
    fn test_potential_winnings_joining_pool() {
        // 15 units pooled, 10 on this outcome; adding 5 more
        let est = potential_winnings(15_000_000, 10_000_000, 0, 5_000_000, DEFAULT_FEE_BPS);
        let distributable = amount_after_fee(20_000_000, DEFAULT_FEE_BPS);
        let expected = (distributable as u128 * 5_000_000 / 15_000_000) as u64;
        assert_eq!(est, expected);
    }

    #[test]
    fn test_potential_winnings_zero_amount() {
        assert_eq!(potential_winnings(0, 0, 0, 0, DEFAULT_FEE_BPS), 0);
    }

    #[test]
    fn test_config_snapshot() {
        let config = EngineConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            DEFAULT_FEE_BPS,
            254,
        );
        let snapshot = config_snapshot(&config);
        assert_eq!(snapshot.oracle, config.oracle);
        assert_eq!(snapshot.treasury, config.treasury);
        assert_eq!(snapshot.fee_bps, DEFAULT_FEE_BPS);
        assert_eq!(snapshot.next_market_id, 1);
        assert!(!snapshot.is_paused);
    }

    #[test]
    fn test_load_config_roundtrip() {
        let config = EngineConfig::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            DEFAULT_FEE_BPS,
            254,
        );
        let mut data = vec![0u8; EngineConfig::SIZE];
        config.serialize(&mut &mut data[..]).unwrap();
        let loaded = load_config(&data).unwrap();
        assert_eq!(loaded.admin, config.admin);
        assert_eq!(loaded.fee_bps, config.fee_bps);
    }

    #[test]
    fn test_load_rejects_wrong_discriminator() {
        let stats = AccountStats::new(Pubkey::new_unique(), 255);
        let mut data = vec![0u8; AccountStats::SIZE];
        stats.serialize(&mut &mut data[..]).unwrap();
        // Stats bytes are not a config account
        assert!(load_config(&data).is_err());
    }
}
