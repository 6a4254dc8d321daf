//! Utility functions for the Stakepool Market Program

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::error::PredictionPoolError;
use crate::state::{
    Market, MarketStatus, StakePosition,
    BPS_DENOMINATOR, MAX_CATEGORY_LEN, MAX_DESCRIPTION_LEN, MAX_OUTCOMES, MAX_OUTCOME_LABEL_LEN,
    MAX_STAKE, MAX_TITLE_LEN, MIN_OUTCOMES, MIN_STAKE,
};

/// Safely deserialize account data using BorshDeserialize::deserialize
/// This does NOT require the slice to be fully consumed, which is important
/// when the account has padding bytes at the end.
pub fn deserialize_account<T: BorshDeserialize>(data: &[u8]) -> Result<T, ProgramError> {
    T::deserialize(&mut &data[..])
        .map_err(|_| ProgramError::InvalidAccountData)
}

/// Check if a signer is authorized
pub fn check_signer(account: &AccountInfo) -> ProgramResult {
    if !account.is_signer {
        return Err(PredictionPoolError::InvalidSigner.into());
    }
    Ok(())
}

/// Verify PDA derivation
pub fn verify_pda(
    expected: &Pubkey,
    program_id: &Pubkey,
    seeds: &[&[u8]],
) -> Result<u8, ProgramError> {
    let (pda, bump) = Pubkey::find_program_address(seeds, program_id);
    if pda != *expected {
        msg!("PDA mismatch: expected {}, got {}", expected, pda);
        return Err(PredictionPoolError::InvalidPDA.into());
    }
    Ok(bump)
}

/// Get the current chain height (slot) from the Clock sysvar
pub fn current_height() -> Result<u64, ProgramError> {
    let clock = Clock::get()?;
    Ok(clock.slot)
}

/// Create a PDA account owned by this program
pub fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    pda: &AccountInfo<'a>,
    space: usize,
    owner: &Pubkey,
    system_program: &AccountInfo<'a>,
    seeds: &[&[u8]],
) -> ProgramResult {
    let rent = Rent::get()?;
    let lamports = rent.minimum_balance(space);

    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            pda.key,
            lamports,
            space as u64,
            owner,
        ),
        &[payer.clone(), pda.clone(), system_program.clone()],
        &[seeds],
    )?;

    Ok(())
}

/// Move lamports out of a program-owned account
pub fn transfer_lamports<'a>(
    from: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    let new_from = from
        .lamports()
        .checked_sub(amount)
        .ok_or(PredictionPoolError::TransferFailed)?;
    let new_to = to
        .lamports()
        .checked_add(amount)
        .ok_or(PredictionPoolError::TransferFailed)?;
    **from.try_borrow_mut_lamports()? = new_from;
    **to.try_borrow_mut_lamports()? = new_to;
    Ok(())
}

/// Safe addition for u64
pub fn safe_add_u64(a: u64, b: u64) -> Result<u64, ProgramError> {
    a.checked_add(b)
        .ok_or_else(|| PredictionPoolError::ArithmeticOverflow.into())
}

/// Safe subtraction for u64
pub fn safe_sub_u64(a: u64, b: u64) -> Result<u64, ProgramError> {
    a.checked_sub(b)
        .ok_or_else(|| PredictionPoolError::ArithmeticOverflow.into())
}

/// Calculate fee amount from total and basis points
///
/// Truncating integer division; identical inputs always yield identical
/// output.
pub fn calculate_fee(amount: u64, fee_bps: u16) -> u64 {
    ((amount as u128) * (fee_bps as u128) / (BPS_DENOMINATOR as u128)) as u64
}

/// Calculate amount after fee deduction
pub fn amount_after_fee(amount: u64, fee_bps: u16) -> u64 {
    amount.saturating_sub(calculate_fee(amount, fee_bps))
}

/// Proportional payout share, truncating toward zero
pub fn calculate_payout(
    distributable: u64,
    stake_amount: u64,
    winning_pool_total: u64,
) -> Result<u64, ProgramError> {
    if winning_pool_total == 0 {
        return Err(PredictionPoolError::NoWinnings.into());
    }
    Ok(((distributable as u128) * (stake_amount as u128) / (winning_pool_total as u128)) as u64)
}

/// Amount a stake record is entitled to claim from its market
///
/// Resolved markets pay a proportional share of the pool net of the fee
/// snapshotted at resolution; cancelled markets refund the full stake.
/// The caller checks the claimed flag separately.
pub fn settlement_amount(
    market: &Market,
    stake: &StakePosition,
    winning_pool_total: u64,
) -> Result<u64, ProgramError> {
    match market.status {
        MarketStatus::Resolved => {
            let winning_outcome = market
                .winning_outcome
                .ok_or(PredictionPoolError::MarketNotResolved)?;
            if stake.amount == 0 || stake.outcome_index != winning_outcome {
                return Err(PredictionPoolError::NoWinnings.into());
            }
            // Fee must come from the snapshot taken at resolution
            let fee_bps = market
                .resolved_fee_bps
                .ok_or(PredictionPoolError::InvalidAccountData)?;
            let distributable = amount_after_fee(market.total_pool, fee_bps);
            calculate_payout(distributable, stake.amount, winning_pool_total)
        }
        MarketStatus::Cancelled => {
            if stake.amount == 0 {
                return Err(PredictionPoolError::NoWinnings.into());
            }
            Ok(stake.amount)
        }
        _ => Err(PredictionPoolError::MarketNotResolved.into()),
    }
}

/// Validate a stake amount against the engine bounds
pub fn validate_stake_amount(amount: u64) -> ProgramResult {
    if amount < MIN_STAKE {
        return Err(PredictionPoolError::StakeTooLow.into());
    }
    if amount > MAX_STAKE {
        return Err(PredictionPoolError::StakeTooHigh.into());
    }
    Ok(())
}

/// Validate market creation parameters
pub fn validate_market_params(
    title: &str,
    description: &str,
    category: &str,
    outcomes: &[String],
    lock_height: u64,
    resolution_height: u64,
    current_height: u64,
) -> ProgramResult {
    if outcomes.len() < MIN_OUTCOMES || outcomes.len() > MAX_OUTCOMES {
        msg!("Invalid outcome count: {}", outcomes.len());
        return Err(PredictionPoolError::InvalidOutcomeCount.into());
    }

    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(PredictionPoolError::InvalidInput.into());
    }
    if description.is_empty() || description.len() > MAX_DESCRIPTION_LEN {
        return Err(PredictionPoolError::InvalidInput.into());
    }
    if category.is_empty() || category.len() > MAX_CATEGORY_LEN {
        return Err(PredictionPoolError::InvalidInput.into());
    }
    for label in outcomes {
        if label.is_empty() || label.len() > MAX_OUTCOME_LABEL_LEN {
            return Err(PredictionPoolError::InvalidInput.into());
        }
    }

    if lock_height <= current_height
        || resolution_height <= current_height
        || lock_height >= resolution_height
    {
        msg!(
            "Invalid heights: lock={}, resolution={}, current={}",
            lock_height,
            resolution_height,
            current_height
        );
        return Err(PredictionPoolError::InvalidDate.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MARKET_DISCRIMINATOR, STAKE_DISCRIMINATOR, DEFAULT_FEE_BPS};
    use solana_program::pubkey::Pubkey;

    fn resolved_market(total_pool: u64, winning_outcome: u8, fee_bps: u16) -> Market {
        Market {
            discriminator: MARKET_DISCRIMINATOR,
            market_id: 1,
            creator: Pubkey::new_unique(),
            title: "Test".to_string(),
            description: "Test".to_string(),
            category: "test".to_string(),
            outcomes: vec!["A".to_string(), "B".to_string()],
            num_outcomes: 2,
            status: MarketStatus::Resolved,
            lock_height: 200,
            resolution_height: 300,
            created_at_height: 100,
            total_pool,
            winning_outcome: Some(winning_outcome),
            resolved_fee_bps: Some(fee_bps),
            bump: 255,
            reserved: [0u8; 32],
        }
    }

    fn stake_on(outcome_index: u8, amount: u64) -> StakePosition {
        StakePosition {
            discriminator: STAKE_DISCRIMINATOR,
            market_id: 1,
            outcome_index,
            staker: Pubkey::new_unique(),
            amount,
            updated_at_height: 150,
            claimed: false,
            bump: 255,
            reserved: [0u8; 16],
        }
    }

    #[test]
    fn test_calculate_fee() {
        // 15 units at 3% = 0.45 units
        assert_eq!(calculate_fee(15_000_000, 300), 450_000);
        // 100 units at 10% = 10 units
        assert_eq!(calculate_fee(100_000_000, 1000), 10_000_000);
        // Zero fee rate
        assert_eq!(calculate_fee(100_000_000, 0), 0);
        // Truncation: 33 * 300 / 10000 = 0.99 -> 0
        assert_eq!(calculate_fee(33, 300), 0);
    }

    #[test]
    fn test_amount_after_fee() {
        assert_eq!(amount_after_fee(15_000_000, 300), 14_550_000);
        assert_eq!(amount_after_fee(100, 0), 100);
    }

    #[test]
    fn test_calculate_payout_truncates() {
        // 10 / 3 shares of 100: each gets 33, dust of 1 stays behind
        assert_eq!(calculate_payout(100, 1, 3).unwrap(), 33);
        // Sole winner takes the whole distributable pool
        assert_eq!(calculate_payout(100, 7, 7).unwrap(), 100);
        // Empty winning pool cannot pay
        assert_eq!(
            calculate_payout(100, 1, 0),
            Err(PredictionPoolError::NoWinnings.into())
        );
    }

    #[test]
    fn test_stake_bounds() {
        assert!(validate_stake_amount(MIN_STAKE).is_ok());
        assert_eq!(
            validate_stake_amount(MIN_STAKE - 1),
            Err(PredictionPoolError::StakeTooLow.into())
        );
        assert!(validate_stake_amount(MAX_STAKE).is_ok());
        assert_eq!(
            validate_stake_amount(MAX_STAKE + 1),
            Err(PredictionPoolError::StakeTooHigh.into())
        );
    }

    #[test]
    fn test_validate_market_params() {
        let outcomes = vec!["A".to_string(), "B".to_string()];
        assert!(validate_market_params("t", "d", "c", &outcomes, 110, 120, 100).is_ok());

        // One outcome is too few
        assert_eq!(
            validate_market_params("t", "d", "c", &["A".to_string()], 110, 120, 100),
            Err(PredictionPoolError::InvalidOutcomeCount.into())
        );
        // Eleven outcomes is too many
        let many: Vec<String> = (0..11).map(|i| format!("o{}", i)).collect();
        assert_eq!(
            validate_market_params("t", "d", "c", &many, 110, 120, 100),
            Err(PredictionPoolError::InvalidOutcomeCount.into())
        );

        // Empty text fields
        assert_eq!(
            validate_market_params("", "d", "c", &outcomes, 110, 120, 100),
            Err(PredictionPoolError::InvalidInput.into())
        );
        assert_eq!(
            validate_market_params("t", "", "c", &outcomes, 110, 120, 100),
            Err(PredictionPoolError::InvalidInput.into())
        );
        assert_eq!(
            validate_market_params("t", "d", "c", &["A".to_string(), "".to_string()], 110, 120, 100),
            Err(PredictionPoolError::InvalidInput.into())
        );

        // Lock height after resolution height
        assert_eq!(
            validate_market_params("t", "d", "c", &outcomes, 120, 110, 100),
            Err(PredictionPoolError::InvalidDate.into())
        );
        // Heights must be in the future
        assert_eq!(
            validate_market_params("t", "d", "c", &outcomes, 100, 120, 100),
            Err(PredictionPoolError::InvalidDate.into())
        );
        assert_eq!(
            validate_market_params("t", "d", "c", &outcomes, 90, 95, 100),
            Err(PredictionPoolError::InvalidDate.into())
        );
    }

    #[test]
    fn test_settlement_sole_winner() {
        // Scenario: 10 units on "A" (winner), 5 units on "B". Fee 3%.
        let market = resolved_market(15_000_000, 0, DEFAULT_FEE_BPS);
        let stake = stake_on(0, 10_000_000);

        let fee = calculate_fee(market.total_pool, DEFAULT_FEE_BPS);
        assert_eq!(fee, 450_000);
        let distributable = market.total_pool - fee;

        // Sole staker on the winning outcome receives the full distributable pool
        let payout = settlement_amount(&market, &stake, 10_000_000).unwrap();
        assert_eq!(payout, distributable);
        assert_eq!(payout, 14_550_000);
    }

    #[test]
    fn test_settlement_losing_outcome() {
        let market = resolved_market(15_000_000, 0, DEFAULT_FEE_BPS);
        let loser = stake_on(1, 5_000_000);
        assert_eq!(
            settlement_amount(&market, &loser, 10_000_000),
            Err(PredictionPoolError::NoWinnings.into())
        );
    }

    #[test]
    fn test_settlement_zero_stake() {
        let market = resolved_market(15_000_000, 0, DEFAULT_FEE_BPS);
        let empty = stake_on(0, 0);
        assert_eq!(
            settlement_amount(&market, &empty, 10_000_000),
            Err(PredictionPoolError::NoWinnings.into())
        );
    }

    #[test]
    fn test_settlement_unresolved_market() {
        let mut market = resolved_market(15_000_000, 0, DEFAULT_FEE_BPS);
        market.status = MarketStatus::Active;
        market.winning_outcome = None;
        market.resolved_fee_bps = None;
        let stake = stake_on(0, 10_000_000);
        assert_eq!(
            settlement_amount(&market, &stake, 10_000_000),
            Err(PredictionPoolError::MarketNotResolved.into())
        );
    }

    #[test]
    fn test_settlement_cancelled_refunds_full_stake() {
        let mut market = resolved_market(15_000_000, 0, 1000);
        market.status = MarketStatus::Cancelled;
        market.winning_outcome = None;
        market.resolved_fee_bps = None;

        // Every outcome's stakers get their stake back, no fee
        let winner_side = stake_on(0, 10_000_000);
        let loser_side = stake_on(1, 5_000_000);
        assert_eq!(settlement_amount(&market, &winner_side, 0).unwrap(), 10_000_000);
        assert_eq!(settlement_amount(&market, &loser_side, 0).unwrap(), 5_000_000);
    }

    #[test]
    fn test_settlement_uses_fee_snapshot() {
        // The snapshot, not any live configuration, drives claim arithmetic
        let market = resolved_market(100_000_000, 0, 500);
        let stake = stake_on(0, 40_000_000);
        let payout = settlement_amount(&market, &stake, 40_000_000).unwrap();
        // distributable = 100 - 5% = 95 units, sole-pool share 40/40
        assert_eq!(payout, 95_000_000);
    }

    #[test]
    fn test_payout_conservation_with_dust() {
        // Three winners with uneven stakes; payouts plus fee never exceed
        // the pool, and the gap is bounded by staker_count - 1.
        let total_pool: u64 = 10_000_000;
        let stakes: [u64; 3] = [3_333_333, 3_333_333, 1_333_334];
        let winning_pool: u64 = stakes.iter().sum();
        let market = resolved_market(total_pool, 0, DEFAULT_FEE_BPS);

        let fee = calculate_fee(total_pool, DEFAULT_FEE_BPS);
        let mut paid: u64 = 0;
        for &amount in &stakes {
            let stake = stake_on(0, amount);
            paid += settlement_amount(&market, &stake, winning_pool).unwrap();
        }

        assert!(paid + fee <= total_pool);
        let dust = total_pool - fee - paid;
        assert!(dust < stakes.len() as u64);
    }

    #[test]
    fn test_two_account_lifecycle_scenario() {
        use crate::state::OutcomePool;

        // Two outcomes, lock at 110, resolution at 120
        let mut market = resolved_market(0, 0, DEFAULT_FEE_BPS);
        market.status = MarketStatus::Active;
        market.winning_outcome = None;
        market.resolved_fee_bps = None;
        market.lock_height = 110;
        market.resolution_height = 120;

        let mut pool_a = OutcomePool::new(1, 0, 255);
        let mut pool_b = OutcomePool::new(1, 1, 255);
        let mut stake_x = stake_on(0, 0);
        let mut stake_y = stake_on(1, 0);

        // X stakes 10 units on "A", Y stakes 5 units on "B"
        assert!(market.ensure_open_for_staking(105).is_ok());
        stake_x.amount += 10_000_000;
        pool_a.total_staked += 10_000_000;
        pool_a.staker_count += 1;
        market.total_pool += 10_000_000;

        stake_y.amount += 5_000_000;
        pool_b.total_staked += 5_000_000;
        pool_b.staker_count += 1;
        market.total_pool += 5_000_000;

        // Pool-sum invariant holds after every staking operation
        assert_eq!(market.total_pool, pool_a.total_staked + pool_b.total_staked);

        // Past the lock height staking is rejected
        assert_eq!(
            market.ensure_open_for_staking(110),
            Err(PredictionPoolError::MarketLocked)
        );

        // Lock, then resolve once the resolution height passes
        assert!(market.ensure_lockable(110).is_ok());
        market.status = MarketStatus::Locked;
        assert_eq!(
            market.ensure_resolvable(115, 0),
            Err(PredictionPoolError::InvalidDate)
        );
        assert!(market.ensure_resolvable(120, 0).is_ok());

        let fee = calculate_fee(market.total_pool, DEFAULT_FEE_BPS);
        assert_eq!(fee, 450_000);
        market.status = MarketStatus::Resolved;
        market.winning_outcome = Some(0);
        market.resolved_fee_bps = Some(DEFAULT_FEE_BPS);

        // X, sole staker on the winning outcome, takes the distributable pool
        assert!(stake_x.ensure_unclaimed().is_ok());
        let payout = settlement_amount(&market, &stake_x, pool_a.total_staked).unwrap();
        assert_eq!(payout, market.total_pool - fee);

        // A second claim by X fails and changes nothing
        stake_x.claimed = true;
        assert_eq!(
            stake_x.ensure_unclaimed(),
            Err(PredictionPoolError::AlreadyClaimed)
        );
        assert!(stake_x.claimed);

        // Y staked on the losing outcome
        assert_eq!(
            settlement_amount(&market, &stake_y, pool_a.total_staked),
            Err(PredictionPoolError::NoWinnings.into())
        );
    }

    #[test]
    fn test_safe_arithmetic() {
        assert_eq!(safe_add_u64(100, 50).unwrap(), 150);
        assert!(safe_add_u64(u64::MAX, 1).is_err());

        assert_eq!(safe_sub_u64(100, 50).unwrap(), 50);
        assert!(safe_sub_u64(50, 100).is_err());
    }
}
