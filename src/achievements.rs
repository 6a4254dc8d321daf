//! Achievement tracking for the Stakepool Market Program
//!
//! Observes staking and claim events, maintains per-account counters and
//! mints soulbound credentials at defined milestones. The automatic path
//! (driven from inside stake/claim processing) swallows mint failures into
//! logged no-ops so the triggering operation never aborts; the explicit
//! administrator path surfaces them as hard errors.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::error::PredictionPoolError;
use crate::state::{
    AccountStats, AchievementCatalog, AchievementKind, AchievementRecord,
    ACHIEVEMENT_SEED, HIGH_EARNER_THRESHOLD,
};
use crate::utils::create_pda_account;

/// Win totals that trigger a milestone credential
pub fn win_milestone(total_wins: u64) -> Option<AchievementKind> {
    match total_wins {
        1 => Some(AchievementKind::FirstWin),
        5 => Some(AchievementKind::FiveWins),
        10 => Some(AchievementKind::TenWins),
        _ => None,
    }
}

/// Whether cumulative winnings qualify for the HighEarner credential
///
/// Re-evaluated on every earning event; the registry check keeps the mint
/// idempotent.
pub fn high_earner_due(total_value_earned: u64) -> bool {
    total_value_earned >= HIGH_EARNER_THRESHOLD
}

/// Credentials due after a winning claim updated the counters
pub fn due_after_win(new_total_wins: u64, new_total_earned: u64) -> Vec<AchievementKind> {
    let mut due = Vec::new();
    if let Some(kind) = win_milestone(new_total_wins) {
        due.push(kind);
    }
    if high_earner_due(new_total_earned) {
        due.push(AchievementKind::HighEarner);
    }
    due
}

/// Record a "prediction made" event and attempt the FirstPrediction mint
/// when the new total is exactly one.
pub fn track_prediction<'a>(
    program_id: &Pubkey,
    owner: &Pubkey,
    stats: &mut AccountStats,
    catalog: &AchievementCatalog,
    candidate_infos: &[AccountInfo<'a>],
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    height: u64,
) {
    let total = stats.record_prediction();
    if total == 1 {
        attempt_mint(
            program_id,
            owner,
            AchievementKind::FirstPrediction,
            stats,
            catalog,
            candidate_infos,
            payer,
            system_program,
            height,
        );
    }
}

/// Record "win" and "value earned" events and attempt any milestone mints
/// that the updated counters trigger.
pub fn track_win<'a>(
    program_id: &Pubkey,
    owner: &Pubkey,
    payout: u64,
    stats: &mut AccountStats,
    catalog: &AchievementCatalog,
    candidate_infos: &[AccountInfo<'a>],
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    height: u64,
) {
    let wins = stats.record_win();
    let earned = stats.record_earnings(payout);
    for kind in due_after_win(wins, earned) {
        attempt_mint(
            program_id,
            owner,
            kind,
            stats,
            catalog,
            candidate_infos,
            payer,
            system_program,
            height,
        );
    }
}

/// Automatic-path mint: any failure degrades to a logged skip
fn attempt_mint<'a>(
    program_id: &Pubkey,
    owner: &Pubkey,
    kind: AchievementKind,
    stats: &mut AccountStats,
    catalog: &AchievementCatalog,
    candidate_infos: &[AccountInfo<'a>],
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    height: u64,
) {
    if !catalog.is_enabled(kind) {
        msg!("Achievement {} disabled, skipping mint", kind.index());
        return;
    }

    let (record_pda, bump) = Pubkey::find_program_address(
        &[ACHIEVEMENT_SEED, owner.as_ref(), &[kind.index()]],
        program_id,
    );
    let record_info = match candidate_infos.iter().find(|a| *a.key == record_pda) {
        Some(info) => info,
        None => {
            msg!("Achievement {} account not supplied, skipping mint", kind.index());
            return;
        }
    };

    if !record_info.data_is_empty() {
        // Already granted
        msg!("Achievement {} already granted to {}", kind.index(), owner);
        return;
    }

    match write_record(
        program_id,
        owner,
        kind,
        bump,
        record_info,
        payer,
        system_program,
        height,
    ) {
        Ok(()) => {
            stats.achievement_count = stats.achievement_count.saturating_add(1);
        }
        Err(e) => {
            msg!("Achievement {} mint skipped: {:?}", kind.index(), e);
        }
    }
}

/// Explicit administrator-path mint: failures are hard errors
pub fn mint_explicit<'a>(
    program_id: &Pubkey,
    owner: &Pubkey,
    kind: AchievementKind,
    stats: &mut AccountStats,
    catalog: &AchievementCatalog,
    record_info: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    height: u64,
) -> ProgramResult {
    let entry = catalog
        .entry(kind)
        .ok_or(PredictionPoolError::InvalidAchievement)?;
    if !entry.enabled {
        return Err(PredictionPoolError::InvalidAchievement.into());
    }

    let (record_pda, bump) = Pubkey::find_program_address(
        &[ACHIEVEMENT_SEED, owner.as_ref(), &[kind.index()]],
        program_id,
    );
    if *record_info.key != record_pda {
        return Err(PredictionPoolError::InvalidPDA.into());
    }

    if !record_info.data_is_empty() {
        return Err(PredictionPoolError::AlreadyExists.into());
    }

    write_record(
        program_id,
        owner,
        kind,
        bump,
        record_info,
        payer,
        system_program,
        height,
    )?;
    stats.achievement_count = stats.achievement_count.saturating_add(1);

    Ok(())
}

/// Create the credential PDA and write the record
fn write_record<'a>(
    program_id: &Pubkey,
    owner: &Pubkey,
    kind: AchievementKind,
    bump: u8,
    record_info: &AccountInfo<'a>,
    payer: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    height: u64,
) -> Result<(), ProgramError> {
    let owner_bytes = owner.to_bytes();
    let kind_byte = [kind.index()];
    let bump_byte = [bump];
    let seeds: &[&[u8]] = &[ACHIEVEMENT_SEED, &owner_bytes, &kind_byte, &bump_byte];

    create_pda_account(
        payer,
        record_info,
        AchievementRecord::SIZE,
        program_id,
        system_program,
        seeds,
    )?;

    let record = AchievementRecord::new(*owner, kind, height, bump);
    record.serialize(&mut *record_info.data.borrow_mut())?;

    msg!("Achievement minted: kind={}, owner={}", kind.index(), owner);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::pubkey::Pubkey;

    #[test]
    fn test_win_milestones() {
        assert_eq!(win_milestone(0), None);
        assert_eq!(win_milestone(1), Some(AchievementKind::FirstWin));
        assert_eq!(win_milestone(2), None);
        assert_eq!(win_milestone(5), Some(AchievementKind::FiveWins));
        assert_eq!(win_milestone(6), None);
        assert_eq!(win_milestone(10), Some(AchievementKind::TenWins));
        assert_eq!(win_milestone(11), None);
    }

    #[test]
    fn test_fifth_win_triggers_exactly_one_milestone() {
        let mut stats = AccountStats::new(Pubkey::new_unique(), 255);
        let mut minted = Vec::new();
        for _ in 0..5 {
            let wins = stats.record_win();
            let earned = stats.record_earnings(1_000_000);
            minted.extend(due_after_win(wins, earned));
        }
        let five_wins = minted
            .iter()
            .filter(|&&k| k == AchievementKind::FiveWins)
            .count();
        assert_eq!(five_wins, 1);
        // A duplicate event past the milestone does not re-trigger it
        let wins = stats.record_win();
        assert_eq!(win_milestone(wins), None);
    }

    #[test]
    fn test_high_earner_threshold() {
        assert!(!high_earner_due(HIGH_EARNER_THRESHOLD - 1));
        assert!(high_earner_due(HIGH_EARNER_THRESHOLD));
        assert!(high_earner_due(HIGH_EARNER_THRESHOLD + 1));
    }

    #[test]
    fn test_due_after_win_combines_milestones() {
        // A first win that also crosses the earnings threshold owes both
        let due = due_after_win(1, HIGH_EARNER_THRESHOLD);
        assert_eq!(
            due,
            vec![AchievementKind::FirstWin, AchievementKind::HighEarner]
        );

        // Past the threshold the earner credential stays due on every event;
        // the registry check makes the repeat attempts no-ops
        let due = due_after_win(2, HIGH_EARNER_THRESHOLD + 1);
        assert_eq!(due, vec![AchievementKind::HighEarner]);

        let due = due_after_win(3, 0);
        assert!(due.is_empty());
    }
}
