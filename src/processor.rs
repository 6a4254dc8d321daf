//! Instruction processor for the Stakepool Market Program

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
};

use crate::achievements;
use crate::error::PredictionPoolError;
use crate::instruction::*;
use crate::state::{
    AccountStats, AchievementCatalog, AchievementKind, EngineConfig, Market, MarketStatus,
    OutcomePool, StakePosition,
    CATALOG_DISCRIMINATOR, CATALOG_SEED, CONFIG_DISCRIMINATOR, CONFIG_SEED,
    MARKET_DISCRIMINATOR, MARKET_SEED, MARKET_VAULT_SEED, OUTCOME_POOL_DISCRIMINATOR,
    OUTCOME_POOL_SEED, STAKE_DISCRIMINATOR, STAKE_SEED, STATS_DISCRIMINATOR, STATS_SEED,
    MAX_FEE_BPS,
};
use crate::utils::{
    calculate_fee, check_signer, create_pda_account, current_height, deserialize_account,
    safe_add_u64, settlement_amount, transfer_lamports, validate_market_params,
    validate_stake_amount, verify_pda,
};

/// Process an instruction
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = PredictionPoolInstruction::try_from_slice(instruction_data)
        .map_err(|_| ProgramError::from(PredictionPoolError::InvalidInstruction))?;

    match instruction {
        PredictionPoolInstruction::Initialize(args) => {
            msg!("Instruction: Initialize");
            process_initialize(program_id, accounts, args)
        }
        PredictionPoolInstruction::SetPaused(args) => {
            msg!("Instruction: SetPaused");
            process_set_paused(program_id, accounts, args)
        }
        PredictionPoolInstruction::UpdateOracle(args) => {
            msg!("Instruction: UpdateOracle");
            process_update_oracle(program_id, accounts, args)
        }
        PredictionPoolInstruction::UpdateTreasury(args) => {
            msg!("Instruction: UpdateTreasury");
            process_update_treasury(program_id, accounts, args)
        }
        PredictionPoolInstruction::UpdateAdmin(args) => {
            msg!("Instruction: UpdateAdmin");
            process_update_admin(program_id, accounts, args)
        }
        PredictionPoolInstruction::SetFeeRate(args) => {
            msg!("Instruction: SetFeeRate");
            process_set_fee_rate(program_id, accounts, args)
        }
        PredictionPoolInstruction::CreateMarket(args) => {
            msg!("Instruction: CreateMarket");
            process_create_market(program_id, accounts, args)
        }
        PredictionPoolInstruction::LockMarket(args) => {
            msg!("Instruction: LockMarket");
            process_lock_market(program_id, accounts, args)
        }
        PredictionPoolInstruction::ResolveMarket(args) => {
            msg!("Instruction: ResolveMarket");
            process_resolve_market(program_id, accounts, args)
        }
        PredictionPoolInstruction::CancelMarket(args) => {
            msg!("Instruction: CancelMarket");
            process_cancel_market(program_id, accounts, args)
        }
        PredictionPoolInstruction::PlaceStake(args) => {
            msg!("Instruction: PlaceStake");
            process_place_stake(program_id, accounts, args)
        }
        PredictionPoolInstruction::ClaimWinnings(args) => {
            msg!("Instruction: ClaimWinnings");
            process_claim_winnings(program_id, accounts, args)
        }
        PredictionPoolInstruction::MintAchievement(args) => {
            msg!("Instruction: MintAchievement");
            process_mint_achievement(program_id, accounts, args)
        }
        PredictionPoolInstruction::ConfigureAchievement(args) => {
            msg!("Instruction: ConfigureAchievement");
            process_configure_achievement(program_id, accounts, args)
        }
    }
}

// ============================================================================
// Shared loading helpers
// ============================================================================

fn load_config(config_info: &AccountInfo) -> Result<EngineConfig, ProgramError> {
    if config_info.data_is_empty() {
        msg!("Error: EngineConfig not initialized");
        return Err(PredictionPoolError::AccountNotInitialized.into());
    }
    let config = deserialize_account::<EngineConfig>(&config_info.data.borrow())?;
    if config.discriminator != CONFIG_DISCRIMINATOR {
        msg!("Error: Invalid EngineConfig discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }
    Ok(config)
}

fn load_market(market_info: &AccountInfo) -> Result<Market, ProgramError> {
    if market_info.data_is_empty() {
        msg!("Error: Market not found");
        return Err(PredictionPoolError::MarketNotFound.into());
    }
    let market = deserialize_account::<Market>(&market_info.data.borrow())?;
    if market.discriminator != MARKET_DISCRIMINATOR {
        msg!("Error: Invalid Market discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }
    Ok(market)
}

fn load_catalog(catalog_info: &AccountInfo) -> Result<AchievementCatalog, ProgramError> {
    if catalog_info.data_is_empty() {
        msg!("Error: AchievementCatalog not initialized");
        return Err(PredictionPoolError::AccountNotInitialized.into());
    }
    let catalog = deserialize_account::<AchievementCatalog>(&catalog_info.data.borrow())?;
    if catalog.discriminator != CATALOG_DISCRIMINATOR {
        msg!("Error: Invalid AchievementCatalog discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }
    Ok(catalog)
}

/// Load the caller's stats record, creating an empty one if missing
fn load_or_create_stats<'a>(
    program_id: &Pubkey,
    stats_info: &AccountInfo<'a>,
    owner: &Pubkey,
    payer: &AccountInfo<'a>,
    system_program_info: &AccountInfo<'a>,
) -> Result<AccountStats, ProgramError> {
    let owner_bytes = owner.to_bytes();
    let stats_bump = verify_pda(stats_info.key, program_id, &[STATS_SEED, &owner_bytes])?;

    if stats_info.data_is_empty() {
        let bump_byte = [stats_bump];
        let stats_seeds: &[&[u8]] = &[STATS_SEED, &owner_bytes, &bump_byte];
        create_pda_account(
            payer,
            stats_info,
            AccountStats::SIZE,
            program_id,
            system_program_info,
            stats_seeds,
        )?;
        return Ok(AccountStats::new(*owner, stats_bump));
    }

    let stats = deserialize_account::<AccountStats>(&stats_info.data.borrow())?;
    if stats.discriminator != STATS_DISCRIMINATOR {
        msg!("Error: Invalid AccountStats discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }
    Ok(stats)
}

// ============================================================================
// Initialization
// ============================================================================

fn process_initialize(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: InitializeArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer, payer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig PDA (writable)
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: AchievementCatalog PDA (writable)
    let catalog_info = next_account_info(account_info_iter)?;

    // Account 3: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    if *system_program_info.key != solana_program::system_program::ID {
        msg!("Error: Invalid System Program");
        return Err(ProgramError::IncorrectProgramId);
    }

    if args.fee_bps > MAX_FEE_BPS {
        msg!("Error: Fee rate {} exceeds maximum {}", args.fee_bps, MAX_FEE_BPS);
        return Err(PredictionPoolError::InvalidFee.into());
    }

    let config_bump = verify_pda(config_info.key, program_id, &[CONFIG_SEED])?;
    if !config_info.data_is_empty() {
        msg!("Error: EngineConfig already initialized");
        return Err(PredictionPoolError::AlreadyInitialized.into());
    }

    let catalog_bump = verify_pda(catalog_info.key, program_id, &[CATALOG_SEED])?;
    if !catalog_info.data_is_empty() {
        msg!("Error: AchievementCatalog already initialized");
        return Err(PredictionPoolError::AlreadyInitialized.into());
    }

    let config_bump_byte = [config_bump];
    let config_seeds: &[&[u8]] = &[CONFIG_SEED, &config_bump_byte];
    create_pda_account(
        admin_info,
        config_info,
        EngineConfig::SIZE,
        program_id,
        system_program_info,
        config_seeds,
    )?;

    let config = EngineConfig::new(
        *admin_info.key,
        args.oracle,
        args.treasury,
        args.fee_bps,
        config_bump,
    );
    config.serialize(&mut *config_info.data.borrow_mut())?;

    let catalog_bump_byte = [catalog_bump];
    let catalog_seeds: &[&[u8]] = &[CATALOG_SEED, &catalog_bump_byte];
    create_pda_account(
        admin_info,
        catalog_info,
        AchievementCatalog::SIZE,
        program_id,
        system_program_info,
        catalog_seeds,
    )?;

    let catalog = AchievementCatalog::new(catalog_bump);
    catalog.serialize(&mut *catalog_info.data.borrow_mut())?;

    msg!("EngineConfig initialized");
    msg!("Admin: {}", admin_info.key);
    msg!("Oracle: {}", args.oracle);
    msg!("Treasury: {}", args.treasury);
    msg!("Fee rate: {} bps", args.fee_bps);

    Ok(())
}

// ============================================================================
// Administration
// ============================================================================

fn process_set_paused(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: SetPausedArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    config.is_paused = args.paused;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Pause flag set: {}", args.paused);

    Ok(())
}

fn process_update_oracle(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: UpdateOracleArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    config.oracle = args.oracle;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Oracle updated: {}", args.oracle);

    Ok(())
}

fn process_update_treasury(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: UpdateTreasuryArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    config.treasury = args.treasury;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Treasury updated: {}", args.treasury);

    Ok(())
}

fn process_update_admin(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: UpdateAdminArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    config.admin = args.admin;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Admin updated: {}", args.admin);

    Ok(())
}

fn process_set_fee_rate(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: SetFeeRateArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    config.set_fee_bps(args.fee_bps)?;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Fee rate updated: {} bps", args.fee_bps);

    Ok(())
}

// ============================================================================
// Market Lifecycle
// ============================================================================

fn process_create_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: CreateMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer, payer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig (writable)
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market PDA (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Account 3: Market Vault PDA (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 4: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    let mut config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;
    config.ensure_not_paused()?;

    let height = current_height()?;
    validate_market_params(
        &args.title,
        &args.description,
        &args.category,
        &args.outcomes,
        args.lock_height,
        args.resolution_height,
        height,
    )?;

    // Allocate market_id
    let market_id = config.next_market_id;
    let market_id_bytes = market_id.to_le_bytes();

    let market_bump = verify_pda(
        market_info.key,
        program_id,
        &[MARKET_SEED, &market_id_bytes],
    )?;
    let vault_bump = verify_pda(
        vault_info.key,
        program_id,
        &[MARKET_VAULT_SEED, &market_id_bytes],
    )?;

    // Create Market account
    let market_bump_byte = [market_bump];
    let market_seeds: &[&[u8]] = &[MARKET_SEED, &market_id_bytes, &market_bump_byte];
    create_pda_account(
        admin_info,
        market_info,
        Market::SIZE,
        program_id,
        system_program_info,
        market_seeds,
    )?;

    // Create the native-asset custody vault (program-owned, zero data)
    let vault_bump_byte = [vault_bump];
    let vault_seeds: &[&[u8]] = &[MARKET_VAULT_SEED, &market_id_bytes, &vault_bump_byte];
    create_pda_account(
        admin_info,
        vault_info,
        0,
        program_id,
        system_program_info,
        vault_seeds,
    )?;

    let num_outcomes = args.outcomes.len() as u8;
    let market = Market {
        discriminator: MARKET_DISCRIMINATOR,
        market_id,
        creator: *admin_info.key,
        title: args.title,
        description: args.description,
        category: args.category,
        outcomes: args.outcomes,
        num_outcomes,
        status: MarketStatus::Active,
        lock_height: args.lock_height,
        resolution_height: args.resolution_height,
        created_at_height: height,
        total_pool: 0,
        winning_outcome: None,
        resolved_fee_bps: None,
        bump: market_bump,
        reserved: [0u8; 32],
    };
    market.serialize(&mut *market_info.data.borrow_mut())?;

    // Update config
    config.next_market_id += 1;
    config.total_markets += 1;
    config.serialize(&mut *config_info.data.borrow_mut())?;

    msg!("Market created");
    msg!("Market ID: {}", market_id);
    msg!("Title: {}", market.title);
    msg!("Outcomes: {}", num_outcomes);
    msg!("Lock height: {}", market.lock_height);
    msg!("Resolution height: {}", market.resolution_height);

    Ok(())
}

fn process_lock_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: LockMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Oracle or Admin (signer)
    let caller_info = next_account_info(account_info_iter)?;
    check_signer(caller_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    let config = load_config(config_info)?;
    config.ensure_oracle_or_admin(caller_info.key)?;

    let market_id_bytes = args.market_id.to_le_bytes();
    verify_pda(market_info.key, program_id, &[MARKET_SEED, &market_id_bytes])?;

    let mut market = load_market(market_info)?;
    let height = current_height()?;
    market.ensure_lockable(height)?;

    market.status = MarketStatus::Locked;
    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Market locked");
    msg!("Market ID: {}", args.market_id);
    msg!("Height: {}", height);

    Ok(())
}

fn process_resolve_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: ResolveMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Oracle (signer)
    let oracle_info = next_account_info(account_info_iter)?;
    check_signer(oracle_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Account 3: Market Vault (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 4: Treasury (writable)
    let treasury_info = next_account_info(account_info_iter)?;

    let config = load_config(config_info)?;
    // Administrator alone is insufficient here
    config.ensure_oracle(oracle_info.key)?;

    if *treasury_info.key != config.treasury {
        msg!("Error: Treasury account mismatch");
        return Err(PredictionPoolError::InvalidInput.into());
    }

    let market_id_bytes = args.market_id.to_le_bytes();
    verify_pda(market_info.key, program_id, &[MARKET_SEED, &market_id_bytes])?;
    verify_pda(
        vault_info.key,
        program_id,
        &[MARKET_VAULT_SEED, &market_id_bytes],
    )?;

    let mut market = load_market(market_info)?;
    let height = current_height()?;
    market.ensure_resolvable(height, args.winning_outcome)?;

    // Platform fee on the total pool, paid out to the treasury now;
    // the rate is snapshotted so claims compute against the same value
    let fee = calculate_fee(market.total_pool, config.fee_bps);
    if fee > 0 {
        transfer_lamports(vault_info, treasury_info, fee)?;
    }

    market.status = MarketStatus::Resolved;
    market.winning_outcome = Some(args.winning_outcome);
    market.resolved_fee_bps = Some(config.fee_bps);
    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Market resolved");
    msg!("Market ID: {}", args.market_id);
    msg!("Winning outcome: {}", args.winning_outcome);
    msg!("Total pool: {}", market.total_pool);
    msg!("Platform fee: {}", fee);

    Ok(())
}

fn process_cancel_market(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: CancelMarketArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    let config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    let market_id_bytes = args.market_id.to_le_bytes();
    verify_pda(market_info.key, program_id, &[MARKET_SEED, &market_id_bytes])?;

    let mut market = load_market(market_info)?;
    market.ensure_cancellable()?;

    market.status = MarketStatus::Cancelled;
    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Market cancelled, refunds available");
    msg!("Market ID: {}", args.market_id);

    Ok(())
}

// ============================================================================
// Staking
// ============================================================================

fn process_place_stake(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: PlaceStakeArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Staker (signer, payer)
    let staker_info = next_account_info(account_info_iter)?;
    check_signer(staker_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market (writable)
    let market_info = next_account_info(account_info_iter)?;

    // Account 3: Market Vault (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 4: OutcomePool PDA (writable)
    let pool_info = next_account_info(account_info_iter)?;

    // Account 5: StakePosition PDA (writable)
    let stake_info = next_account_info(account_info_iter)?;

    // Account 6: AccountStats PDA (writable)
    let stats_info = next_account_info(account_info_iter)?;

    // Account 7: AchievementCatalog
    let catalog_info = next_account_info(account_info_iter)?;

    // Account 8: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    // Remaining accounts: achievement record PDAs for any credential due
    let achievement_infos = account_info_iter.as_slice();

    let config = load_config(config_info)?;
    config.ensure_not_paused()?;

    let market_id_bytes = args.market_id.to_le_bytes();
    verify_pda(market_info.key, program_id, &[MARKET_SEED, &market_id_bytes])?;
    verify_pda(
        vault_info.key,
        program_id,
        &[MARKET_VAULT_SEED, &market_id_bytes],
    )?;

    let mut market = load_market(market_info)?;
    let height = current_height()?;
    market.ensure_open_for_staking(height)?;
    market.validate_outcome(args.outcome_index)?;
    validate_stake_amount(args.amount)?;

    // Move the stake into custody first; a failed transfer aborts the
    // whole operation before any bookkeeping is written
    invoke(
        &system_instruction::transfer(staker_info.key, vault_info.key, args.amount),
        &[
            staker_info.clone(),
            vault_info.clone(),
            system_program_info.clone(),
        ],
    )
    .map_err(|_| ProgramError::from(PredictionPoolError::TransferFailed))?;

    // Upsert the outcome pool (created lazily on first stake)
    let outcome_byte = [args.outcome_index];
    let pool_bump = verify_pda(
        pool_info.key,
        program_id,
        &[OUTCOME_POOL_SEED, &market_id_bytes, &outcome_byte],
    )?;
    let mut pool = if pool_info.data_is_empty() {
        let pool_bump_byte = [pool_bump];
        let pool_seeds: &[&[u8]] =
            &[OUTCOME_POOL_SEED, &market_id_bytes, &outcome_byte, &pool_bump_byte];
        create_pda_account(
            staker_info,
            pool_info,
            OutcomePool::SIZE,
            program_id,
            system_program_info,
            pool_seeds,
        )?;
        OutcomePool::new(args.market_id, args.outcome_index, pool_bump)
    } else {
        let pool = deserialize_account::<OutcomePool>(&pool_info.data.borrow())?;
        if pool.discriminator != OUTCOME_POOL_DISCRIMINATOR {
            msg!("Error: Invalid OutcomePool discriminator");
            return Err(PredictionPoolError::InvalidAccountData.into());
        }
        pool
    };

    // Upsert the stake record; repeated stakes on the same outcome
    // accumulate into a single record
    let staker_bytes = staker_info.key.to_bytes();
    let stake_bump = verify_pda(
        stake_info.key,
        program_id,
        &[STAKE_SEED, &market_id_bytes, &outcome_byte, &staker_bytes],
    )?;
    let first_stake_on_outcome = stake_info.data_is_empty();
    let mut stake = if first_stake_on_outcome {
        let stake_bump_byte = [stake_bump];
        let stake_seeds: &[&[u8]] = &[
            STAKE_SEED,
            &market_id_bytes,
            &outcome_byte,
            &staker_bytes,
            &stake_bump_byte,
        ];
        create_pda_account(
            staker_info,
            stake_info,
            StakePosition::SIZE,
            program_id,
            system_program_info,
            stake_seeds,
        )?;
        StakePosition::new(args.market_id, args.outcome_index, *staker_info.key, stake_bump)
    } else {
        let stake = deserialize_account::<StakePosition>(&stake_info.data.borrow())?;
        if stake.discriminator != STAKE_DISCRIMINATOR {
            msg!("Error: Invalid StakePosition discriminator");
            return Err(PredictionPoolError::InvalidAccountData.into());
        }
        stake
    };

    pool.total_staked = safe_add_u64(pool.total_staked, args.amount)?;
    if first_stake_on_outcome {
        pool.staker_count = safe_add_u64(pool.staker_count, 1)?;
    }
    stake.amount = safe_add_u64(stake.amount, args.amount)?;
    stake.updated_at_height = height;
    market.total_pool = safe_add_u64(market.total_pool, args.amount)?;

    pool.serialize(&mut *pool_info.data.borrow_mut())?;
    stake.serialize(&mut *stake_info.data.borrow_mut())?;
    market.serialize(&mut *market_info.data.borrow_mut())?;

    msg!("Stake placed");
    msg!("Market ID: {}", args.market_id);
    msg!("Outcome: {}", args.outcome_index);
    msg!("Amount: {}", args.amount);
    msg!("Staker: {}", staker_info.key);
    msg!("Outcome pool: {}", pool.total_staked);
    msg!("Total pool: {}", market.total_pool);

    // Forward the "prediction made" event to the achievement tracker
    let catalog = load_catalog(catalog_info)?;
    let mut stats = load_or_create_stats(
        program_id,
        stats_info,
        staker_info.key,
        staker_info,
        system_program_info,
    )?;
    achievements::track_prediction(
        program_id,
        staker_info.key,
        &mut stats,
        &catalog,
        achievement_infos,
        staker_info,
        system_program_info,
        height,
    );
    stats.serialize(&mut *stats_info.data.borrow_mut())?;

    Ok(())
}

// ============================================================================
// Settlement
// ============================================================================

fn process_claim_winnings(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: ClaimWinningsArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Claimer (signer, payer)
    let claimer_info = next_account_info(account_info_iter)?;
    check_signer(claimer_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: Market
    let market_info = next_account_info(account_info_iter)?;

    // Account 3: OutcomePool for the claimed outcome
    let pool_info = next_account_info(account_info_iter)?;

    // Account 4: StakePosition (writable)
    let stake_info = next_account_info(account_info_iter)?;

    // Account 5: Market Vault (writable)
    let vault_info = next_account_info(account_info_iter)?;

    // Account 6: AccountStats PDA (writable)
    let stats_info = next_account_info(account_info_iter)?;

    // Account 7: AchievementCatalog
    let catalog_info = next_account_info(account_info_iter)?;

    // Account 8: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    // Remaining accounts: achievement record PDAs for any credential due
    let achievement_infos = account_info_iter.as_slice();

    // Claims stay open while the program is paused; the config is only
    // needed here as a sanity check on the account wiring
    load_config(config_info)?;

    let market_id_bytes = args.market_id.to_le_bytes();
    verify_pda(market_info.key, program_id, &[MARKET_SEED, &market_id_bytes])?;
    verify_pda(
        vault_info.key,
        program_id,
        &[MARKET_VAULT_SEED, &market_id_bytes],
    )?;

    let market = load_market(market_info)?;

    let outcome_byte = [args.outcome_index];
    verify_pda(
        pool_info.key,
        program_id,
        &[OUTCOME_POOL_SEED, &market_id_bytes, &outcome_byte],
    )?;

    let staker_bytes = claimer_info.key.to_bytes();
    verify_pda(
        stake_info.key,
        program_id,
        &[STAKE_SEED, &market_id_bytes, &outcome_byte, &staker_bytes],
    )?;

    // No stake record means nothing to claim
    if stake_info.data_is_empty() || pool_info.data_is_empty() {
        return Err(PredictionPoolError::NoWinnings.into());
    }

    let mut stake = deserialize_account::<StakePosition>(&stake_info.data.borrow())?;
    if stake.discriminator != STAKE_DISCRIMINATOR {
        msg!("Error: Invalid StakePosition discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }
    let pool = deserialize_account::<OutcomePool>(&pool_info.data.borrow())?;
    if pool.discriminator != OUTCOME_POOL_DISCRIMINATOR {
        msg!("Error: Invalid OutcomePool discriminator");
        return Err(PredictionPoolError::InvalidAccountData.into());
    }

    stake.ensure_unclaimed()?;
    let payout = settlement_amount(&market, &stake, pool.total_staked)?;

    // Mark claimed before the outgoing transfer; a reentrant second claim
    // hits AlreadyClaimed
    stake.claimed = true;
    stake.serialize(&mut *stake_info.data.borrow_mut())?;

    transfer_lamports(vault_info, claimer_info, payout)?;

    let height = current_height()?;
    msg!("Winnings claimed");
    msg!("Market ID: {}", args.market_id);
    msg!("Outcome: {}", args.outcome_index);
    msg!("Claimer: {}", claimer_info.key);
    msg!("Payout: {}", payout);

    // Refunds from cancelled markets are not wins; only resolved-market
    // claims feed the achievement tracker
    if market.status == MarketStatus::Resolved {
        let catalog = load_catalog(catalog_info)?;
        let mut stats = load_or_create_stats(
            program_id,
            stats_info,
            claimer_info.key,
            claimer_info,
            system_program_info,
        )?;
        achievements::track_win(
            program_id,
            claimer_info.key,
            payout,
            &mut stats,
            &catalog,
            achievement_infos,
            claimer_info,
            system_program_info,
            height,
        );
        stats.serialize(&mut *stats_info.data.borrow_mut())?;
    }

    Ok(())
}

// ============================================================================
// Achievements
// ============================================================================

fn process_mint_achievement(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: MintAchievementArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer, payer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: AchievementCatalog
    let catalog_info = next_account_info(account_info_iter)?;

    // Account 3: AchievementRecord PDA (writable)
    let record_info = next_account_info(account_info_iter)?;

    // Account 4: Owner's AccountStats PDA (writable)
    let stats_info = next_account_info(account_info_iter)?;

    // Account 5: System Program
    let system_program_info = next_account_info(account_info_iter)?;

    let config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    let kind = AchievementKind::from_index(args.kind)
        .ok_or(PredictionPoolError::InvalidAchievement)?;
    let catalog = load_catalog(catalog_info)?;

    let mut stats = load_or_create_stats(
        program_id,
        stats_info,
        &args.owner,
        admin_info,
        system_program_info,
    )?;

    let height = current_height()?;
    achievements::mint_explicit(
        program_id,
        &args.owner,
        kind,
        &mut stats,
        &catalog,
        record_info,
        admin_info,
        system_program_info,
        height,
    )?;
    stats.serialize(&mut *stats_info.data.borrow_mut())?;

    msg!("Achievement minted explicitly");
    msg!("Owner: {}", args.owner);
    msg!("Kind: {}", args.kind);

    Ok(())
}

fn process_configure_achievement(
    _program_id: &Pubkey,
    accounts: &[AccountInfo],
    args: ConfigureAchievementArgs,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();

    // Account 0: Admin (signer)
    let admin_info = next_account_info(account_info_iter)?;
    check_signer(admin_info)?;

    // Account 1: EngineConfig
    let config_info = next_account_info(account_info_iter)?;

    // Account 2: AchievementCatalog (writable)
    let catalog_info = next_account_info(account_info_iter)?;

    let config = load_config(config_info)?;
    config.ensure_admin(admin_info.key)?;

    let kind = AchievementKind::from_index(args.kind)
        .ok_or(PredictionPoolError::InvalidAchievement)?;

    let mut catalog = load_catalog(catalog_info)?;
    catalog.set_entry(kind, args.uri, args.enabled)?;
    catalog.serialize(&mut *catalog_info.data.borrow_mut())?;

    msg!("Achievement configured");
    msg!("Kind: {}", args.kind);
    msg!("Enabled: {}", args.enabled);

    Ok(())
}
