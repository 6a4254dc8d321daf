//! Error types for the Stakepool Market Program

use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the Stakepool Market Program
#[derive(Clone, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum PredictionPoolError {
    // === General Errors (0-99) ===

    #[error("Invalid instruction")]
    InvalidInstruction = 0,

    #[error("Invalid account data")]
    InvalidAccountData = 1,

    #[error("Account not initialized")]
    AccountNotInitialized = 2,

    #[error("Already initialized")]
    AlreadyInitialized = 3,

    #[error("Invalid PDA")]
    InvalidPDA = 4,

    #[error("Invalid signer")]
    InvalidSigner = 5,

    #[error("Not authorized")]
    NotAuthorized = 6,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 7,

    #[error("Program is paused")]
    Paused = 8,

    #[error("Invalid input")]
    InvalidInput = 9,

    #[error("Invalid fee rate")]
    InvalidFee = 10,

    // === Market Errors (100-199) ===

    #[error("Market not found")]
    MarketNotFound = 100,

    #[error("Invalid market state")]
    InvalidMarketState = 101,

    #[error("Market already resolved")]
    MarketAlreadyResolved = 102,

    #[error("Market not resolved")]
    MarketNotResolved = 103,

    #[error("Invalid lock or resolution height")]
    InvalidDate = 104,

    #[error("Invalid outcome count")]
    InvalidOutcomeCount = 105,

    #[error("Invalid outcome index")]
    InvalidOutcome = 106,

    #[error("Caller is not the oracle")]
    InvalidOracle = 107,

    // === Stake Errors (200-299) ===

    #[error("Market closed for staking")]
    MarketClosed = 200,

    #[error("Market past lock height")]
    MarketLocked = 201,

    #[error("Stake below minimum")]
    StakeTooLow = 202,

    #[error("Stake above maximum")]
    StakeTooHigh = 203,

    #[error("Value transfer failed")]
    TransferFailed = 204,

    // === Settlement Errors (300-399) ===

    #[error("Winnings already claimed")]
    AlreadyClaimed = 300,

    #[error("No winnings to claim")]
    NoWinnings = 301,

    // === Achievement Errors (400-499) ===

    #[error("Achievement already exists")]
    AlreadyExists = 400,

    #[error("Invalid achievement")]
    InvalidAchievement = 401,
}

impl From<PredictionPoolError> for ProgramError {
    fn from(e: PredictionPoolError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for PredictionPoolError {
    fn type_of() -> &'static str {
        "PredictionPoolError"
    }
}
