//! Stakepool Market Program
//!
//! Parimutuel prediction market engine on Solana.
//!
//! ## Architecture
//!
//! Participants stake native value on one of 2-10 outcomes of a market.
//! A trusted oracle resolves the market once its resolution height has
//! passed; winners claim a proportional share of the pooled stakes, net
//! of a platform fee sent to the treasury.
//!
//! ## Key Features
//!
//! - Market lifecycle management (Active -> Locked -> Resolved / Cancelled)
//! - Per-outcome pool accounting with per-account stake records
//! - Height-gated staking, locking and resolution
//! - Proportional settlement with integer (truncating) payout arithmetic
//! - Soulbound achievement credentials minted on staking/win milestones

pub mod achievements;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod queries;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

// Re-export commonly used items
pub use error::PredictionPoolError;
pub use instruction::PredictionPoolInstruction;
pub use state::*;

// Program ID - will be updated after deployment
solana_program::declare_id!("Enitk3x5aSu7DSRGUWNpQFU9fNQawJQ6RNSuAsGUHK3c");
