//! # AliasPay Core
//!
//! Shared business logic for AliasPay applications: alias resolution
//! (email / phone / @handle to payout target) and payment routing,
//! including percentage-based team splits.
//!
//! There is no durable backend and no real chain here. Directory lookups
//! and payment submission are simulated behind the [`DirectoryBackend`]
//! trait and a configurable failure rate, which keeps the domain rules
//! (alias syntax, amount limits, share reconciliation, ledger atomicity)
//! fully testable in-process.

pub mod alias;
pub mod amount;
pub mod backend;
pub mod directory;
pub mod format;
pub mod models;
pub mod router;
pub mod service;
pub mod storage;

pub use alias::{Alias, AliasKind};
pub use amount::Amount;
pub use backend::{DirectoryBackend, MockBackend};
pub use directory::{AliasDirectory, MAX_TEAM_MEMBERS, MIN_TEAM_MEMBERS};
pub use models::{
    AliasRecord, Balance, Direction, Profile, RiskLevel, Team, TeamMember, Transaction, TxStatus,
    VerificationChannel, VerifiedChannels, MAX_NOTE_LEN,
};
pub use router::{PaymentRouter, SendReceipt};
pub use service::{AliasPay, LatencyProfile};
pub use storage::{AliasStore, MemoryAliasStore, MemoryTransactionStore, TransactionStore};

/// Result type for AliasPay operations
pub type Result<T> = anyhow::Result<T>;

#[derive(thiserror::Error, Debug)]
pub enum AliasPayError {
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("note too long: {0} characters (max {MAX_NOTE_LEN})")]
    NoteTooLong(usize),
    #[error("invalid team: {0}")]
    InvalidTeam(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),
}
