//! Data models for AliasPay
//!
//! This module defines the core data structures shared across the
//! directory, router, and service layers.
//!
//! # Models
//!
//! - [`AliasRecord`] - Directory entry mapping an alias to a payout target
//! - [`TeamMember`] / [`Team`] - Weighted payout split behind a handle
//! - [`Transaction`] - Immutable ledger entry for one payment leg
//! - [`Profile`] / [`Balance`] - Aggregated views served to callers
//!
//! # Examples
//!
//! ## Creating a record
//!
//! ```
//! use aliaspay_core::{Alias, AliasRecord};
//!
//! let alias = Alias::parse("alice@example.com").unwrap();
//! let record = AliasRecord::new(alias, "0x1234567890123456789012345678901234567890");
//! assert!(!record.is_team);
//! ```
//!
//! ## Transaction lifecycle
//!
//! ```
//! use aliaspay_core::{Amount, Direction, Transaction, TxStatus};
//!
//! let mut tx = Transaction::new(
//!     Direction::In,
//!     "@alice",
//!     Amount::parse("10.00").unwrap(),
//!     Some("lunch".to_string()),
//! );
//! assert_eq!(tx.status, TxStatus::Pending);
//! tx.mark_success().unwrap();
//! assert!(tx.mark_failed().is_err()); // terminal
//! ```

use crate::alias::{Alias, AliasKind};
use crate::amount::Amount;
use crate::{AliasPayError, Result};
use serde::{Deserialize, Serialize};

/// Maximum length of a payment note, in characters
pub const MAX_NOTE_LEN: usize = 120;

/// Per-channel verification flags, tracked independently of alias syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedChannels {
    pub email: bool,
    pub phone: bool,
    pub github: bool,
    pub twitter: bool,
}

/// A verifiable channel on an alias record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationChannel {
    Email,
    Phone,
    Github,
    Twitter,
}

impl VerificationChannel {
    /// Whether this channel can be verified for an alias of the given kind.
    /// Email and phone verification require the matching alias kind; the
    /// social channels hang off handles.
    pub fn permitted_for(&self, kind: AliasKind) -> bool {
        matches!(
            (self, kind),
            (VerificationChannel::Email, AliasKind::Email)
                | (VerificationChannel::Phone, AliasKind::Phone)
                | (VerificationChannel::Github, AliasKind::Handle)
                | (VerificationChannel::Twitter, AliasKind::Handle)
        )
    }
}

impl VerifiedChannels {
    pub fn set(&mut self, channel: VerificationChannel) {
        match channel {
            VerificationChannel::Email => self.email = true,
            VerificationChannel::Phone => self.phone = true,
            VerificationChannel::Github => self.github = true,
            VerificationChannel::Twitter => self.twitter = true,
        }
    }

    /// Check that no flag is set for a channel the alias kind does not permit
    pub fn is_consistent_with(&self, kind: AliasKind) -> bool {
        match kind {
            AliasKind::Email => !self.phone && !self.github && !self.twitter,
            AliasKind::Phone => !self.email && !self.github && !self.twitter,
            AliasKind::Handle => !self.email && !self.phone,
        }
    }
}

/// Coarse risk classification attached by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A directory entry mapping an alias to a payout target
///
/// If `is_team` is set, a [`Team`] record exists for the same alias and the
/// payout fans out to its members instead of `payout_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub alias: Alias,
    pub payout_address: String,
    pub verified: VerifiedChannels,
    pub is_team: bool,
    pub risk_level: Option<RiskLevel>,
    pub created_at: i64,
}

impl AliasRecord {
    pub fn new(alias: Alias, payout_address: impl Into<String>) -> Self {
        Self {
            alias,
            payout_address: payout_address.into(),
            verified: VerifiedChannels::default(),
            is_team: false,
            risk_level: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_verified(mut self, verified: VerifiedChannels) -> Self {
        self.verified = verified;
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }
}

/// One member of a team payout split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub payout_address: String,
    pub alias: Option<String>,
    pub share_percent: u8,
}

impl TeamMember {
    pub fn new(payout_address: impl Into<String>, share_percent: u8) -> Self {
        Self {
            payout_address: payout_address.into(),
            alias: None,
            share_percent,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Ledger key for this member: the alias when known, the raw payout
    /// address otherwise.
    pub fn log_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.payout_address)
    }
}

/// A team payout split behind a handle alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub alias: Alias,
    pub members: Vec<TeamMember>,
    pub created_at: i64,
    pub total_received: Amount,
}

impl Team {
    pub fn new(alias: Alias, members: Vec<TeamMember>) -> Self {
        Self {
            id: format!("team_{}", uuid::Uuid::new_v4()),
            alias,
            members,
            created_at: chrono::Utc::now().timestamp(),
            total_received: Amount::zero(),
        }
    }
}

/// Direction of a ledger entry relative to its log owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// Lifecycle state of a transaction: pending is the only non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Failed,
}

/// An immutable record of one payment leg
///
/// Once created, only the status may change, and only pending -> success
/// or pending -> failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub direction: Direction,
    pub counterparty: String,
    pub amount: Amount,
    pub note: Option<String>,
    pub status: TxStatus,
    pub timestamp: i64,
    pub tx_hash: Option<String>,
}

impl Transaction {
    pub fn new(
        direction: Direction,
        counterparty: impl Into<String>,
        amount: Amount,
        note: Option<String>,
    ) -> Self {
        Self {
            id: format!("tx_{}", uuid::Uuid::new_v4()),
            direction,
            counterparty: counterparty.into(),
            amount,
            note,
            status: TxStatus::Pending,
            timestamp: chrono::Utc::now().timestamp(),
            tx_hash: None,
        }
    }

    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status != TxStatus::Pending
    }

    /// Transition pending -> success
    pub fn mark_success(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(AliasPayError::InvalidTransition(format!(
                "transaction {} is already {:?}",
                self.id, self.status
            ))
            .into());
        }
        self.status = TxStatus::Success;
        Ok(())
    }

    /// Transition pending -> failed
    pub fn mark_failed(&mut self) -> Result<()> {
        if self.is_terminal() {
            return Err(AliasPayError::InvalidTransition(format!(
                "transaction {} is already {:?}",
                self.id, self.status
            ))
            .into());
        }
        self.status = TxStatus::Failed;
        Ok(())
    }
}

/// Simulated wallet balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub pyusd: String,
    pub usdc: String,
    pub eth: String,
}

impl Balance {
    /// The demo wallet balance. There is no funding flow; every caller
    /// sees the same figures.
    pub fn simulated() -> Self {
        Self {
            pyusd: "1250.75".to_string(),
            usdc: "500.00".to_string(),
            eth: "0.25".to_string(),
        }
    }
}

/// Aggregated public view of an alias
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub alias: Alias,
    pub address: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub verified: VerifiedChannels,
    pub total_received: Amount,
    pub unique_payers: u32,
    pub streak: u32,
    pub routing_rule: Option<Vec<TeamMember>>,
}
