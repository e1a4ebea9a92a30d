//! The AliasPay service facade
//!
//! [`AliasPay`] is the async contract a front-end consumes: alias
//! resolution, balance, sends, history, claims, team management,
//! profiles, and channel verification. Every operation completes after a
//! bounded simulated latency, mirroring what callers would see against a
//! real directory and chain. Set [`LatencyProfile::none`] in tests.
//!
//! Validation failures on the boolean-returning operations (`set_alias`,
//! `set_routing_rule`, the verification calls) come back as `false`, the
//! way a front-end expects; [`AliasPay::send_payment`] surfaces typed
//! validation errors and reserves `ok: false` for the simulated
//! transient failure path.
//!
//! # Examples
//!
//! ```no_run
//! use aliaspay_core::{Alias, AliasPay};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let service = AliasPay::new(Alias::parse("me@example.com")?);
//!
//! let record = service.resolve_alias("@alice").await?.unwrap();
//! println!("paying {}", record.payout_address);
//!
//! let receipt = service.send_payment("@alice", "10.00", Some("lunch")).await?;
//! if receipt.ok {
//!     println!("sent: {}", receipt.tx_hash.unwrap());
//! }
//! # Ok(())
//! # }
//! ```

use crate::alias::{Alias, AliasKind};
use crate::amount::Amount;
use crate::backend::MockBackend;
use crate::directory::AliasDirectory;
use crate::models::{
    AliasRecord, Balance, Direction, Profile, Team, TeamMember, Transaction, TxStatus,
    VerificationChannel,
};
use crate::router::{PaymentRouter, SendReceipt};
use crate::storage::{MemoryAliasStore, MemoryTransactionStore};
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Per-operation simulated latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub resolve: Duration,
    pub balance: Duration,
    pub send: Duration,
    pub history: Duration,
    pub claim: Duration,
    pub routing: Duration,
    pub teams: Duration,
    pub delete: Duration,
    pub verify: Duration,
}

impl LatencyProfile {
    /// Latencies in the proportions a hosted directory and chain would show
    pub fn simulated() -> Self {
        Self {
            resolve: Duration::from_millis(500),
            balance: Duration::from_millis(300),
            send: Duration::from_millis(1000),
            history: Duration::from_millis(200),
            claim: Duration::from_millis(500),
            routing: Duration::from_millis(800),
            teams: Duration::from_millis(200),
            delete: Duration::from_millis(500),
            verify: Duration::from_millis(1000),
        }
    }

    /// No artificial delay, for tests
    pub fn none() -> Self {
        Self {
            resolve: Duration::ZERO,
            balance: Duration::ZERO,
            send: Duration::ZERO,
            history: Duration::ZERO,
            claim: Duration::ZERO,
            routing: Duration::ZERO,
            teams: Duration::ZERO,
            delete: Duration::ZERO,
            verify: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::simulated()
    }
}

/// In-process AliasPay service over in-memory storage and a mock backend
pub struct AliasPay {
    directory: Arc<AliasDirectory>,
    router: PaymentRouter,
    latency: LatencyProfile,
}

impl AliasPay {
    /// Wire up the service with fresh in-memory stores and the mock
    /// directory backend. `sender` is the implicit payer for every send.
    pub fn new(sender: Alias) -> Self {
        let directory = Arc::new(AliasDirectory::new(
            Arc::new(MemoryAliasStore::new()),
            Arc::new(MockBackend::new()),
        ));
        let router = PaymentRouter::new(
            directory.clone(),
            Arc::new(MemoryTransactionStore::new()),
            sender,
        );
        Self {
            directory,
            router,
            latency: LatencyProfile::default(),
        }
    }

    /// Deterministic variant for tests: seeded backend and router, no
    /// simulated failures.
    pub fn with_seed(sender: Alias, seed: u64) -> Self {
        let directory = Arc::new(AliasDirectory::new(
            Arc::new(MemoryAliasStore::new()),
            Arc::new(MockBackend::with_seed(seed)),
        ));
        let router = PaymentRouter::new(
            directory.clone(),
            Arc::new(MemoryTransactionStore::new()),
            sender,
        )
        .with_seed(seed)
        .with_failure_rate(0.0);
        Self {
            directory,
            router,
            latency: LatencyProfile::none(),
        }
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.router = self.router.with_failure_rate(rate);
        self
    }

    pub fn directory(&self) -> &AliasDirectory {
        &self.directory
    }

    /// Resolve an alias. `None` only for syntactically invalid input;
    /// every valid alias resolves to a record.
    pub async fn resolve_alias(&self, alias: &str) -> Result<Option<AliasRecord>> {
        tokio::time::sleep(self.latency.resolve).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(e) => {
                tracing::debug!("resolve rejected: {}", e);
                return Ok(None);
            }
        };
        Ok(Some(self.directory.resolve(&alias).await?))
    }

    pub async fn balance(&self) -> Balance {
        tokio::time::sleep(self.latency.balance).await;
        Balance::simulated()
    }

    /// Send a payment. Validation problems are errors; a simulated
    /// transient failure is `ok: false` with the ledger untouched.
    pub async fn send_payment(
        &self,
        alias: &str,
        amount: &str,
        note: Option<&str>,
    ) -> Result<SendReceipt> {
        tokio::time::sleep(self.latency.send).await;
        let alias = Alias::parse(alias)?;
        self.router.send(&alias, amount, note).await
    }

    /// Transaction log for an alias or raw address key, newest first
    pub async fn history(&self, alias: &str) -> Result<Vec<Transaction>> {
        tokio::time::sleep(self.latency.history).await;
        self.router.history(alias).await
    }

    /// Claim an alias for a payout address. Returns false on invalid input.
    pub async fn set_alias(&self, alias: &str, address: &str) -> Result<bool> {
        tokio::time::sleep(self.latency.claim).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(e) => {
                tracing::warn!("set_alias rejected: {}", e);
                return Ok(false);
            }
        };
        match self.directory.claim(&alias, address).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("set_alias rejected: {}", e);
                Ok(false)
            }
        }
    }

    /// Install a team split. Returns false when validation rejects it.
    pub async fn set_routing_rule(&self, alias: &str, members: Vec<TeamMember>) -> Result<bool> {
        tokio::time::sleep(self.latency.routing).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(e) => {
                tracing::warn!("set_routing_rule rejected: {}", e);
                return Ok(false);
            }
        };
        match self.directory.set_team_split(&alias, members).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("set_routing_rule rejected: {}", e);
                Ok(false)
            }
        }
    }

    pub async fn teams(&self) -> Result<Vec<Team>> {
        tokio::time::sleep(self.latency.teams).await;
        let mut teams = self.directory.teams().await?;
        for team in &mut teams {
            team.total_received = self.received_via(team).await?;
        }
        Ok(teams)
    }

    pub async fn team(&self, alias: &str) -> Result<Option<Team>> {
        tokio::time::sleep(self.latency.teams).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(_) => return Ok(None),
        };
        match self.directory.team(&alias).await? {
            Some(mut team) => {
                team.total_received = self.received_via(&team).await?;
                Ok(Some(team))
            }
            None => Ok(None),
        }
    }

    /// Remove a team split. Returns whether one existed.
    pub async fn delete_team(&self, alias: &str) -> Result<bool> {
        tokio::time::sleep(self.latency.delete).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(_) => return Ok(false),
        };
        self.directory.delete_team(&alias).await
    }

    /// Aggregated public view of an alias: contact fields per kind,
    /// verification flags, and totals computed from the ledger.
    pub async fn profile(&self, alias: &str) -> Result<Option<Profile>> {
        tokio::time::sleep(self.latency.resolve).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(_) => return Ok(None),
        };
        let record = self.directory.resolve(&alias).await?;

        let mut total_received = Amount::zero();
        let mut payers = HashSet::new();
        for tx in self.router.history(alias.as_str()).await? {
            if tx.direction == Direction::In && tx.status == TxStatus::Success {
                total_received = total_received.saturating_add(&tx.amount);
                payers.insert(tx.counterparty);
            }
        }

        let routing_rule = if record.is_team {
            self.directory.team(&alias).await?.map(|t| t.members)
        } else {
            None
        };

        let kind = alias.kind();
        Ok(Some(Profile {
            email: (kind == AliasKind::Email).then(|| alias.to_string()),
            phone: (kind == AliasKind::Phone).then(|| alias.to_string()),
            github: (kind == AliasKind::Handle).then(|| alias.to_string()),
            twitter: None,
            verified: record.verified,
            address: record.payout_address,
            total_received,
            unique_payers: payers.len() as u32,
            // Payment streaks are not tracked; fixed demo value
            streak: 5,
            routing_rule,
            alias,
        }))
    }

    /// Verify the email channel. False when the alias is not email-kind.
    pub async fn verify_email(&self, alias: &str) -> Result<bool> {
        self.verify_channel(alias, VerificationChannel::Email).await
    }

    /// Verify the phone channel. False when the alias is not phone-kind.
    pub async fn verify_phone(&self, alias: &str) -> Result<bool> {
        self.verify_channel(alias, VerificationChannel::Phone).await
    }

    /// Link a GitHub account. False when the alias is not a handle.
    pub async fn connect_github(&self, alias: &str) -> Result<bool> {
        self.verify_channel(alias, VerificationChannel::Github).await
    }

    /// Link a Twitter account. False when the alias is not a handle.
    pub async fn connect_twitter(&self, alias: &str) -> Result<bool> {
        self.verify_channel(alias, VerificationChannel::Twitter).await
    }

    async fn verify_channel(&self, alias: &str, channel: VerificationChannel) -> Result<bool> {
        tokio::time::sleep(self.latency.verify).await;
        let alias = match Alias::parse(alias) {
            Ok(alias) => alias,
            Err(_) => return Ok(false),
        };
        self.directory.mark_verified(&alias, channel).await
    }

    /// Sum of successful inbound legs routed through a team
    async fn received_via(&self, team: &Team) -> Result<Amount> {
        let mut total = Amount::zero();
        for member in &team.members {
            for tx in self.router.history(member.log_key()).await? {
                if tx.direction == Direction::In
                    && tx.status == TxStatus::Success
                    && tx.counterparty == team.alias.as_str()
                {
                    total = total.saturating_add(&tx.amount);
                }
            }
        }
        Ok(total)
    }
}
