//! Payment routing: validation, fan-out, and the transaction ledger
//!
//! The router owns the [`Transaction`] lifecycle. It reads the directory
//! to discover payout targets and split rules, but never mutates it.
//!
//! A send is atomic with respect to the ledger: every leg of a payment is
//! recorded, or none is. The simulated chain submit sits between
//! validation and the ledger write, so a simulated failure leaves no
//! trace beyond the returned receipt.

use crate::alias::Alias;
use crate::amount::Amount;
use crate::directory::AliasDirectory;
use crate::models::{Direction, Transaction, MAX_NOTE_LEN};
use crate::storage::TransactionStore;
use crate::{AliasPayError, Result};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Fraction of sends that fail at the simulated chain by default
pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

/// Outcome of a send attempt
///
/// `ok: false` models a transient network/chain failure: no hash, no
/// ledger entries. The caller may resubmit, producing a brand-new
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SendReceipt {
    pub ok: bool,
    pub tx_hash: Option<String>,
}

/// Routes payments from one implicit sender to resolved aliases
pub struct PaymentRouter {
    directory: Arc<AliasDirectory>,
    ledger: Arc<dyn TransactionStore>,
    sender: Alias,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl PaymentRouter {
    pub fn new(
        directory: Arc<AliasDirectory>,
        ledger: Arc<dyn TransactionStore>,
        sender: Alias,
    ) -> Self {
        Self {
            directory,
            ledger,
            sender,
            failure_rate: DEFAULT_FAILURE_RATE,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Set the simulated chain failure rate, clamped to [0, 1]
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn sender(&self) -> &Alias {
        &self.sender
    }

    /// Send a payment to an alias.
    ///
    /// Validates the amount (positive, at most 999999, 2 decimal places)
    /// and the note (at most 120 characters) before touching anything.
    /// A team target fans the amount out by member shares, rounding
    /// half-up to the minor unit with the residual assigned to the first
    /// member, so the legs always reconcile to the amount exactly.
    pub async fn send(
        &self,
        to: &Alias,
        amount: &str,
        note: Option<&str>,
    ) -> Result<SendReceipt> {
        let amount = Amount::parse(amount)?;
        if let Some(note) = note {
            let len = note.chars().count();
            if len > MAX_NOTE_LEN {
                return Err(AliasPayError::NoteTooLong(len).into());
            }
        }
        let record = self.directory.resolve(to).await?;

        let note = note.map(str::to_string);
        let tx_hash = self.synthesize_tx_hash().await;
        let mut legs: Vec<(String, Transaction)> = Vec::new();
        legs.push((
            self.sender.as_str().to_string(),
            Transaction::new(Direction::Out, to.as_str(), amount, note.clone())
                .with_tx_hash(tx_hash.clone()),
        ));

        if record.is_team {
            let team = self
                .directory
                .team(to)
                .await?
                .ok_or_else(|| AliasPayError::NotFound(format!("team split for {to}")))?;
            let shares: Vec<u8> = team.members.iter().map(|m| m.share_percent).collect();
            let parts = amount.split_by_shares(&shares);
            for (member, part) in team.members.iter().zip(parts) {
                legs.push((
                    member.log_key().to_string(),
                    Transaction::new(Direction::In, to.as_str(), part, note.clone())
                        .with_tx_hash(tx_hash.clone()),
                ));
            }
        } else {
            legs.push((
                to.as_str().to_string(),
                Transaction::new(Direction::In, self.sender.as_str(), amount, note)
                    .with_tx_hash(tx_hash.clone()),
            ));
        }

        if self.chain_submit_fails().await {
            tracing::warn!("simulated chain failure sending to {}", to);
            return Ok(SendReceipt {
                ok: false,
                tx_hash: None,
            });
        }

        for (_, leg) in &mut legs {
            leg.mark_success()?;
        }
        self.ledger.append_batch(legs).await?;

        Ok(SendReceipt {
            ok: true,
            tx_hash: Some(tx_hash),
        })
    }

    /// Transaction log for an alias (or raw address key), newest first
    pub async fn history(&self, log_key: &str) -> Result<Vec<Transaction>> {
        self.ledger.history(log_key).await
    }

    async fn synthesize_tx_hash(&self) -> String {
        let mut rng = self.rng.lock().await;
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        format!("0x{}", hex::encode(bytes))
    }

    async fn chain_submit_fails(&self) -> bool {
        let mut rng = self.rng.lock().await;
        rng.gen_bool(self.failure_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::models::TeamMember;
    use crate::storage::{MemoryAliasStore, MemoryTransactionStore};

    fn fixture(failure_rate: f64) -> (Arc<AliasDirectory>, PaymentRouter) {
        let directory = Arc::new(AliasDirectory::new(
            Arc::new(MemoryAliasStore::new()),
            Arc::new(MockBackend::with_seed(11)),
        ));
        let router = PaymentRouter::new(
            directory.clone(),
            Arc::new(MemoryTransactionStore::new()),
            Alias::parse("me@example.com").unwrap(),
        )
        .with_failure_rate(failure_rate)
        .with_seed(11);
        (directory, router)
    }

    #[tokio::test]
    async fn test_send_rejects_bad_amounts() {
        let (_, router) = fixture(0.0);
        let to = Alias::parse("@payee").unwrap();

        assert!(router.send(&to, "12.345", None).await.is_err());
        assert!(router.send(&to, "-5", None).await.is_err());
        assert!(router.send(&to, "1000000", None).await.is_err());
        // Nothing recorded
        assert!(router.history("@payee").await.unwrap().is_empty());
        assert!(router.history("me@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_rejects_long_note() {
        let (_, router) = fixture(0.0);
        let to = Alias::parse("@payee").unwrap();
        let note = "x".repeat(121);

        let err = router.send(&to, "1.00", Some(&note)).await;
        assert!(err.is_err());
        assert!(router.history("me@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_send_records_both_legs() {
        let (_, router) = fixture(0.0);
        let to = Alias::parse("@payee").unwrap();

        let receipt = router.send(&to, "25.00", Some("rent")).await.unwrap();
        assert!(receipt.ok);
        let hash = receipt.tx_hash.unwrap();

        let out = router.history("me@example.com").await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].direction, Direction::Out);
        assert_eq!(out[0].counterparty, "@payee");
        assert_eq!(out[0].tx_hash.as_deref(), Some(hash.as_str()));

        let inbound = router.history("@payee").await.unwrap();
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].direction, Direction::In);
        assert_eq!(inbound[0].counterparty, "me@example.com");
        assert_eq!(inbound[0].amount, Amount::parse("25.00").unwrap());
        assert_eq!(inbound[0].note.as_deref(), Some("rent"));
    }

    #[tokio::test]
    async fn test_failed_send_leaves_no_trace() {
        let (_, router) = fixture(1.0);
        let to = Alias::parse("@payee").unwrap();

        let receipt = router.send(&to, "25.00", None).await.unwrap();
        assert!(!receipt.ok);
        assert!(receipt.tx_hash.is_none());
        assert!(router.history("me@example.com").await.unwrap().is_empty());
        assert!(router.history("@payee").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_team_send_fans_out_with_exact_reconciliation() {
        let (directory, router) = fixture(0.0);
        let team_alias = Alias::parse("@hack-team").unwrap();
        let a = format!("0x{}", hex::encode([1u8; 20]));
        let b = format!("0x{}", hex::encode([2u8; 20]));
        directory
            .set_team_split(
                &team_alias,
                vec![
                    TeamMember::new(a.clone(), 60).with_alias("a@example.com"),
                    TeamMember::new(b.clone(), 40),
                ],
            )
            .await
            .unwrap();

        let receipt = router.send(&team_alias, "10.00", None).await.unwrap();
        assert!(receipt.ok);

        let leg_a = router.history("a@example.com").await.unwrap();
        assert_eq!(leg_a.len(), 1);
        assert_eq!(leg_a[0].amount, Amount::parse("6.00").unwrap());
        assert_eq!(leg_a[0].counterparty, "@hack-team");

        // No alias: the member's log is keyed by payout address
        let leg_b = router.history(&b).await.unwrap();
        assert_eq!(leg_b.len(), 1);
        assert_eq!(leg_b[0].amount, Amount::parse("4.00").unwrap());

        let sum = leg_a[0].amount.saturating_add(&leg_b[0].amount);
        assert_eq!(sum, Amount::parse("10.00").unwrap());
    }
}
