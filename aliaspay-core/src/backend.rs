//! Directory backend abstraction
//!
//! A [`DirectoryBackend`] answers "what does the wider world know about
//! this alias?". The bundled [`MockBackend`] fabricates an answer for
//! every syntactically valid alias, which is what a demo deployment
//! wants; a real backend would return `None` for a truly absent alias
//! and the caller decides what that means.

use crate::alias::{Alias, AliasKind};
use crate::models::{AliasRecord, RiskLevel, VerifiedChannels};
use crate::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tokio::sync::Mutex;

/// External directory lookup contract
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// Look up an alias. `None` means the backend authoritatively knows
    /// nothing about it; a record may still be fabricated or claimed
    /// locally by the caller.
    async fn lookup(&self, alias: &Alias) -> Result<Option<AliasRecord>>;
}

/// Backend that synthesizes a plausible record for every alias
///
/// Fabricated records get a random 20-byte hex payout address, a random
/// risk level, and randomized verification flags restricted to the
/// channels the alias kind permits. Seedable for deterministic tests.
pub struct MockBackend {
    rng: Mutex<StdRng>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    async fn synthesize(&self, alias: &Alias) -> AliasRecord {
        let mut rng = self.rng.lock().await;

        let mut address_bytes = [0u8; 20];
        rng.fill_bytes(&mut address_bytes);
        let payout_address = format!("0x{}", hex::encode(address_bytes));

        // Only the channels matching the alias kind may come back verified
        let mut verified = VerifiedChannels::default();
        match alias.kind() {
            AliasKind::Email => verified.email = rng.gen_bool(0.5),
            AliasKind::Phone => verified.phone = rng.gen_bool(0.5),
            AliasKind::Handle => {
                verified.github = rng.gen_bool(0.5);
                verified.twitter = rng.gen_bool(0.25);
            }
        }

        let risk_level = match rng.gen_range(0..3) {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };

        AliasRecord::new(alias.clone(), payout_address)
            .with_verified(verified)
            .with_risk_level(risk_level)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryBackend for MockBackend {
    async fn lookup(&self, alias: &Alias) -> Result<Option<AliasRecord>> {
        Ok(Some(self.synthesize(alias).await))
    }
}
