//! Alias directory: claims, resolution, and team splits
//!
//! The directory owns the [`AliasRecord`] and [`Team`] lifecycle. It
//! reads through an [`AliasStore`] for claimed records and falls back to
//! a [`DirectoryBackend`] for everything else, caching what the backend
//! returns so repeated resolution of the same alias is stable within a
//! process.

use crate::alias::{Alias, AliasKind};
use crate::backend::DirectoryBackend;
use crate::models::{AliasRecord, Team, TeamMember, VerificationChannel};
use crate::storage::AliasStore;
use crate::{AliasPayError, Result};
use std::sync::Arc;

/// Bounds on team size when a split is created
pub const MIN_TEAM_MEMBERS: usize = 2;
pub const MAX_TEAM_MEMBERS: usize = 10;

/// Minimum accepted payout address length (0x-prefixed 20-byte hex)
const MIN_ADDRESS_LEN: usize = 42;

/// Directory of aliases and their payout targets
pub struct AliasDirectory {
    store: Arc<dyn AliasStore>,
    backend: Arc<dyn DirectoryBackend>,
}

impl AliasDirectory {
    pub fn new(store: Arc<dyn AliasStore>, backend: Arc<dyn DirectoryBackend>) -> Self {
        Self { store, backend }
    }

    /// Resolve an alias to its current record.
    ///
    /// Claimed and previously resolved records win; otherwise the backend
    /// is consulted and its answer cached. With the bundled mock backend
    /// this never fails for a syntactically valid alias.
    pub async fn resolve(&self, alias: &Alias) -> Result<AliasRecord> {
        if let Some(record) = self.store.get(alias).await? {
            return Ok(record);
        }
        match self.backend.lookup(alias).await? {
            Some(record) => {
                tracing::debug!("resolved {} via backend", alias);
                self.store.put(record.clone()).await?;
                Ok(record)
            }
            None => Err(AliasPayError::NotFound(alias.to_string()).into()),
        }
    }

    /// Claim an alias for a single payout address.
    ///
    /// Idempotent upsert: an existing record keeps its verification flags
    /// and risk level but the payout target is replaced. Claiming an
    /// alias that carried a team split dissolves the split. There is no
    /// ownership negotiation; whoever claims last wins.
    pub async fn claim(&self, alias: &Alias, payout_address: &str) -> Result<()> {
        if payout_address.len() < MIN_ADDRESS_LEN {
            return Err(AliasPayError::InvalidAddress(format!(
                "payout address too short: {payout_address:?}"
            ))
            .into());
        }
        let record = match self.store.get(alias).await? {
            Some(mut existing) => {
                existing.payout_address = payout_address.to_string();
                existing.is_team = false;
                existing
            }
            None => AliasRecord::new(alias.clone(), payout_address),
        };
        self.store.remove_team(alias).await?;
        self.store.put(record).await?;
        Ok(())
    }

    /// Install or replace a team split behind a handle alias.
    ///
    /// Requires a handle-kind alias, 2-10 members, and integer shares
    /// summing to exactly 100. Nothing is stored when validation fails.
    pub async fn set_team_split(&self, alias: &Alias, members: Vec<TeamMember>) -> Result<Team> {
        validate_team(alias, &members)?;

        let mut record = self.resolve(alias).await?;
        let team = Team::new(alias.clone(), members);
        self.store.put_team(team.clone()).await?;
        record.is_team = true;
        self.store.put(record).await?;
        tracing::debug!(
            "installed split for {} with {} members",
            alias,
            team.members.len()
        );
        Ok(team)
    }

    /// Remove a team split. Returns whether one existed.
    pub async fn delete_team(&self, alias: &Alias) -> Result<bool> {
        let removed = self.store.remove_team(alias).await?;
        if removed {
            if let Some(mut record) = self.store.get(alias).await? {
                record.is_team = false;
                self.store.put(record).await?;
            }
        }
        Ok(removed)
    }

    pub async fn team(&self, alias: &Alias) -> Result<Option<Team>> {
        self.store.get_team(alias).await
    }

    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.store.list_teams().await
    }

    /// Mark a verification channel on an alias record.
    ///
    /// Returns false without mutating when the alias kind does not permit
    /// the channel (a phone alias cannot verify email, and so on).
    pub async fn mark_verified(
        &self,
        alias: &Alias,
        channel: VerificationChannel,
    ) -> Result<bool> {
        if !channel.permitted_for(alias.kind()) {
            tracing::debug!("{:?} verification not permitted for {}", channel, alias);
            return Ok(false);
        }
        let mut record = self.resolve(alias).await?;
        record.verified.set(channel);
        self.store.put(record).await?;
        Ok(true)
    }
}

fn validate_team(alias: &Alias, members: &[TeamMember]) -> Result<()> {
    if alias.kind() != AliasKind::Handle {
        return Err(AliasPayError::InvalidTeam(format!(
            "team alias must be a handle: {alias}"
        ))
        .into());
    }
    if !(MIN_TEAM_MEMBERS..=MAX_TEAM_MEMBERS).contains(&members.len()) {
        return Err(AliasPayError::InvalidTeam(format!(
            "member count must be between {MIN_TEAM_MEMBERS} and {MAX_TEAM_MEMBERS}, got {}",
            members.len()
        ))
        .into());
    }
    for member in members {
        if member.payout_address.len() < MIN_ADDRESS_LEN {
            return Err(AliasPayError::InvalidTeam(format!(
                "member payout address too short: {:?}",
                member.payout_address
            ))
            .into());
        }
        if member.share_percent > 100 {
            return Err(AliasPayError::InvalidTeam(format!(
                "share must be 0-100, got {}",
                member.share_percent
            ))
            .into());
        }
    }
    let total: u32 = members.iter().map(|m| u32::from(m.share_percent)).sum();
    if total != 100 {
        return Err(AliasPayError::InvalidTeam(format!(
            "shares must sum to exactly 100, got {total}"
        ))
        .into());
    }
    Ok(())
}
