//! Storage abstraction for directory records and transaction logs
//!
//! The directory and router never touch collections directly; they go
//! through [`AliasStore`] and [`TransactionStore`] so the in-memory demo
//! backing can be swapped for a real datastore without touching the
//! domain logic.
//!
//! # Security Warning
//!
//! The memory implementations are **NOT suitable for production use**:
//! - No persistence across restarts
//! - No cross-operation transactions or per-alias locking
//! - Last write wins on concurrent directory updates

use crate::alias::Alias;
use crate::models::{AliasRecord, Team, Transaction};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Storage for alias records and team splits
#[async_trait]
pub trait AliasStore: Send + Sync {
    async fn get(&self, alias: &Alias) -> Result<Option<AliasRecord>>;
    async fn put(&self, record: AliasRecord) -> Result<()>;
    async fn get_team(&self, alias: &Alias) -> Result<Option<Team>>;
    async fn put_team(&self, team: Team) -> Result<()>;
    /// Remove a team split. Returns whether one existed.
    async fn remove_team(&self, alias: &Alias) -> Result<bool>;
    async fn list_teams(&self) -> Result<Vec<Team>>;
}

/// Storage for per-alias transaction logs, newest first
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn append(&self, log_key: &str, tx: Transaction) -> Result<()>;
    /// Record every leg of a multi-leg send, or none of them.
    async fn append_batch(&self, legs: Vec<(String, Transaction)>) -> Result<()>;
    async fn history(&self, log_key: &str) -> Result<Vec<Transaction>>;
}

#[derive(Default)]
struct DirectoryData {
    records: HashMap<String, AliasRecord>,
    teams: HashMap<String, Team>,
}

/// In-memory alias store
#[derive(Default)]
pub struct MemoryAliasStore {
    // One lock over both maps so record flags and team entries move together
    data: Mutex<DirectoryData>,
}

impl MemoryAliasStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AliasStore for MemoryAliasStore {
    async fn get(&self, alias: &Alias) -> Result<Option<AliasRecord>> {
        let data = self.data.lock().await;
        Ok(data.records.get(alias.as_str()).cloned())
    }

    async fn put(&self, record: AliasRecord) -> Result<()> {
        let mut data = self.data.lock().await;
        data.records.insert(record.alias.as_str().to_string(), record);
        Ok(())
    }

    async fn get_team(&self, alias: &Alias) -> Result<Option<Team>> {
        let data = self.data.lock().await;
        Ok(data.teams.get(alias.as_str()).cloned())
    }

    async fn put_team(&self, team: Team) -> Result<()> {
        let mut data = self.data.lock().await;
        data.teams.insert(team.alias.as_str().to_string(), team);
        Ok(())
    }

    async fn remove_team(&self, alias: &Alias) -> Result<bool> {
        let mut data = self.data.lock().await;
        Ok(data.teams.remove(alias.as_str()).is_some())
    }

    async fn list_teams(&self) -> Result<Vec<Team>> {
        let data = self.data.lock().await;
        let mut teams: Vec<_> = data.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.alias.as_str().cmp(b.alias.as_str()));
        Ok(teams)
    }
}

/// In-memory transaction log store
#[derive(Default)]
pub struct MemoryTransactionStore {
    logs: Mutex<HashMap<String, Vec<Transaction>>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn append(&self, log_key: &str, tx: Transaction) -> Result<()> {
        let mut logs = self.logs.lock().await;
        logs.entry(log_key.to_string()).or_default().insert(0, tx);
        Ok(())
    }

    async fn append_batch(&self, legs: Vec<(String, Transaction)>) -> Result<()> {
        // One lock acquisition for the whole batch: a send is all-or-nothing
        let mut logs = self.logs.lock().await;
        for (log_key, tx) in legs {
            logs.entry(log_key).or_default().insert(0, tx);
        }
        Ok(())
    }

    async fn history(&self, log_key: &str) -> Result<Vec<Transaction>> {
        let logs = self.logs.lock().await;
        Ok(logs.get(log_key).cloned().unwrap_or_default())
    }
}
