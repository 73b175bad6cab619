//! Append-only audit store abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entry::AuditLogEntry;
use crate::error::AuditError;
use crate::query::AuditQuery;

/// Append-only write target for audit entries.
///
/// The contract deliberately exposes no update or delete: entries are
/// immutable once written, and audit history survives deletion of the
/// resources it references. Implementations must be thread-safe
/// (`Send + Sync`) and tolerate interleaved concurrent inserts.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Durably append one entry.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Store` on any persistence failure. Callers
    /// treat this as fatal to the surrounding operation.
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;

    /// Return entries matching the query, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Store` on infrastructure failure.
    async fn search(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, AuditError>;
}

/// Shared handle to a store implementation.
pub type DynAuditStore = Arc<dyn AuditStore>;

/// In-memory audit store for tests and embedded use.
#[derive(Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn insert(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn search(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, AuditError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect())
    }
}
