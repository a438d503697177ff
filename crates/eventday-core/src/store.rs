// ABOUTME: Boundary contract for the append-only registration log collaborator.
// ABOUTME: Implementations append records durably and scan the full log in append order.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("registration log unavailable: {0}")]
    Unavailable(String),
}

/// The registration log. Append-only: records are never rewritten or removed,
/// and `scan` returns every record in the order it was appended.
#[async_trait]
pub trait EventLogStore: Send + Sync {
    async fn append(&self, record: &Record) -> Result<(), StoreError>;
    async fn scan(&self) -> Result<Vec<Record>, StoreError>;
}
