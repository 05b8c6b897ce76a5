//! Keyed string storage behind the per-user record collections and sessions.
//!
//! Values are always read and written whole. Backends: Redis in deployments,
//! process memory for local runs and tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redis_backend;

pub use memory::MemoryStorage;
pub use redis_backend::RedisStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Whole-value key/value contract. No transactions, no partial writes.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Like `set`, but the key disappears once `ttl` has elapsed.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
