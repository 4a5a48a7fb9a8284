//! Persistence — three record collections kept in a key-value store under fixed keys.
//!
//! The store is a port (`KeyValueStore`) so the same `Repository` runs over a
//! data directory, Redis, or an in-memory map in tests.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

pub mod file;
pub mod memory;
pub mod redis_store;
pub mod repository;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use repository::Repository;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Byte-valued key-value storage. Each `set` replaces the whole value.
///
/// Values are raw bytes; decoding is left to the caller so corrupt data never
/// surfaces as a backend error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Opens the store named by `url`.
///
/// `memory://` → in-process map, `redis://` / `rediss://` → Redis,
/// anything else is treated as a directory for file storage.
pub async fn connect(url: &str) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    if url.starts_with("memory://") {
        info!("Using in-memory storage (data is lost on exit)");
        return Ok(Arc::new(MemoryStore::default()));
    }

    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStore::connect(url).await?;
        info!("Redis storage connected");
        return Ok(Arc::new(store));
    }

    info!("Using file storage at {url}");
    Ok(Arc::new(FileStore::new(url)))
}
