//! The object-storage boundary.
//!
//! The engine only ever fetches and stores whole byte blobs by locator;
//! everything else (auth, retries, versioning) belongs to the implementation
//! behind the trait. Two concurrent edits to the same locator race here and
//! the later store wins.

use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Remote blob storage addressed by opaque locator strings.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the bytes stored at `locator`.
    ///
    /// Fails with [`Error::NotFound`] when nothing is stored there, or
    /// [`Error::Transport`] when the backend is unreachable.
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>>;

    /// Store bytes at `locator`, overwriting whatever was there.
    async fn store(&self, locator: &str, bytes: Vec<u8>) -> Result<()>;
}

/// In-process storage backed by a map. Used in tests and as the reference
/// implementation of the trait's contract.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .get(locator)
            .cloned()
            .ok_or_else(|| Error::NotFound(locator.to_string()))
    }

    async fn store(&self, locator: &str, bytes: Vec<u8>) -> Result<()> {
        self.blobs.write().insert(locator.to_string(), bytes);
        Ok(())
    }
}
