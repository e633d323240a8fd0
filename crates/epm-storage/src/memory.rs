use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use epm_config::{ServiceResult, StorageService};
use epm_crypto::ContentHasher;
use epm_types::{ContentId, ContentUri};

use crate::error::StorageError;

/// In-memory, HashMap-based content store.
///
/// Intended for tests and offline use. Payloads are keyed by the same
/// content id an IPFS node would assign, so URIs are interchangeable with
/// the IPFS backend for single-block payloads.
pub struct InMemoryStorage {
    objects: RwLock<HashMap<ContentId, Bytes>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of payloads currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for InMemoryStorage {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn write(&self, payload: Bytes) -> ServiceResult<ContentUri> {
        let id = ContentHasher::hash(&payload);
        let mut map = self.objects.write().expect("lock poisoned");
        // Same id always maps to the same content.
        map.entry(id).or_insert(payload);
        debug!(cid = %id, "stored payload in memory");
        Ok(ContentUri::ipfs(id))
    }

    async fn read(&self, uri: &ContentUri) -> ServiceResult<Bytes> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(uri.content_id())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(*uri.content_id()).into())
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryStorage")
            .field("object_count", &count)
            .finish()
    }
}
