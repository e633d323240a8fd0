use epm_types::ContentId;
use sha2::{Digest, Sha256};

use crate::unixfs::encode_file_node;

/// Single-file content hasher.
///
/// Wraps a payload in the UnixFS file-node encoding used by the storage
/// backend and returns the sha2-256 multihash of the encoded node. Identical
/// bytes always produce the identical [`ContentId`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentHasher;

impl ContentHasher {
    /// Content identifier of `content` stored as a single file.
    pub fn hash(content: &[u8]) -> ContentId {
        let node = encode_file_node(content);
        ContentId::from_digest(Self::raw_digest(&node))
    }

    /// Verify that `content` produces the expected identifier.
    pub fn verify(content: &[u8], expected: &ContentId) -> bool {
        Self::hash(content) == *expected
    }

    /// Plain sha2-256 without the file-node wrapping (for low-level use).
    pub fn raw_digest(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}
