//! Content addressing for epm.
//!
//! A payload is wrapped in a single UnixFS file node, encoded as a dag-pb
//! `PBNode`, and hashed with sha2-256. The resulting multihash is the
//! payload's [`ContentId`](epm_types::ContentId), the same identifier an IPFS
//! node assigns to a single-block file.
//!
//! Hashing is a pure function of the payload bytes: no timestamps, no
//! randomness, no I/O.

pub mod hasher;
pub mod unixfs;

pub use hasher::ContentHasher;
pub use unixfs::{DataType, PbNode, UnixFsData, SINGLE_BLOCK_LIMIT};
