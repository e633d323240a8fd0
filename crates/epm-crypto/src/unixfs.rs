//! Protobuf messages for the UnixFS file-node encoding.
//!
//! Only the subset needed to describe a single-block file is modelled.
//! Links are never produced for single-block files, so `PbNode` carries
//! its data field alone.

use prost::Message;

/// Largest payload an IPFS node stores as one block with the default chunker.
///
/// Larger payloads are split by IPFS into a tree of blocks, so their CID
/// differs from the single-node identifier computed here.
pub const SINGLE_BLOCK_LIMIT: usize = 256 * 1024;

/// UnixFS node type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum DataType {
    Raw = 0,
    Directory = 1,
    File = 2,
    Metadata = 3,
    Symlink = 4,
    HamtShard = 5,
}

/// UnixFS `Data` message.
#[derive(Clone, PartialEq, Message)]
pub struct UnixFsData {
    #[prost(int32, required, tag = "1")]
    pub data_type: i32,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub data: Option<Vec<u8>>,
    #[prost(uint64, optional, tag = "3")]
    pub filesize: Option<u64>,
    #[prost(uint64, repeated, packed = "false", tag = "4")]
    pub blocksizes: Vec<u64>,
}

impl UnixFsData {
    /// A single-block file node. Empty payloads omit the data field.
    pub fn file(content: &[u8]) -> Self {
        Self {
            data_type: DataType::File as i32,
            data: if content.is_empty() {
                None
            } else {
                Some(content.to_vec())
            },
            filesize: Some(content.len() as u64),
            blocksizes: Vec::new(),
        }
    }
}

/// dag-pb `PBNode` without links.
#[derive(Clone, PartialEq, Message)]
pub struct PbNode {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub data: Option<Vec<u8>>,
}

impl PbNode {
    /// Wrap an encoded UnixFS message.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data: Some(data) }
    }
}

/// Encode `content` as the dag-pb bytes of a single-block UnixFS file.
pub fn encode_file_node(content: &[u8]) -> Vec<u8> {
    let unixfs = UnixFsData::file(content).encode_to_vec();
    PbNode::with_data(unixfs).encode_to_vec()
}
