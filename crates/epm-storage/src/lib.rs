//! Content-addressed storage for epm.
//!
//! Every payload (in practice a serialized manifest) is stored under the id
//! an IPFS node would assign it and read back through an `ipfs://` URI.
//!
//! # Backends
//!
//! All backends implement [`epm_config::StorageService`]:
//!
//! - [`InMemoryStorage`] -- `HashMap`-based store for tests and offline use
//! - [`IpfsStorage`] -- an IPFS node's HTTP API (`/api/v0/add`, `/api/v0/cat`)
//!
//! Each is provided to sessions by a connector: [`MemoryConnector`]
//! (`ethpm/storage/memory`) and [`IpfsConnector`] (`ethpm/storage/ipfs`).

pub mod connector;
pub mod error;
pub mod ipfs;
pub mod memory;

// Re-export primary types at crate root for ergonomic imports.
pub use connector::{
    IpfsConnector, IpfsEndpointOptions, IpfsOptions, MemoryConnector, MemoryOptions,
    IPFS_CONNECTOR, MEMORY_CONNECTOR,
};
pub use error::{StorageError, StorageResult};
pub use ipfs::{IpfsEndpoint, IpfsStorage};
pub use memory::InMemoryStorage;
