//! Package registry connector for epm.
//!
//! A registry is identified by its contract address and, optionally, the
//! JSON-RPC provider used to reach it. This crate only connects to a
//! registry; publishing releases and looking up packages are handled
//! elsewhere.

pub mod connector;
pub mod error;
pub mod registry;

pub use connector::{RegistryConnector, RegistryOptions, RegistrySection, REGISTRY_CONNECTOR};
pub use error::{RegistryError, Result};
pub use registry::{Registry, ADDRESS_LENGTH};
