//! Sessions for epm.
//!
//! A [`Builder`] resolves a [`RawConfig`](epm_config::RawConfig) against a
//! [`Catalog`] of named connectors, connects them all concurrently and wraps
//! the resulting [`Workspace`] in a [`Session`]. The session only exposes
//! the services it was configured with; asking for any other fails with
//! [`SessionError::CapabilityAbsent`].
//!
//! ```no_run
//! # async fn run() -> epm_session::SessionResult<()> {
//! use epm_config::{RawConfig, ServiceKey};
//! use epm_session::Builder;
//! use serde_json::json;
//!
//! let config = RawConfig::new()
//!     .with(ServiceKey::Manifests, "ethpm/manifests/v2")
//!     .with(ServiceKey::Storage, "ethpm/storage/ipfs");
//! let session = Builder::new(config)?
//!     .connect(&json!({"ipfs": {"host": "ipfs.infura.io", "port": "5001", "protocol": "https"}}))
//!     .await?;
//! assert!(session.registries().is_err());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod catalog;
pub mod error;
pub mod query;
pub mod session;

pub use builder::Builder;
pub use catalog::{Catalog, DefaultModule};
pub use error::{SessionError, SessionResult};
pub use query::Query;
pub use session::{Session, Workspace};
