//! Connector and capability composition for epm.
//!
//! Three independently versioned service families back a session: a
//! manifest codec, a content storage backend, and a package registry. Each is
//! produced by a [`Connector`] that validates its options before any side
//! effect and then initializes the live service.
//!
//! # Quick Start
//!
//! ```rust
//! use epm_config::{Capabilities, ConfigValue, RawConfig, ServiceKey};
//!
//! let config = RawConfig::new()
//!     .with(ServiceKey::Manifests, "ethpm/manifests/v2")
//!     .with(ServiceKey::Storage, "ethpm/storage/memory");
//! let caps = config.capabilities();
//! assert!(caps.contains(&ServiceKey::Manifests));
//! assert!(!caps.contains(&ServiceKey::Registries));
//! ```

pub mod capabilities;
pub mod connector;
pub mod error;
pub mod key;
pub mod options;
pub mod service;
pub mod value;

// Re-exports for convenience.
pub use capabilities::Capabilities;
pub use connector::{Connector, ServiceConnector};
pub use error::{ConfigError, ConfigResult, ServiceError, ServiceResult, ValidationError, Violation};
pub use key::{ServiceKey, ServiceKind};
pub use options::{OptionsSchema, PortValue, Validated};
pub use service::{
    CustomService, IntoService, ManifestService, RegistryService, Service, StorageService,
};
pub use value::{ConfigValue, ConnectorFactory, ConnectorModule, RawConfig};
