use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use epm_types::{ContentUri, Manifest};

use crate::error::ServiceResult;
use crate::key::ServiceKind;

/// Manifest codec for one manifest format version.
#[async_trait]
pub trait ManifestService: Send + Sync {
    /// The `manifest_version` this codec reads and writes.
    fn manifest_version(&self) -> &str;

    /// Serialize a manifest into its canonical stored form.
    async fn write(&self, manifest: &Manifest) -> ServiceResult<String>;

    /// Decode a stored manifest.
    async fn read(&self, serialized: &[u8]) -> ServiceResult<Manifest>;
}

/// Content-addressed storage backend.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Short backend name for logs (`ipfs`, `memory`).
    fn backend(&self) -> &str;

    /// Store a payload and return the URI it can be read back from.
    async fn write(&self, payload: Bytes) -> ServiceResult<ContentUri>;

    /// Fetch the payload behind `uri`.
    async fn read(&self, uri: &ContentUri) -> ServiceResult<Bytes>;
}

/// Package registry. Only connection is handled here; publish and lookup
/// belong to the registry itself.
pub trait RegistryService: Send + Sync {
    /// Registry contract address.
    fn address(&self) -> &str;

    /// JSON-RPC endpoint used to reach the registry, if configured.
    fn provider(&self) -> Option<&str>;
}

/// Opaque service registered under a caller-defined key.
#[derive(Clone)]
pub struct CustomService(pub Arc<dyn Any + Send + Sync>);

impl CustomService {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

/// A connected service instance as held by a workspace.
#[derive(Clone)]
pub enum Service {
    Manifests(Arc<dyn ManifestService>),
    Storage(Arc<dyn StorageService>),
    Registries(Arc<dyn RegistryService>),
    Custom(CustomService),
}

impl Service {
    pub fn kind(&self) -> ServiceKind {
        match self {
            Self::Manifests(_) => ServiceKind::Manifests,
            Self::Storage(_) => ServiceKind::Storage,
            Self::Registries(_) => ServiceKind::Registries,
            Self::Custom(_) => ServiceKind::Custom,
        }
    }

    pub fn as_manifests(&self) -> Option<&Arc<dyn ManifestService>> {
        match self {
            Self::Manifests(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_storage(&self) -> Option<&Arc<dyn StorageService>> {
        match self {
            Self::Storage(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_registries(&self) -> Option<&Arc<dyn RegistryService>> {
        match self {
            Self::Registries(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomService> {
        match self {
            Self::Custom(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manifests(s) => write!(f, "Service::Manifests(v{})", s.manifest_version()),
            Self::Storage(s) => write!(f, "Service::Storage({})", s.backend()),
            Self::Registries(s) => write!(f, "Service::Registries({})", s.address()),
            Self::Custom(_) => f.write_str("Service::Custom(..)"),
        }
    }
}

/// Conversion from a connector's output into a workspace [`Service`].
pub trait IntoService {
    /// The family this output belongs to, known before connecting.
    const KIND: ServiceKind;

    fn into_service(self) -> Service;
}

impl IntoService for Arc<dyn ManifestService> {
    const KIND: ServiceKind = ServiceKind::Manifests;

    fn into_service(self) -> Service {
        Service::Manifests(self)
    }
}

impl IntoService for Arc<dyn StorageService> {
    const KIND: ServiceKind = ServiceKind::Storage;

    fn into_service(self) -> Service {
        Service::Storage(self)
    }
}

impl IntoService for Arc<dyn RegistryService> {
    const KIND: ServiceKind = ServiceKind::Registries;

    fn into_service(self) -> Service {
        Service::Registries(self)
    }
}

impl IntoService for CustomService {
    const KIND: ServiceKind = ServiceKind::Custom;

    fn into_service(self) -> Service {
        Service::Custom(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegistry;

    impl RegistryService for FixedRegistry {
        fn address(&self) -> &str {
            "0x8011df4830b4f696cd81393997e5371b93338878"
        }

        fn provider(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn into_service_tags_kind() {
        let registry: Arc<dyn RegistryService> = Arc::new(FixedRegistry);
        let service = registry.into_service();
        assert_eq!(service.kind(), ServiceKind::Registries);
        assert!(service.as_registries().is_some());
        assert!(service.as_storage().is_none());
    }

    #[test]
    fn custom_service_downcasts() {
        let service = CustomService::new(42u32).into_service();
        let custom = service.as_custom().unwrap();
        assert_eq!(custom.downcast_ref::<u32>(), Some(&42));
        assert!(custom.downcast_ref::<String>().is_none());
    }

    #[test]
    fn debug_shows_backend() {
        let service = Service::Registries(Arc::new(FixedRegistry));
        assert!(format!("{service:?}").contains("0x8011"));
    }
}
