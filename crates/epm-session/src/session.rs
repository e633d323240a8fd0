use std::collections::BTreeMap;
use std::sync::Arc;

use epm_config::{
    Capabilities, ManifestService, RegistryService, Service, ServiceKey, StorageService,
};
use epm_types::PackageDescriptor;

use crate::error::{SessionError, SessionResult};
use crate::query::Query;

/// Connected services keyed by the name they were configured under.
///
/// A key is present only if its connector connected successfully. Nothing
/// can be added or removed after construction.
#[derive(Debug)]
pub struct Workspace {
    services: BTreeMap<ServiceKey, Service>,
    capabilities: Capabilities,
}

impl Workspace {
    pub fn new(services: BTreeMap<ServiceKey, Service>) -> Self {
        let capabilities = services.keys().collect();
        Self {
            services,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn get(&self, key: &ServiceKey) -> SessionResult<&Service> {
        self.services
            .get(key)
            .ok_or_else(|| SessionError::CapabilityAbsent(key.clone()))
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.services.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.services.keys()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn manifests(&self) -> SessionResult<Arc<dyn ManifestService>> {
        self.get(&ServiceKey::Manifests)?
            .as_manifests()
            .cloned()
            .ok_or(SessionError::CapabilityAbsent(ServiceKey::Manifests))
    }

    pub fn storage(&self) -> SessionResult<Arc<dyn StorageService>> {
        self.get(&ServiceKey::Storage)?
            .as_storage()
            .cloned()
            .ok_or(SessionError::CapabilityAbsent(ServiceKey::Storage))
    }

    pub fn registries(&self) -> SessionResult<Arc<dyn RegistryService>> {
        self.get(&ServiceKey::Registries)?
            .as_registries()
            .cloned()
            .ok_or(SessionError::CapabilityAbsent(ServiceKey::Registries))
    }
}

/// A fully connected workspace plus the accessors callers use.
///
/// Cloning a session shares the same workspace.
#[derive(Clone, Debug)]
pub struct Session {
    workspace: Arc<Workspace>,
}

impl Session {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Arc::new(workspace),
        }
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    pub fn capabilities(&self) -> Capabilities {
        self.workspace.capabilities()
    }

    /// Fails with `CapabilityAbsent` unless configured with `manifests`.
    pub fn manifests(&self) -> SessionResult<Arc<dyn ManifestService>> {
        self.workspace.manifests()
    }

    /// Fails with `CapabilityAbsent` unless configured with `storage`.
    pub fn storage(&self) -> SessionResult<Arc<dyn StorageService>> {
        self.workspace.storage()
    }

    /// Fails with `CapabilityAbsent` unless configured with `registries`.
    pub fn registries(&self) -> SessionResult<Arc<dyn RegistryService>> {
        self.workspace.registries()
    }

    /// Any service, including custom keys.
    pub fn service(&self, key: &ServiceKey) -> SessionResult<&Service> {
        self.workspace.get(key)
    }

    /// A query scoped to `package`, sharing this session's workspace.
    pub fn query(&self, package: PackageDescriptor) -> Query {
        Query::new(package, Arc::clone(&self.workspace))
    }
}
