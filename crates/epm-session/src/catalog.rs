use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use epm_config::{Connector, ConnectorModule, ServiceConnector};
use epm_manifest::{V2Connector, V2_CONNECTOR};
use epm_registry::{RegistryConnector, REGISTRY_CONNECTOR};
use epm_storage::{IpfsConnector, MemoryConnector, IPFS_CONNECTOR, MEMORY_CONNECTOR};

/// Module whose default connector is `C::default()`.
pub struct DefaultModule<C>(PhantomData<fn() -> C>);

impl<C> DefaultModule<C> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for DefaultModule<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ConnectorModule for DefaultModule<C>
where
    C: Connector + Default + 'static,
{
    fn default_connector(&self) -> Box<dyn ServiceConnector> {
        Box::new(C::default())
    }
}

/// Named connector modules that `ConfigValue::Named` entries resolve
/// against.
#[derive(Clone, Default)]
pub struct Catalog {
    modules: BTreeMap<String, Arc<dyn ConnectorModule>>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The connectors shipped with epm:
    /// `ethpm/manifests/v2`, `ethpm/storage/ipfs`, `ethpm/storage/memory`
    /// and `ethpm/registries/simple`.
    pub fn standard() -> Self {
        Self::new()
            .with_default::<V2Connector>(V2_CONNECTOR)
            .with_default::<IpfsConnector>(IPFS_CONNECTOR)
            .with_default::<MemoryConnector>(MEMORY_CONNECTOR)
            .with_default::<RegistryConnector>(REGISTRY_CONNECTOR)
    }

    /// Register `module` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, module: Arc<dyn ConnectorModule>) {
        self.modules.insert(name.into(), module);
    }

    pub fn with_module<M: ConnectorModule + 'static>(mut self, name: impl Into<String>, module: M) -> Self {
        self.register(name, Arc::new(module));
        self
    }

    pub fn with_default<C>(self, name: impl Into<String>) -> Self
    where
        C: Connector + Default + 'static,
    {
        self.with_module(name, DefaultModule::<C>::new())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ConnectorModule>> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.modules.keys()).finish()
    }
}
