use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::connector::ServiceConnector;
use crate::key::ServiceKey;

/// Zero-argument constructor producing a fresh connector.
pub type ConnectorFactory = Arc<dyn Fn() -> Box<dyn ServiceConnector> + Send + Sync>;

/// A module exporting a default connector.
pub trait ConnectorModule: Send + Sync {
    fn default_connector(&self) -> Box<dyn ServiceConnector>;
}

/// How a single service key is configured.
///
/// A `Named` value is resolved against the session catalog. `Factory` and
/// `Module` bring their own connector.
#[derive(Clone)]
pub enum ConfigValue {
    Named(String),
    Factory(ConnectorFactory),
    Module(Arc<dyn ConnectorModule>),
}

impl ConfigValue {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn() -> Box<dyn ServiceConnector> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(f))
    }

    pub fn module<M: ConnectorModule + 'static>(module: M) -> Self {
        Self::Module(Arc::new(module))
    }
}

impl From<&str> for ConfigValue {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ConfigValue {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Module(_) => f.write_str("Module(..)"),
        }
    }
}

/// Mapping from service key to connector source, before resolution.
#[derive(Clone, Debug, Default)]
pub struct RawConfig {
    entries: BTreeMap<ServiceKey, ConfigValue>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<ServiceKey>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, returning the value it replaces.
    pub fn insert(
        &mut self,
        key: impl Into<ServiceKey>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &ServiceKey) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ServiceKey, &ConfigValue)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Well-known services this configuration will provide once connected.
    pub fn capabilities(&self) -> Capabilities {
        self.entries.keys().collect()
    }
}

impl IntoIterator for RawConfig {
    type Item = (ServiceKey, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<ServiceKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::error::ConfigResult;
    use crate::key::ServiceKind;
    use crate::service::{CustomService, IntoService, Service};

    struct Echo;

    #[async_trait]
    impl ServiceConnector for Echo {
        fn connector_name(&self) -> &str {
            "test/echo"
        }

        fn service_kind(&self) -> ServiceKind {
            ServiceKind::Custom
        }

        async fn connect_service(&self, raw: &Value) -> ConfigResult<Service> {
            Ok(CustomService::new(raw.clone()).into_service())
        }
    }

    struct EchoModule;

    impl ConnectorModule for EchoModule {
        fn default_connector(&self) -> Box<dyn ServiceConnector> {
            Box::new(Echo)
        }
    }

    #[test]
    fn capabilities_follow_keys() {
        let config = RawConfig::new()
            .with(ServiceKey::Manifests, "ethpm/manifests/v2")
            .with("storage", "ethpm/storage/memory")
            .with("cache", ConfigValue::factory(|| Box::new(Echo)));
        let caps = config.capabilities();
        assert!(caps.contains(&ServiceKey::Manifests));
        assert!(caps.contains(&ServiceKey::Storage));
        assert!(!caps.contains(&ServiceKey::Registries));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn later_insert_replaces() {
        let mut config = RawConfig::new().with("storage", "ethpm/storage/ipfs");
        let previous = config.insert("storage", "ethpm/storage/memory");
        assert!(matches!(previous, Some(ConfigValue::Named(ref n)) if n == "ethpm/storage/ipfs"));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn iteration_is_key_ordered() {
        let config = RawConfig::new()
            .with("registries", "ethpm/registries/simple")
            .with("manifests", "ethpm/manifests/v2")
            .with("storage", "ethpm/storage/memory");
        let keys: Vec<&str> = config.keys().map(ServiceKey::as_str).collect();
        assert_eq!(keys, ["manifests", "storage", "registries"]);
    }

    #[test]
    fn module_and_factory_produce_connectors() {
        let values = [ConfigValue::module(EchoModule), ConfigValue::factory(|| Box::new(Echo))];
        for value in values {
            let connector = match value {
                ConfigValue::Module(m) => m.default_connector(),
                ConfigValue::Factory(f) => f(),
                ConfigValue::Named(_) => unreachable!(),
            };
            assert_eq!(connector.connector_name(), "test/echo");
        }
    }

    #[test]
    fn debug_hides_closures() {
        assert_eq!(format!("{:?}", ConfigValue::named("x")), "Named(\"x\")");
        assert_eq!(format!("{:?}", ConfigValue::module(EchoModule)), "Module(..)");
    }
}
