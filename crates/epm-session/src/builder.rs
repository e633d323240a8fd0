use std::collections::BTreeMap;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use epm_config::{
    Capabilities, ConfigError, ConfigValue, RawConfig, Service, ServiceConnector, ServiceKey,
};

use crate::catalog::Catalog;
use crate::error::SessionResult;
use crate::session::{Session, Workspace};

/// Turns a [`RawConfig`] into connectors, then connects them into a
/// [`Session`].
///
/// Resolution happens up front and performs no I/O, so configuration
/// mistakes are reported before any connector runs.
pub struct Builder {
    connectors: BTreeMap<ServiceKey, Box<dyn ServiceConnector>>,
}

impl Builder {
    /// Resolve `config` against the standard catalog.
    pub fn new(config: RawConfig) -> SessionResult<Self> {
        Self::with_catalog(&Catalog::standard(), config)
    }

    /// Resolve `config` against `catalog`.
    ///
    /// Fails with a configuration error naming the key when the config is
    /// empty, a name is not in the catalog, or a connector produces a
    /// different service family than its well-known key requires.
    pub fn with_catalog(catalog: &Catalog, config: RawConfig) -> SessionResult<Self> {
        if config.is_empty() {
            return Err(ConfigError::configuration("<config>", "no services configured").into());
        }

        let mut connectors = BTreeMap::new();
        for (key, value) in config {
            let connector = resolve(catalog, &key, value)?;
            let expected = key.expected_kind();
            if key.is_well_known() && connector.service_kind() != expected {
                return Err(ConfigError::configuration(
                    &key,
                    format!(
                        "connector '{}' provides {}, not {expected}",
                        connector.connector_name(),
                        connector.service_kind()
                    ),
                )
                .into());
            }
            debug!(service = %key, connector = connector.connector_name(), "resolved connector");
            connectors.insert(key, connector);
        }
        Ok(Self { connectors })
    }

    /// Well-known services the session will expose.
    pub fn capabilities(&self) -> Capabilities {
        self.connectors.keys().collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.connectors.keys()
    }

    /// Connect every service with the shared option bag.
    ///
    /// All connectors run concurrently on the current task and all are
    /// awaited. If any fails, the error of the first failing key (in key
    /// order) is returned and no session is built. Key order decides which
    /// error wins, not the order in which connectors finish.
    pub async fn connect(self, options: &Value) -> SessionResult<Session> {
        let pending = self.connectors.iter().map(|(key, connector)| async move {
            let result = connector.connect_service(options).await;
            (key, result)
        });
        let results = join_all(pending).await;

        let mut services: BTreeMap<ServiceKey, Service> = BTreeMap::new();
        let mut first_error = None;
        for (key, result) in results {
            match result {
                Ok(service) => {
                    services.insert(key.clone(), service);
                }
                Err(err) => {
                    warn!(service = %key, error = %err, "connector failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        if let Some(err) = first_error {
            return Err(err.into());
        }

        let workspace = Workspace::new(services);
        info!(capabilities = %workspace.capabilities(), services = workspace.len(), "session connected");
        Ok(Session::new(workspace))
    }
}

fn resolve(
    catalog: &Catalog,
    key: &ServiceKey,
    value: ConfigValue,
) -> Result<Box<dyn ServiceConnector>, ConfigError> {
    match value {
        ConfigValue::Named(name) => catalog
            .get(&name)
            .map(|module| module.default_connector())
            .ok_or_else(|| ConfigError::configuration(key, format!("unknown connector '{name}'"))),
        ConfigValue::Factory(factory) => Ok(factory()),
        ConfigValue::Module(module) => Ok(module.default_connector()),
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.connectors
                    .iter()
                    .map(|(key, connector)| (key.as_str(), connector.connector_name())),
            )
            .finish()
    }
}
