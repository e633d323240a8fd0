use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use epm_config::{ConfigError, ConfigResult, Connector, OptionsSchema, RegistryService, Validated};

use crate::registry::Registry;

/// Catalog name of the registry connector.
pub const REGISTRY_CONNECTOR: &str = "ethpm/registries/simple";

#[derive(Clone, Debug, Deserialize)]
pub struct RegistryOptions {
    pub registry: RegistrySection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegistrySection {
    pub address: String,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Connects a [`Registry`] from `registry.address` and an optional
/// `registry.provider` URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegistryConnector;

#[async_trait]
impl Connector for RegistryConnector {
    type Options = RegistryOptions;
    type Service = Arc<dyn RegistryService>;

    fn name(&self) -> &str {
        REGISTRY_CONNECTOR
    }

    fn options_schema(&self) -> OptionsSchema {
        OptionsSchema::new(REGISTRY_CONNECTOR).with_schema(json!({
            "type": "object",
            "required": ["registry"],
            "properties": {
                "registry": {
                    "type": "object",
                    "required": ["address"],
                    "properties": {
                        "address": {"type": "string", "pattern": "^0x[0-9a-fA-F]{40}$"},
                        "provider": {"type": "string", "format": "uri"}
                    }
                }
            }
        }))
    }

    async fn init(&self, options: Validated<RegistryOptions>) -> ConfigResult<Self::Service> {
        let section = options.into_inner().registry;
        let registry = Registry::new(&section.address, section.provider.as_deref())
            .map_err(|e| ConfigError::configuration("registries", e.to_string()))?;
        info!(address = %section.address, "registry connected");
        Ok(Arc::new(registry))
    }
}
