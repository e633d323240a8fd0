use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use epm_config::RawConfig;

use crate::error::{SdkError, SdkResult};

/// Directory imported sources are written under unless configured.
pub const DEFAULT_IMPORT_ROOT: &str = "browser";

/// File-level configuration for a workbench.
///
/// ```toml
/// import_root = "browser"
///
/// [services]
/// manifests = "ethpm/manifests/v2"
/// storage = "ethpm/storage/ipfs"
///
/// [options.ipfs]
/// host = "ipfs.infura.io"
/// port = "5001"
/// protocol = "https"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpmConfig {
    pub import_root: String,
    /// Service key to connector name.
    pub services: BTreeMap<String, String>,
    /// Option bag handed unchanged to every connector.
    pub options: toml::Table,
}

impl Default for EpmConfig {
    fn default() -> Self {
        let services = BTreeMap::from([
            ("manifests".to_string(), "ethpm/manifests/v2".to_string()),
            ("storage".to_string(), "ethpm/storage/ipfs".to_string()),
        ]);

        let mut ipfs = toml::Table::new();
        ipfs.insert("host".into(), "ipfs.infura.io".into());
        ipfs.insert("port".into(), "5001".into());
        ipfs.insert("protocol".into(), "https".into());
        let mut options = toml::Table::new();
        options.insert("ipfs".into(), toml::Value::Table(ipfs));

        Self {
            import_root: DEFAULT_IMPORT_ROOT.to_string(),
            services,
            options,
        }
    }
}

impl EpmConfig {
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SdkError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML. Missing sections take their defaults.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::ConfigRender(e.to_string()))
    }

    /// The `[services]` table as a builder config.
    pub fn raw_config(&self) -> RawConfig {
        self.services
            .iter()
            .fold(RawConfig::new(), |config, (key, name)| {
                config.with(key.as_str(), name.as_str())
            })
    }

    /// The `[options]` table as the JSON option bag connectors validate.
    pub fn connect_options(&self) -> SdkResult<Value> {
        serde_json::to_value(&self.options).map_err(|e| SdkError::ConfigRender(e.to_string()))
    }

    pub fn with_service(mut self, key: impl Into<String>, connector: impl Into<String>) -> Self {
        self.services.insert(key.into(), connector.into());
        self
    }

    pub fn with_import_root(mut self, root: impl Into<String>) -> Self {
        self.import_root = root.into();
        self
    }
}
