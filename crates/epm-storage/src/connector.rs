use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use epm_config::{
    ConfigError, ConfigResult, Connector, OptionsSchema, PortValue, ServiceError, StorageService,
    Validated,
};

use crate::ipfs::{IpfsEndpoint, IpfsStorage};
use crate::memory::InMemoryStorage;

/// Catalog name of the IPFS storage connector.
pub const IPFS_CONNECTOR: &str = "ethpm/storage/ipfs";
/// Catalog name of the in-memory storage connector.
pub const MEMORY_CONNECTOR: &str = "ethpm/storage/memory";

const PROTOCOLS: [&str; 2] = ["http", "https"];

/// `ipfs` section of the option bag.
#[derive(Clone, Debug, Deserialize)]
pub struct IpfsOptions {
    pub ipfs: IpfsEndpointOptions,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IpfsEndpointOptions {
    pub host: String,
    pub port: PortValue,
    pub protocol: String,
}

/// Connects to an IPFS node's HTTP API.
///
/// Requires `ipfs.host`, `ipfs.port` (number or numeric string) and
/// `ipfs.protocol` (`http` or `https`). No request is made while
/// connecting; the first network call happens on read or write.
#[derive(Clone, Copy, Debug, Default)]
pub struct IpfsConnector;

#[async_trait]
impl Connector for IpfsConnector {
    type Options = IpfsOptions;
    type Service = Arc<dyn StorageService>;

    fn name(&self) -> &str {
        IPFS_CONNECTOR
    }

    fn options_schema(&self) -> OptionsSchema {
        OptionsSchema::new(IPFS_CONNECTOR).with_schema(json!({
            "type": "object",
            "required": ["ipfs"],
            "properties": {
                "ipfs": {
                    "type": "object",
                    "required": ["host", "port", "protocol"],
                    "properties": {
                        "host": {"type": "string", "minLength": 1},
                        "port": {
                            "oneOf": [
                                {"type": "integer", "minimum": 1, "maximum": 65535},
                                {"type": "string", "pattern": "^[0-9]{1,5}$"}
                            ]
                        },
                        "protocol": {"enum": PROTOCOLS}
                    }
                }
            }
        }))
    }

    async fn init(&self, options: Validated<IpfsOptions>) -> ConfigResult<Self::Service> {
        let ipfs = options.into_inner().ipfs;
        let port = ipfs
            .port
            .port()
            .map_err(|reason| ConfigError::configuration("ipfs.port", reason))?;
        let endpoint = IpfsEndpoint::new(ipfs.host, port, ipfs.protocol);
        let storage = IpfsStorage::new(&endpoint)
            .map_err(|e| ConfigError::init(IPFS_CONNECTOR, ServiceError::from(e)))?;
        info!(endpoint = %storage.base_url(), "ipfs storage connected");
        Ok(Arc::new(storage))
    }
}

/// Takes no options.
#[derive(Debug, Deserialize)]
pub struct MemoryOptions {}

/// Connects a fresh, empty [`InMemoryStorage`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryConnector;

#[async_trait]
impl Connector for MemoryConnector {
    type Options = MemoryOptions;
    type Service = Arc<dyn StorageService>;

    fn name(&self) -> &str {
        MEMORY_CONNECTOR
    }

    fn options_schema(&self) -> OptionsSchema {
        OptionsSchema::new(MEMORY_CONNECTOR)
    }

    async fn init(&self, _options: Validated<MemoryOptions>) -> ConfigResult<Self::Service> {
        Ok(Arc::new(InMemoryStorage::new()))
    }
}
