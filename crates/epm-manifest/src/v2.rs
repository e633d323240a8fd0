use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use epm_config::{
    ConfigResult, Connector, ManifestService, OptionsSchema, ServiceError, ServiceResult,
    Validated,
};
use epm_types::{Manifest, MANIFEST_VERSION};

/// Catalog name of the v2 manifest connector.
pub const V2_CONNECTOR: &str = "ethpm/manifests/v2";

/// Version 2 manifest codec.
///
/// `write` produces the canonical form: object keys sorted, no insignificant
/// whitespace, absent optional fields omitted. Equal manifests therefore
/// serialize to identical bytes and hash to the same content id.
#[derive(Clone, Copy, Debug, Default)]
pub struct V2Manifests;

impl V2Manifests {
    pub fn new() -> Self {
        Self
    }

    /// Canonical serialization without going through the service trait.
    pub fn to_canonical(manifest: &Manifest) -> ServiceResult<String> {
        if manifest.manifest_version != MANIFEST_VERSION {
            return Err(ServiceError::Unsupported(format!(
                "manifest_version {} (expected {MANIFEST_VERSION})",
                manifest.manifest_version
            )));
        }
        let value = serde_json::to_value(manifest).map_err(|e| ServiceError::Encode(e.to_string()))?;
        serde_json::to_string(&sort_keys(value)).map_err(|e| ServiceError::Encode(e.to_string()))
    }

    pub fn from_bytes(serialized: &[u8]) -> ServiceResult<Manifest> {
        let manifest: Manifest =
            serde_json::from_slice(serialized).map_err(|e| ServiceError::Decode(e.to_string()))?;
        if manifest.manifest_version != MANIFEST_VERSION {
            return Err(ServiceError::Unsupported(format!(
                "manifest_version {}",
                manifest.manifest_version
            )));
        }
        Ok(manifest)
    }
}

/// Rebuild every object with its keys in lexicographic order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[async_trait]
impl ManifestService for V2Manifests {
    fn manifest_version(&self) -> &str {
        MANIFEST_VERSION
    }

    async fn write(&self, manifest: &Manifest) -> ServiceResult<String> {
        let serialized = Self::to_canonical(manifest)?;
        debug!(package = %manifest.package_name, bytes = serialized.len(), "serialized manifest");
        Ok(serialized)
    }

    async fn read(&self, serialized: &[u8]) -> ServiceResult<Manifest> {
        Self::from_bytes(serialized)
    }
}

/// Takes no options; any bag is accepted.
#[derive(Debug, Deserialize)]
pub struct V2Options {}

/// Connector producing [`V2Manifests`].
#[derive(Clone, Copy, Debug, Default)]
pub struct V2Connector;

#[async_trait]
impl Connector for V2Connector {
    type Options = V2Options;
    type Service = Arc<dyn ManifestService>;

    fn name(&self) -> &str {
        V2_CONNECTOR
    }

    fn options_schema(&self) -> OptionsSchema {
        OptionsSchema::new(V2_CONNECTOR)
    }

    async fn init(&self, _options: Validated<V2Options>) -> ConfigResult<Self::Service> {
        Ok(Arc::new(V2Manifests::new()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use epm_config::{ServiceConnector, ServiceKind};
    use epm_types::{Links, Meta};

    fn manifest() -> Manifest {
        let mut m = Manifest::new("owned", "1.0.0");
        m.sources.insert("./Owned.sol".into(), "contract Owned {}".into());
        m.meta = Some(Meta {
            license: Some("MIT".into()),
            links: Some(Links {
                website: Some("https://example.com".into()),
                ..Links::default()
            }),
            ..Meta::default()
        });
        m
    }

    #[tokio::test]
    async fn write_is_canonical() {
        let text = V2Manifests.write(&manifest()).await.unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("null"));
        let keys: Vec<String> = serde_json::from_str::<serde_json::Map<String, Value>>(&text)
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            ["contract_types", "manifest_version", "meta", "package_name", "sources", "version"]
        );
        assert!(text.starts_with(r#"{"contract_types":{},"manifest_version":"2","meta":{"license":"MIT""#));
    }

    #[tokio::test]
    async fn read_tolerates_whitespace() {
        let pretty = serde_json::to_string_pretty(&manifest()).unwrap();
        let parsed = V2Manifests.read(pretty.as_bytes()).await.unwrap();
        assert_eq!(parsed, manifest());
    }

    #[tokio::test]
    async fn equal_manifests_serialize_identically() {
        let a = V2Manifests.write(&manifest()).await.unwrap();
        let b = V2Manifests.write(&manifest().clone()).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn rejects_other_versions() {
        let mut m = manifest();
        m.manifest_version = "3".into();
        assert!(matches!(
            V2Manifests.write(&m).await,
            Err(ServiceError::Unsupported(_))
        ));

        let v3 = json!({"manifest_version": "3", "package_name": "owned", "version": "1"});
        assert!(matches!(
            V2Manifests.read(v3.to_string().as_bytes()).await,
            Err(ServiceError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn garbage_is_decode_error() {
        assert!(matches!(
            V2Manifests.read(b"not json").await,
            Err(ServiceError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn connector_ignores_foreign_options() {
        let options = json!({"ipfs": {"host": "localhost"}});
        let service = V2Connector.connect_service(&options).await.unwrap();
        assert_eq!(service.kind(), ServiceKind::Manifests);
        assert_eq!(service.as_manifests().unwrap().manifest_version(), "2");
    }
}
