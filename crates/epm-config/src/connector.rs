use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigResult;
use crate::key::ServiceKind;
use crate::options::{OptionsSchema, Validated};
use crate::service::{IntoService, Service};

/// Validated, asynchronous construction of one live service.
///
/// Callers only ever use [`connect`](Connector::connect). It checks the raw
/// option bag against [`options_schema`](Connector::options_schema),
/// reporting every violation, and only then hands the typed options to
/// [`init`](Connector::init). Because `init` takes [`Validated`] options it
/// can never observe unvalidated data.
///
/// The option bag is shared by every connector of a session; each connector
/// reads only the fields its schema names.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Typed options, deserialized from the bag after validation.
    type Options: DeserializeOwned + Send;
    /// The service this connector produces.
    type Service: IntoService + Send;

    /// Name used in logs and error messages (e.g. `ethpm/storage/ipfs`).
    fn name(&self) -> &str;

    /// The option shape this connector accepts.
    fn options_schema(&self) -> OptionsSchema;

    /// Perform the actual connection. Only reachable through `connect`.
    async fn init(&self, options: Validated<Self::Options>) -> ConfigResult<Self::Service>;

    /// Validate `raw`, then initialize the service.
    async fn connect(&self, raw: &Value) -> ConfigResult<Self::Service> {
        let options = self.options_schema().check::<Self::Options>(raw)?;
        debug!(connector = self.name(), "options validated");
        self.init(options).await
    }
}

/// Object-safe view of a [`Connector`], as stored by the session builder.
#[async_trait]
pub trait ServiceConnector: Send + Sync {
    fn connector_name(&self) -> &str;

    /// The family of service `connect_service` will produce.
    fn service_kind(&self) -> ServiceKind;

    async fn connect_service(&self, raw: &Value) -> ConfigResult<Service>;
}

#[async_trait]
impl<C> ServiceConnector for C
where
    C: Connector,
{
    fn connector_name(&self) -> &str {
        Connector::name(self)
    }

    fn service_kind(&self) -> ServiceKind {
        <C::Service as IntoService>::KIND
    }

    async fn connect_service(&self, raw: &Value) -> ConfigResult<Service> {
        let service = Connector::connect(self, raw).await?;
        Ok(service.into_service())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::error::{ConfigError, ServiceError};
    use crate::service::{CustomService, RegistryService};

    #[derive(Deserialize)]
    struct EndpointOptions {
        endpoint: Endpoint,
    }

    #[derive(Deserialize)]
    struct Endpoint {
        url: String,
    }

    /// Counts how often `init` runs.
    struct CountingConnector {
        inits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Options = EndpointOptions;
        type Service = CustomService;

        fn name(&self) -> &str {
            "test/counting"
        }

        fn options_schema(&self) -> OptionsSchema {
            OptionsSchema::new("test/counting").with_schema(json!({
                "type": "object",
                "required": ["endpoint"],
                "properties": {
                    "endpoint": {
                        "type": "object",
                        "required": ["url", "token"],
                        "properties": {
                            "url": {"type": "string", "format": "uri"},
                            "token": {"type": "string", "minLength": 1}
                        }
                    }
                }
            }))
        }

        async fn init(&self, options: Validated<EndpointOptions>) -> ConfigResult<CustomService> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            Ok(CustomService::new(options.into_inner().endpoint.url))
        }
    }

    struct BrokenRegistry;

    #[async_trait]
    impl Connector for BrokenRegistry {
        type Options = Value;
        type Service = Arc<dyn RegistryService>;

        fn name(&self) -> &str {
            "test/broken"
        }

        fn options_schema(&self) -> OptionsSchema {
            OptionsSchema::new("test/broken")
        }

        async fn init(&self, _options: Validated<Value>) -> ConfigResult<Self::Service> {
            Err(ConfigError::init(
                "test/broken",
                ServiceError::Transport("connection refused".into()),
            ))
        }
    }

    #[tokio::test]
    async fn missing_field_never_reaches_init() {
        let inits = Arc::new(AtomicUsize::new(0));
        let connector = CountingConnector {
            inits: Arc::clone(&inits),
        };

        let err = connector
            .connect(&json!({"endpoint": {"url": "http://localhost"}}))
            .await
            .err()
            .unwrap();
        match err {
            ConfigError::Validation(v) => assert!(v.mentions("endpoint.token")),
            other => panic!("expected validation error, got {other}"),
        }
        assert_eq!(inits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_violations_reported_together() {
        let connector = CountingConnector {
            inits: Arc::new(AtomicUsize::new(0)),
        };
        let err = connector
            .connect(&json!({"endpoint": {"url": "nope"}}))
            .await
            .err()
            .unwrap();
        let ConfigError::Validation(v) = err else {
            panic!("expected validation error");
        };
        assert_eq!(v.violations.len(), 2);
    }

    #[tokio::test]
    async fn valid_options_reach_init_once() {
        let inits = Arc::new(AtomicUsize::new(0));
        let connector = CountingConnector {
            inits: Arc::clone(&inits),
        };
        let service = connector
            .connect(&json!({"endpoint": {"url": "http://localhost", "token": "t"}}))
            .await
            .unwrap();
        assert_eq!(service.downcast_ref::<String>().unwrap(), "http://localhost");
        assert_eq!(inits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn erased_connector_reports_kind_and_errors() {
        let erased: Box<dyn ServiceConnector> = Box::new(BrokenRegistry);
        assert_eq!(erased.service_kind(), ServiceKind::Registries);
        assert_eq!(erased.connector_name(), "test/broken");
        let err = erased.connect_service(&Value::Null).await.unwrap_err();
        assert!(matches!(err, ConfigError::Init { .. }));
    }

    #[tokio::test]
    async fn erased_connector_wraps_service() {
        let erased: Box<dyn ServiceConnector> = Box::new(CountingConnector {
            inits: Arc::new(AtomicUsize::new(0)),
        });
        let service = erased
            .connect_service(&json!({"endpoint": {"url": "http://x", "token": "t"}}))
            .await
            .unwrap();
        assert_eq!(service.kind(), ServiceKind::Custom);
    }
}
