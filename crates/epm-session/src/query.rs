use std::sync::Arc;

use tracing::debug;

use epm_config::ServiceKey;
use epm_types::{ContentUri, ContractTypes, Deployments, Manifest, PackageDescriptor, Sources};

use crate::error::{SessionError, SessionResult};
use crate::session::Workspace;

/// Read-only view of one package through a session's services.
///
/// Holds a shared reference to the workspace; dropping the session does not
/// invalidate a query.
#[derive(Clone, Debug)]
pub struct Query {
    package: PackageDescriptor,
    workspace: Arc<Workspace>,
}

impl Query {
    pub(crate) fn new(package: PackageDescriptor, workspace: Arc<Workspace>) -> Self {
        Self { package, workspace }
    }

    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    pub fn uri(&self) -> SessionResult<&ContentUri> {
        self.package.uri.as_ref().ok_or_else(|| SessionError::MissingUri {
            package: self.package.name.to_string(),
        })
    }

    /// Fetch and decode the package's manifest. Needs `storage` and
    /// `manifests`.
    pub async fn manifest(&self) -> SessionResult<Manifest> {
        let storage = self.workspace.storage()?;
        let manifests = self.workspace.manifests()?;
        let uri = self.uri()?;

        let raw = storage
            .read(uri)
            .await
            .map_err(|e| SessionError::service(ServiceKey::Storage, e))?;
        let manifest = manifests
            .read(&raw)
            .await
            .map_err(|e| SessionError::service(ServiceKey::Manifests, e))?;
        debug!(package = %self.package.name, uri = %uri, "fetched manifest");
        Ok(manifest)
    }

    pub async fn sources(&self) -> SessionResult<Sources> {
        Ok(self.manifest().await?.sources)
    }

    pub async fn contract_types(&self) -> SessionResult<ContractTypes> {
        Ok(self.manifest().await?.contract_types)
    }

    pub async fn deployments(&self) -> SessionResult<Deployments> {
        Ok(self.manifest().await?.deployments)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bytes::Bytes;
    use epm_config::{ManifestService, Service, StorageService};
    use epm_manifest::V2Manifests;
    use epm_storage::InMemoryStorage;
    use epm_types::PackageName;

    use super::*;
    use crate::session::Session;

    async fn published() -> (Session, ContentUri) {
        let storage = Arc::new(InMemoryStorage::new());
        let mut manifest = Manifest::new("owned", "1.0.0");
        manifest
            .sources
            .insert("./Owned.sol".into(), "contract Owned {}".into());
        let text = V2Manifests.write(&manifest).await.unwrap();
        let uri = storage.write(Bytes::from(text)).await.unwrap();

        let services = BTreeMap::from([
            (ServiceKey::Manifests, Service::Manifests(Arc::new(V2Manifests::new()))),
            (ServiceKey::Storage, Service::Storage(storage)),
        ]);
        (Session::new(Workspace::new(services)), uri)
    }

    fn owned() -> PackageDescriptor {
        PackageDescriptor::new(PackageName::new("owned").unwrap(), "1.0.0")
    }

    #[tokio::test]
    async fn reads_manifest_through_services() {
        let (session, uri) = published().await;
        let query = session.query(owned().with_uri(uri));
        let sources = query.sources().await.unwrap();
        assert_eq!(sources["./Owned.sol"], "contract Owned {}");
        assert!(query.contract_types().await.unwrap().is_empty());
        assert!(query.deployments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn query_outlives_session() {
        let (session, uri) = published().await;
        let query = session.query(owned().with_uri(uri));
        drop(session);
        assert_eq!(query.manifest().await.unwrap().package_name, "owned");
    }

    #[tokio::test]
    async fn missing_uri() {
        let (session, _) = published().await;
        let err = session.query(owned()).manifest().await.unwrap_err();
        assert!(matches!(err, SessionError::MissingUri { .. }));
    }

    #[tokio::test]
    async fn needs_storage() {
        let services = BTreeMap::from([(
            ServiceKey::Manifests,
            Service::Manifests(Arc::new(V2Manifests::new()) as Arc<dyn ManifestService>),
        )]);
        let session = Session::new(Workspace::new(services));
        let (_, uri) = published().await;
        let err = session.query(owned().with_uri(uri)).manifest().await.unwrap_err();
        assert!(matches!(err, SessionError::CapabilityAbsent(ServiceKey::Storage)));
    }

    #[tokio::test]
    async fn unknown_uri_is_service_error() {
        let (session, _) = published().await;
        let uri = InMemoryStorage::new().write(Bytes::from_static(b"elsewhere")).await.unwrap();
        let err = session.query(owned().with_uri(uri)).manifest().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Service {
                key: ServiceKey::Storage,
                ..
            }
        ));
    }
}
