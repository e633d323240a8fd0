use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use epm_config::ServiceKey;
use epm_crypto::{ContentHasher, SINGLE_BLOCK_LIMIT};
use epm_session::SessionError;
use epm_types::{ChainId, ContentUri, Deployment, Deployments, Manifest, StatusEvent};

use crate::error::{SdkError, SdkResult};
use crate::workbench::Workbench;

/// A manifest source waiting to be written into the file tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PendingSource {
    /// Path as listed in the manifest.
    pub original_path: String,
    /// Free destination path chosen at import time.
    pub new_path: String,
    pub content: String,
}

/// Deployments of one chain, keyed by alias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentGroup {
    pub chain: ChainId,
    /// Every blockchain URI that resolved to this chain.
    pub blockchain_uris: Vec<String>,
    pub deployments: BTreeMap<String, Deployment>,
}

/// Result of importing a manifest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportedPackage {
    pub uri: ContentUri,
    pub manifest: Manifest,
    pub sources: Vec<PendingSource>,
    pub deployments: Vec<DeploymentGroup>,
}

impl ImportedPackage {
    pub fn group(&self, chain: &str) -> Option<&DeploymentGroup> {
        self.deployments
            .iter()
            .find(|g| g.chain.label() == chain || g.chain.genesis == chain)
    }

    /// ABI of the contract type deployed as `alias` on `chain`.
    ///
    /// `chain` is a known chain name or a genesis hash.
    pub fn deployment_abi(&self, chain: &str, alias: &str) -> Option<&[Value]> {
        let deployment = self.group(chain)?.deployments.get(alias)?;
        self.manifest
            .contract_types
            .get(&deployment.contract_type)
            .map(|ty| ty.abi.as_slice())
    }
}

/// Group deployments by chain, then alias. Keys that are not blockchain
/// URIs are skipped.
pub fn group_deployments(deployments: &Deployments) -> Vec<DeploymentGroup> {
    let mut groups: BTreeMap<ChainId, DeploymentGroup> = BTreeMap::new();
    for (blockchain_uri, instances) in deployments {
        let chain = match ChainId::from_uri(blockchain_uri) {
            Ok(chain) => chain,
            Err(e) => {
                warn!(error = %e, "skipping deployments");
                continue;
            }
        };
        let group = groups
            .entry(chain.clone())
            .or_insert_with(|| DeploymentGroup {
                chain,
                blockchain_uris: Vec::new(),
                deployments: BTreeMap::new(),
            });
        group.blockchain_uris.push(blockchain_uri.clone());
        for (alias, deployment) in instances {
            if group.deployments.insert(alias.clone(), deployment.clone()).is_some() {
                warn!(chain = %group.chain, alias = %alias, "alias deployed in several blocks");
            }
        }
    }
    groups.into_values().collect()
}

impl Workbench {
    // ---- Import ----

    /// Fetch and decode the manifest at `uri` and stage its sources.
    ///
    /// Replaces any sources staged by a previous import.
    pub async fn import_manifest(&self, uri: &ContentUri) -> SdkResult<ImportedPackage> {
        match self.fetch(uri).await {
            Ok(package) => Ok(package),
            Err(e) => {
                warn!(uri = %uri, error = %e, "import failed");
                self.sink.emit(StatusEvent::failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn fetch(&self, uri: &ContentUri) -> SdkResult<ImportedPackage> {
        let storage = self.session().storage()?;
        let manifests = self.session().manifests()?;

        let raw = storage
            .read(uri)
            .await
            .map_err(|e| SessionError::service(ServiceKey::Storage, e))?;
        if raw.len() <= SINGLE_BLOCK_LIMIT && !ContentHasher::verify(&raw, uri.content_id()) {
            warn!(uri = %uri, "payload does not hash to its content id");
        }
        let manifest = manifests
            .read(&raw)
            .await
            .map_err(|e| SessionError::service(ServiceKey::Manifests, e))?;

        let mut claimed = BTreeSet::new();
        let mut sources = Vec::with_capacity(manifest.sources.len());
        for (original_path, content) in &manifest.sources {
            let new_path = self.free_path(original_path, &claimed).await?;
            claimed.insert(new_path.clone());
            sources.push(PendingSource {
                original_path: original_path.clone(),
                new_path,
                content: content.clone(),
            });
        }

        self.sink.emit(StatusEvent::loading_manifests());
        self.state.write().expect("lock poisoned").pending = sources
            .iter()
            .map(|s| (s.original_path.clone(), s.clone()))
            .collect();

        let deployments = group_deployments(&manifest.deployments);
        info!(
            package = %manifest.package_name,
            uri = %uri,
            sources = sources.len(),
            chains = deployments.len(),
            "manifest imported"
        );
        Ok(ImportedPackage {
            uri: *uri,
            manifest,
            sources,
            deployments,
        })
    }

    /// First free destination for `file_name` under the import root:
    /// `<root>/<name>`, then `<root>/<stem>-1.<ext>`, `<root>/<stem>-2.<ext>`...
    pub async fn process_file_path(&self, file_name: &str) -> SdkResult<String> {
        self.free_path(file_name, &BTreeSet::new()).await
    }

    async fn free_path(&self, file_name: &str, claimed: &BTreeSet<String>) -> SdkResult<String> {
        let path = Path::new(file_name);
        let base = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SdkError::user_input(format!("'{file_name}' is not a file path")))?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(base);
        let ext = path.extension().and_then(|e| e.to_str());

        let mut candidate = format!("{}/{base}", self.import_root);
        let mut n = 1u32;
        while claimed.contains(&candidate) || self.files.get_file(&candidate).await?.is_some() {
            candidate = match ext {
                Some(ext) => format!("{}/{stem}-{n}.{ext}", self.import_root),
                None => format!("{}/{stem}-{n}", self.import_root),
            };
            n += 1;
        }
        debug!(source = %file_name, path = %candidate, "destination chosen");
        Ok(candidate)
    }

    /// Sources staged by the last import, by original path.
    pub fn pending_imports(&self) -> Vec<PendingSource> {
        self.state
            .read()
            .expect("lock poisoned")
            .pending
            .values()
            .cloned()
            .collect()
    }

    /// Write one staged source to its destination and unstage it.
    pub async fn import_source(&self, original_path: &str) -> SdkResult<String> {
        let pending = self
            .state
            .read()
            .expect("lock poisoned")
            .pending
            .get(original_path)
            .cloned()
            .ok_or_else(|| SdkError::NotPending(original_path.to_string()))?;

        self.files.set_file(&pending.new_path, &pending.content).await?;
        self.state
            .write()
            .expect("lock poisoned")
            .pending
            .remove(original_path);
        debug!(source = %original_path, path = %pending.new_path, "source imported");
        Ok(pending.new_path)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use epm_config::StorageService;
    use epm_manifest::V2Manifests;
    use epm_types::{ContractType, StatusKind};
    use serde_json::json;

    use super::*;
    use crate::files::{FileNamespace, InMemoryFiles};
    use crate::workbench::tests::{fixture, fixture_with, Fixture};

    const MAINNET: &str = "blockchain://d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3/block/752820c0ad7abc1200f9ad42c4adc6fbb4bd44b5bed4667990e64565102c1ba6";
    const ROPSTEN: &str = "blockchain://41941023680923e0fe4d74a34bdac8141f2540e3ae90623718e47d66d1ca4a2d/block/30a4ef1a8a8df5e5a6c1d3b5b7f2c8b2a4e8f4a1c5c4f6a8e2d1b0a9f8e7d6c5";

    fn owned_type() -> ContractType {
        ContractType {
            contract_name: "Owned".into(),
            abi: vec![json!({"type": "function", "name": "owner"})],
            compiler: None,
            deployment_bytecode: None,
            runtime_bytecode: None,
            natspec: Default::default(),
        }
    }

    fn deployment(address: &str) -> Deployment {
        Deployment {
            contract_type: "Owned".into(),
            address: address.into(),
            transaction: None,
            block: None,
        }
    }

    fn manifest() -> Manifest {
        let mut m = Manifest::new("owned", "1.0.0");
        m.sources.insert("./Owned.sol".into(), "contract Owned {}".into());
        m.sources.insert("./lib/Owned.sol".into(), "library Owned {}".into());
        m.contract_types.insert("Owned".into(), owned_type());
        m.deployments.insert(
            MAINNET.into(),
            BTreeMap::from([("owned".to_string(), deployment("0x1"))]),
        );
        m.deployments.insert(
            ROPSTEN.into(),
            BTreeMap::from([
                ("owned".to_string(), deployment("0x2")),
                ("backup".to_string(), deployment("0x3")),
            ]),
        );
        m
    }

    async fn store(f: &Fixture, manifest: &Manifest) -> ContentUri {
        let text = V2Manifests::to_canonical(manifest).unwrap();
        f.storage.write(Bytes::from(text)).await.unwrap()
    }

    // -----------------------------------------------------------------------
    // Destination paths
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn free_path_is_kept() {
        let f = fixture();
        assert_eq!(f.bench.process_file_path("contracts/Foo.sol").await.unwrap(), "browser/Foo.sol");
    }

    #[tokio::test]
    async fn colliding_paths_get_suffixes() {
        let f = fixture_with(InMemoryFiles::new().with_file("browser/Foo.sol", "a"));
        assert_eq!(f.bench.process_file_path("Foo.sol").await.unwrap(), "browser/Foo-1.sol");

        f.files.set_file("browser/Foo-1.sol", "b").await.unwrap();
        assert_eq!(f.bench.process_file_path("Foo.sol").await.unwrap(), "browser/Foo-2.sol");
    }

    #[tokio::test]
    async fn suffix_keeps_extension_and_root() {
        let f = fixture_with(
            InMemoryFiles::new()
                .with_file("vendor/token.v2.vy", "")
                .with_file("vendor/README", ""),
        );
        let bench = f.bench.with_import_root("vendor/");
        assert_eq!(bench.process_file_path("token.v2.vy").await.unwrap(), "vendor/token.v2-1.vy");
        assert_eq!(bench.process_file_path("README").await.unwrap(), "vendor/README-1");
    }

    #[tokio::test]
    async fn directory_is_not_a_file_name() {
        let f = fixture();
        let err = f.bench.process_file_path("..").await.unwrap_err();
        assert!(matches!(err, SdkError::UserInput(_)));
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn import_stages_distinct_destinations() {
        let f = fixture_with(InMemoryFiles::new().with_file("browser/Owned.sol", "mine"));
        let uri = store(&f, &manifest()).await;

        let package = f.bench.import_manifest(&uri).await.unwrap();
        assert_eq!(package.manifest.package_name, "owned");
        let paths: Vec<_> = package.sources.iter().map(|s| s.new_path.as_str()).collect();
        assert_eq!(paths, ["browser/Owned-1.sol", "browser/Owned-2.sol"]);
        assert_eq!(f.bench.pending_imports().len(), 2);
        assert_eq!(f.sink.last().unwrap(), StatusEvent::loading_manifests());
        // nothing written until asked
        assert_eq!(f.files.len(), 1);
    }

    #[tokio::test]
    async fn import_source_writes_and_unstages() {
        let f = fixture();
        let uri = store(&f, &manifest()).await;
        f.bench.import_manifest(&uri).await.unwrap();

        let path = f.bench.import_source("./lib/Owned.sol").await.unwrap();
        assert_eq!(path, "browser/Owned-1.sol");
        assert_eq!(
            f.files.get_file(&path).await.unwrap().as_deref(),
            Some("library Owned {}")
        );
        assert_eq!(f.bench.pending_imports().len(), 1);

        let err = f.bench.import_source("./lib/Owned.sol").await.unwrap_err();
        assert!(matches!(err, SdkError::NotPending(_)));
    }

    #[tokio::test]
    async fn new_import_replaces_pending() {
        let f = fixture();
        let first = store(&f, &manifest()).await;
        let mut other = Manifest::new("other", "0.1.0");
        other.sources.insert("./Other.sol".into(), "contract Other {}".into());
        let second = store(&f, &other).await;

        f.bench.import_manifest(&first).await.unwrap();
        f.bench.import_manifest(&second).await.unwrap();
        let pending = f.bench.pending_imports();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].original_path, "./Other.sol");
    }

    #[tokio::test]
    async fn deployments_grouped_by_chain() {
        let f = fixture();
        let uri = store(&f, &manifest()).await;
        let package = f.bench.import_manifest(&uri).await.unwrap();

        let labels: Vec<_> = package.deployments.iter().map(|g| g.chain.label()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains(&"mainnet") && labels.contains(&"ropsten"));
        assert_eq!(package.group("ropsten").unwrap().deployments.len(), 2);
        assert_eq!(package.group("mainnet").unwrap().deployments["owned"].address, "0x1");

        let abi = package.deployment_abi("ropsten", "backup").unwrap();
        assert_eq!(abi[0]["name"], "owner");
        assert!(package.deployment_abi("kovan", "owned").is_none());
        assert!(package.deployment_abi("mainnet", "missing").is_none());
    }

    #[test]
    fn same_chain_uris_merge() {
        let later = MAINNET.replace("752820c0", "852820c0");
        let deployments = BTreeMap::from([
            (MAINNET.to_string(), BTreeMap::from([("a".to_string(), deployment("0x1"))])),
            (later.clone(), BTreeMap::from([("b".to_string(), deployment("0x2"))])),
            ("not a uri".to_string(), BTreeMap::from([("c".to_string(), deployment("0x3"))])),
        ]);
        let groups = group_deployments(&deployments);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].blockchain_uris.len(), 2);
        assert_eq!(groups[0].deployments.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[tokio::test]
    async fn missing_content_reports_failure() {
        let f = fixture();
        let uri = ContentUri::ipfs(ContentHasher::hash(b"never stored"));
        let err = f.bench.import_manifest(&uri).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Session(SessionError::Service {
                key: ServiceKey::Storage,
                ..
            })
        ));
        assert_eq!(f.sink.last().unwrap().kind, StatusKind::Error);
        assert!(f.bench.pending_imports().is_empty());
    }

    #[tokio::test]
    async fn undecodable_manifest_reports_failure() {
        let f = fixture();
        let uri = f.storage.write(Bytes::from_static(b"{\"nope\": 1}")).await.unwrap();
        let err = f.bench.import_manifest(&uri).await.unwrap_err();
        assert!(matches!(
            err,
            SdkError::Session(SessionError::Service {
                key: ServiceKey::Manifests,
                ..
            })
        ));
    }
}
