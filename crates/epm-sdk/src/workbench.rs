use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use epm_config::ServiceKey;
use epm_crypto::{ContentHasher, SINGLE_BLOCK_LIMIT};
use epm_manifest::{
    assemble_manifest, extract_contract_types, extract_sources, CompilationEvent, PackageInput,
    SchemaValidator,
};
use epm_session::{Builder, Session, SessionError};
use epm_types::{ContentUri, ContractTypes, Sources, StatusEvent};

use crate::config::{EpmConfig, DEFAULT_IMPORT_ROOT};
use crate::error::SdkResult;
use crate::files::FileNamespace;
use crate::import::PendingSource;
use crate::status::StatusSink;

/// Where published manifests can be browsed.
pub const EXPLORER_BASE: &str = "http://explorer.ethpm.com/manifest/";

/// Explorer page for a published manifest.
pub fn explorer_link(uri: &ContentUri) -> String {
    format!("{EXPLORER_BASE}{}", uri.content_id())
}

/// A manifest that was serialized and stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublishedManifest {
    pub package_name: String,
    /// Canonical serialized manifest, exactly as stored.
    pub manifest: String,
    pub uri: ContentUri,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) contract_types: ContractTypes,
    pub(crate) sources: Sources,
    pub(crate) published: BTreeMap<String, PublishedManifest>,
    pub(crate) pending: BTreeMap<String, PendingSource>,
}

/// Host-facing entry point: ingests compilations, publishes manifests and
/// imports packages through a connected [`Session`].
///
/// Collaborators (file tree and status sink) are injected. Every publish or
/// import is one failure boundary: the first error aborts it and is emitted
/// once as a `failed` status. Steps already performed are not undone.
pub struct Workbench {
    session: Session,
    pub(crate) files: Arc<dyn FileNamespace>,
    pub(crate) sink: Arc<dyn StatusSink>,
    schema: SchemaValidator,
    pub(crate) import_root: String,
    pub(crate) state: RwLock<State>,
}

impl Workbench {
    pub fn new(
        session: Session,
        files: Arc<dyn FileNamespace>,
        sink: Arc<dyn StatusSink>,
    ) -> SdkResult<Self> {
        Ok(Self {
            session,
            files,
            sink,
            schema: SchemaValidator::v2()?,
            import_root: DEFAULT_IMPORT_ROOT.to_string(),
            state: RwLock::new(State::default()),
        })
    }

    /// Build a session from `config` and wrap it.
    pub async fn connect(
        config: &EpmConfig,
        files: Arc<dyn FileNamespace>,
        sink: Arc<dyn StatusSink>,
    ) -> SdkResult<Self> {
        let session = Builder::new(config.raw_config())?
            .connect(&config.connect_options()?)
            .await?;
        Ok(Self::new(session, files, sink)?.with_import_root(config.import_root.clone()))
    }

    pub fn with_import_root(mut self, root: impl Into<String>) -> Self {
        self.import_root = root.into().trim_end_matches('/').to_string();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn import_root(&self) -> &str {
        &self.import_root
    }

    // ---- Compilation ----

    /// Take in a finished compilation.
    ///
    /// An event without a result changes nothing. Otherwise the contract
    /// types and sources of the previous compilation are replaced, not
    /// merged.
    pub fn on_compilation_finished(&self, event: CompilationEvent) -> SdkResult<()> {
        let Some(result) = event.result else {
            debug!(file = %event.file_name, "compilation without output ignored");
            return Ok(());
        };

        let contract_types = match extract_contract_types(&result) {
            Ok(types) => types,
            Err(e) => {
                self.sink.emit(StatusEvent::failed(e.to_string()));
                return Err(e.into());
            }
        };
        let sources = extract_sources(&event.sources);
        debug!(
            file = %event.file_name,
            compiler = %event.compiler_version,
            contract_types = contract_types.len(),
            sources = sources.len(),
            "compilation ingested"
        );

        {
            let mut state = self.state.write().expect("lock poisoned");
            state.contract_types = contract_types;
            state.sources = sources;
        }
        self.sink.emit(StatusEvent::compiled());
        Ok(())
    }

    /// Contract types of the latest compilation.
    pub fn contract_types(&self) -> ContractTypes {
        self.state.read().expect("lock poisoned").contract_types.clone()
    }

    pub fn sources(&self) -> Sources {
        self.state.read().expect("lock poisoned").sources.clone()
    }

    // ---- Publishing ----

    /// Assemble, serialize, validate and store a manifest for `input`.
    ///
    /// A later publish under the same package name replaces the recorded
    /// entry.
    pub async fn generate_manifest(&self, input: &PackageInput) -> SdkResult<PublishedManifest> {
        match self.publish(input).await {
            Ok(published) => Ok(published),
            Err(e) => {
                warn!(package = %input.name, error = %e, "manifest generation failed");
                self.sink.emit(StatusEvent::failed(e.to_string()));
                Err(e)
            }
        }
    }

    async fn publish(&self, input: &PackageInput) -> SdkResult<PublishedManifest> {
        let manifest = {
            let state = self.state.read().expect("lock poisoned");
            assemble_manifest(input, &state.sources, &state.contract_types)?
        };

        let manifests = self.session.manifests()?;
        let storage = self.session.storage()?;

        let serialized = manifests
            .write(&manifest)
            .await
            .map_err(|e| SessionError::service(ServiceKey::Manifests, e))?;
        self.schema.validate(&serialized)?;

        let payload = Bytes::from(serialized.clone());
        let uri = storage
            .write(payload.clone())
            .await
            .map_err(|e| SessionError::service(ServiceKey::Storage, e))?;
        if payload.len() <= SINGLE_BLOCK_LIMIT && !ContentHasher::verify(&payload, uri.content_id())
        {
            warn!(uri = %uri, backend = storage.backend(), "stored id differs from local hash");
        }

        self.sink.emit(StatusEvent::generating());

        let published = PublishedManifest {
            package_name: manifest.package_name.clone(),
            manifest: serialized,
            uri,
            published_at: Utc::now(),
        };
        self.state
            .write()
            .expect("lock poisoned")
            .published
            .insert(published.package_name.clone(), published.clone());

        info!(package = %published.package_name, uri = %uri, "manifest published");
        Ok(published)
    }

    pub fn published(&self, package_name: &str) -> Option<PublishedManifest> {
        self.state
            .read()
            .expect("lock poisoned")
            .published
            .get(package_name)
            .cloned()
    }

    /// Names of every package published through this workbench, sorted.
    pub fn published_packages(&self) -> Vec<String> {
        self.state
            .read()
            .expect("lock poisoned")
            .published
            .keys()
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("session", &self.session)
            .field("import_root", &self.import_root)
            .finish_non_exhaustive()
    }
}
