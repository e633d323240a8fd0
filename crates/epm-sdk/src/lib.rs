//! High-level SDK for epm.
//!
//! The [`Workbench`] is what a host (an IDE plugin, the `epm` CLI) talks to.
//! It takes compiler output, publishes v2 manifests through a connected
//! session and imports published packages back into the host's file tree.
//!
//! The host supplies two collaborators:
//! - a [`FileNamespace`] to check for and write files
//!   ([`InMemoryFiles`], [`LocalFiles`])
//! - a [`StatusSink`] for status notifications
//!   ([`TracingStatusSink`], [`CollectingSink`])
//!
//! ```no_run
//! # async fn run() -> epm_sdk::SdkResult<()> {
//! use std::sync::Arc;
//! use epm_sdk::{EpmConfig, LocalFiles, TracingStatusSink, Workbench};
//! use epm_types::ContentUri;
//!
//! let bench = Workbench::connect(
//!     &EpmConfig::default(),
//!     Arc::new(LocalFiles::new(".")),
//!     Arc::new(TracingStatusSink),
//! )
//! .await?;
//! let uri = ContentUri::parse("ipfs://QmbFMke1KXqnYyBBWxB74N4c5SBnJMVAiMNRcGu6x1AwQH")
//!     .map_err(|e| epm_sdk::SdkError::user_input(e.to_string()))?;
//! let package = bench.import_manifest(&uri).await?;
//! for source in &package.sources {
//!     bench.import_source(&source.original_path).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod import;
pub mod status;
pub mod workbench;

pub use config::{EpmConfig, DEFAULT_IMPORT_ROOT};
pub use error::{SdkError, SdkResult};
pub use files::{FileNamespace, InMemoryFiles, LocalFiles};
pub use import::{group_deployments, DeploymentGroup, ImportedPackage, PendingSource};
pub use status::{CollectingSink, StatusSink, TracingStatusSink};
pub use workbench::{explorer_link, PublishedManifest, Workbench, EXPLORER_BASE};
