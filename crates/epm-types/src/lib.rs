//! Foundation types for epm.
//!
//! This crate provides the identifiers and data model shared by every other
//! epm crate: content-addressed identifiers, package descriptors, and the
//! structure of a version 2 package manifest.
//!
//! # Key Types
//!
//! - [`ContentId`] -- sha2-256 multihash of a stored payload (CIDv0)
//! - [`ContentUri`] -- `ipfs://` URI pointing at stored content
//! - [`PackageName`] -- validated package name
//! - [`PackageDescriptor`] -- name, version and optional content URI of a package
//! - [`Manifest`] -- the v2 package manifest
//! - [`ChainId`] -- blockchain identity derived from a `blockchain://` URI
//! - [`StatusEvent`] -- host-facing status notification

pub mod chain;
pub mod content;
pub mod error;
pub mod manifest;
pub mod package;
pub mod status;
pub mod uri;

pub use chain::ChainId;
pub use content::ContentId;
pub use error::TypeError;
pub use manifest::{
    BytecodeRecord, CompilerInfo, CompilerSettings, ContractType, ContractTypes, Deployment,
    Deployments, LinkReference, Links, Manifest, Meta, Sources, LINK_REFERENCE_LENGTH,
    MANIFEST_VERSION,
};
pub use package::{validate_package_name, PackageDescriptor, PackageName, PACKAGE_NAME_PATTERN};
pub use status::{StatusEvent, StatusKind};
pub use uri::{ContentUri, IPFS_SCHEME};
