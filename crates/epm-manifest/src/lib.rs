//! Manifest pipeline for epm.
//!
//! Turns Solidity compiler output into a canonical, schema-valid version 2
//! package manifest:
//! - [`extract_contract_types`] and [`extract_sources`] read a compilation
//! - [`normalize_bytecode`] zero-fills library placeholders
//! - [`assemble_manifest`] applies the user's package details and selection
//! - [`V2Manifests`] serializes canonically; [`V2Connector`] provides it as a
//!   session service
//! - [`SchemaValidator`] checks the serialized form

pub mod assemble;
pub mod bytecode;
pub mod compiler;
pub mod contract;
pub mod error;
pub mod schema;
pub mod sources;
pub mod v2;

pub use assemble::{assemble_manifest, split_list, PackageInput};
pub use bytecode::normalize_bytecode;
pub use compiler::{
    CompilationEvent, CompilationFileSources, CompilationResult, CompiledContract, Evm,
    EvmBytecode, LinkOffset, SourceFile,
};
pub use contract::{extract_contract_types, SOLC};
pub use error::{PipelineError, PipelineResult};
pub use schema::SchemaValidator;
pub use sources::extract_sources;
pub use v2::{V2Connector, V2Manifests, V2Options, V2_CONNECTOR};
