//! Solidity standard-JSON compiler output, as delivered with a compilation
//! event.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! compiler output is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compiler output: file name to contract name to compiled contract.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationResult {
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, CompiledContract>>,
}

/// One contract as emitted by solc.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledContract {
    #[serde(default)]
    pub abi: Vec<Value>,
    /// Compiler metadata, itself a JSON document encoded as a string.
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub userdoc: Option<Value>,
    #[serde(default)]
    pub devdoc: Option<Value>,
    #[serde(default)]
    pub evm: Evm,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evm {
    #[serde(default)]
    pub bytecode: Option<EvmBytecode>,
    #[serde(default)]
    pub deployed_bytecode: Option<EvmBytecode>,
}

/// Unlinked bytecode plus the library placeholders inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmBytecode {
    /// Hex without `0x`; may contain `__$...$__` placeholders.
    #[serde(default)]
    pub object: String,
    /// Source file to library name to placeholder positions.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<LinkOffset>>>,
}

impl EvmBytecode {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            link_references: BTreeMap::new(),
        }
    }

    /// Add a placeholder for `library` (declared in `file`) at byte `start`.
    pub fn with_link(mut self, file: &str, library: &str, start: usize) -> Self {
        self.link_references
            .entry(file.to_string())
            .or_default()
            .entry(library.to_string())
            .or_default()
            .push(LinkOffset { start, length: 20 });
        self
    }
}

/// Placeholder position in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOffset {
    pub start: usize,
    pub length: usize,
}

/// Sources handed to the compiler, keyed by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationFileSources {
    #[serde(default)]
    pub sources: BTreeMap<String, SourceFile>,
    /// File the compilation was started from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CompilationFileSources {
    pub fn with_source(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.sources.insert(
            path.into(),
            SourceFile {
                content: content.into(),
            },
        );
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub content: String,
}

/// A finished compilation as reported by the host.
///
/// `result` is `None` when compilation produced no output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompilationEvent {
    pub file_name: String,
    pub sources: CompilationFileSources,
    pub compiler_version: String,
    pub result: Option<CompilationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_solc_output() {
        let json = r#"{
            "contracts": {
                "contracts/Owned.sol": {
                    "Owned": {
                        "abi": [{"type": "constructor", "inputs": []}],
                        "metadata": "{\"compiler\":{\"version\":\"0.5.8\"}}",
                        "evm": {
                            "bytecode": {
                                "object": "6080",
                                "linkReferences": {
                                    "lib.sol": {"Lib": [{"start": 1, "length": 20}]}
                                }
                            },
                            "deployedBytecode": {"object": "6081", "linkReferences": {}}
                        }
                    }
                }
            },
            "sources": {"contracts/Owned.sol": {"id": 0}}
        }"#;
        let result: CompilationResult = serde_json::from_str(json).unwrap();
        let owned = &result.contracts["contracts/Owned.sol"]["Owned"];
        let bytecode = owned.evm.bytecode.as_ref().unwrap();
        assert_eq!(bytecode.object, "6080");
        assert_eq!(bytecode.link_references["lib.sol"]["Lib"][0].start, 1);
        assert_eq!(owned.evm.deployed_bytecode.as_ref().unwrap().object, "6081");
        assert!(owned.userdoc.is_none());
        assert_eq!(result.contracts["contracts/Owned.sol"].len(), 1);
    }

    #[test]
    fn reads_solc_input_sources() {
        let json = r#"{
            "language": "Solidity",
            "sources": {"Owned.sol": {"content": "contract Owned {}"}},
            "settings": {}
        }"#;
        let sources: CompilationFileSources = serde_json::from_str(json).unwrap();
        assert_eq!(sources.sources["Owned.sol"].content, "contract Owned {}");
    }
}
