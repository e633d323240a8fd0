use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The manifest format version produced and accepted by this crate.
pub const MANIFEST_VERSION: &str = "2";

/// Byte length of every link reference (an Ethereum address).
pub const LINK_REFERENCE_LENGTH: usize = 20;

/// Source path (`./contracts/Foo.sol`) to source text.
pub type Sources = BTreeMap<String, String>;

/// Contract name to contract type.
pub type ContractTypes = BTreeMap<String, ContractType>;

/// Blockchain URI to alias to deployment.
pub type Deployments = BTreeMap<String, BTreeMap<String, Deployment>>;

/// A version 2 package manifest.
///
/// Optional fields are omitted from the serialized form when absent, never
/// written as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub package_name: String,
    pub manifest_version: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub sources: Sources,
    #[serde(default)]
    pub contract_types: ContractTypes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deployments: Deployments,
}

impl Manifest {
    /// An empty manifest for the given package.
    pub fn new(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            manifest_version: MANIFEST_VERSION.to_string(),
            version: version.into(),
            meta: None,
            sources: Sources::new(),
            contract_types: ContractTypes::new(),
            deployments: Deployments::new(),
        }
    }
}

/// Package metadata. Every field is optional and omitted when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl Meta {
    /// `true` if no field is present.
    pub fn is_empty(&self) -> bool {
        self.authors.is_none()
            && self.license.is_none()
            && self.description.is_none()
            && self.keywords.is_none()
            && self.links.is_none()
    }

    /// `None` when empty, so the whole block is dropped from the manifest.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Documentation, repository and website links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Links {
    pub fn is_empty(&self) -> bool {
        self.documentation.is_none() && self.repository.is_none() && self.website.is_none()
    }

    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// One compiled contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractType {
    pub contract_name: String,
    #[serde(default)]
    pub abi: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<CompilerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_bytecode: Option<BytecodeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_bytecode: Option<BytecodeRecord>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub natspec: serde_json::Map<String, Value>,
}

/// Compiler identity and the settings that affect output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub settings: CompilerSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    #[serde(default)]
    pub optimize: bool,
}

/// Normalized bytecode plus the regions a linker must patch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytecodeRecord {
    /// `0x`-prefixed hex; every link-reference region is zero-filled.
    pub bytecode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link_references: Vec<LinkReference>,
}

/// A library placeholder in bytecode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReference {
    pub name: String,
    pub length: usize,
    /// Byte offsets into the bytecode, in compiler order.
    pub offsets: Vec<usize>,
}

impl LinkReference {
    pub fn new(name: impl Into<String>, offsets: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            length: LINK_REFERENCE_LENGTH,
            offsets,
        }
    }
}

/// A deployed instance of a contract type on some chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub contract_type: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_manifest_is_version_2() {
        let m = Manifest::new("owned", "1.0.0");
        assert_eq!(m.manifest_version, MANIFEST_VERSION);
        assert!(m.meta.is_none());
    }

    #[test]
    fn absent_meta_is_omitted() {
        let m = Manifest::new("owned", "1.0.0");
        let value = serde_json::to_value(&m).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("meta"));
        assert!(!obj.contains_key("deployments"));
        assert!(obj.contains_key("sources"));
    }

    #[test]
    fn all_none_meta_collapses() {
        let meta = Meta {
            links: Links::default().non_empty(),
            ..Meta::default()
        };
        assert!(meta.non_empty().is_none());
    }

    #[test]
    fn meta_omits_null_fields() {
        let meta = Meta {
            license: Some("MIT".into()),
            ..Meta::default()
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value, serde_json::json!({"license": "MIT"}));
    }

    #[test]
    fn link_reference_length_is_fixed() {
        let r = LinkReference::new("Lib", vec![5]);
        assert_eq!(r.length, 20);
    }

    #[test]
    fn empty_link_references_are_omitted() {
        let record = BytecodeRecord {
            bytecode: "0x6000".into(),
            link_references: vec![],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, serde_json::json!({"bytecode": "0x6000"}));
    }

    #[test]
    fn reads_manifest_without_optional_sections() {
        let json = r#"{"manifest_version":"2","package_name":"owned","version":"1.0.0"}"#;
        let m: Manifest = serde_json::from_str(json).unwrap();
        assert!(m.sources.is_empty());
        assert!(m.contract_types.is_empty());
        assert!(m.deployments.is_empty());
    }
}
