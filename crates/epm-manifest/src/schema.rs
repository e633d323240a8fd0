use jsonschema::Validator;
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

const V2_SCHEMA: &str = include_str!("../schema/v2.json");

/// JSON-schema check for serialized manifests.
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Validator for the embedded version 2 manifest schema.
    pub fn v2() -> PipelineResult<Self> {
        let schema: Value = serde_json::from_str(V2_SCHEMA)
            .map_err(|e| PipelineError::Schema(format!("embedded schema: {e}")))?;
        Self::from_schema(&schema)
    }

    pub fn from_schema(schema: &Value) -> PipelineResult<Self> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| PipelineError::Schema(format!("invalid schema: {e}")))?;
        Ok(Self { validator })
    }

    /// Validate a serialized manifest, reporting every error at once.
    pub fn validate(&self, serialized: &str) -> PipelineResult<()> {
        let instance: Value = serde_json::from_str(serialized)
            .map_err(|e| PipelineError::Serialization(e.to_string()))?;
        self.validate_value(&instance)
    }

    pub fn validate_value(&self, instance: &Value) -> PipelineResult<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Schema(errors.join("; ")))
        }
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal() -> Value {
        json!({
            "manifest_version": "2",
            "package_name": "owned",
            "version": "1.0.0",
            "sources": {"./Owned.sol": "contract Owned {}"},
            "contract_types": {
                "Owned": {
                    "contract_name": "Owned",
                    "abi": [],
                    "deployment_bytecode": {
                        "bytecode": "0x6080",
                        "link_references": [{"name": "Lib", "length": 20, "offsets": [1]}]
                    },
                    "compiler": {"name": "solc", "version": "0.5.8", "settings": {"optimize": true}}
                }
            }
        })
    }

    #[test]
    fn accepts_valid_manifest() {
        let validator = SchemaValidator::v2().unwrap();
        validator.validate(&minimal().to_string()).unwrap();
    }

    #[test]
    fn aggregates_every_error() {
        let validator = SchemaValidator::v2().unwrap();
        let mut manifest = minimal();
        manifest["manifest_version"] = json!("3");
        manifest["package_name"] = json!("Bad Name");
        let err = validator.validate(&manifest.to_string()).unwrap_err();
        let PipelineError::Schema(text) = err else {
            panic!("expected schema error");
        };
        assert!(text.contains("/manifest_version"));
        assert!(text.contains("/package_name"));
        assert!(text.contains("; "));
    }

    #[test]
    fn missing_required_field() {
        let validator = SchemaValidator::v2().unwrap();
        let err = validator
            .validate(r#"{"manifest_version":"2","package_name":"owned"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn non_json_is_serialization_error() {
        let validator = SchemaValidator::v2().unwrap();
        assert!(matches!(
            validator.validate("{"),
            Err(PipelineError::Serialization(_))
        ));
    }
}
