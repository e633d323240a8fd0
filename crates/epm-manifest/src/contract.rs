use serde_json::{Map, Value};
use tracing::{debug, warn};

use epm_types::{CompilerInfo, CompilerSettings, ContractType, ContractTypes};

use crate::bytecode::normalize_bytecode;
use crate::compiler::{CompilationResult, CompiledContract};
use crate::error::{PipelineError, PipelineResult};

/// Name recorded for every contract compiled by solc.
pub const SOLC: &str = "solc";

/// Build one contract type per compiled contract, keyed by contract name.
///
/// A name defined in several files keeps the last one in file order.
pub fn extract_contract_types(result: &CompilationResult) -> PipelineResult<ContractTypes> {
    let mut types = ContractTypes::new();
    for (file, contracts) in &result.contracts {
        for (name, compiled) in contracts {
            let contract_type = extract_contract_type(name, compiled)?;
            if types.insert(name.clone(), contract_type).is_some() {
                warn!(contract = %name, file = %file, "contract name defined in several files");
            }
        }
    }
    debug!(count = types.len(), "extracted contract types");
    Ok(types)
}

fn extract_contract_type(name: &str, compiled: &CompiledContract) -> PipelineResult<ContractType> {
    let deployment_bytecode = compiled
        .evm
        .bytecode
        .as_ref()
        .map(normalize_bytecode)
        .transpose()?;
    let runtime_bytecode = compiled
        .evm
        .deployed_bytecode
        .as_ref()
        .map(normalize_bytecode)
        .transpose()?;

    Ok(ContractType {
        contract_name: name.to_string(),
        abi: compiled.abi.clone(),
        compiler: compiler_info(name, &compiled.metadata)?,
        deployment_bytecode,
        runtime_bytecode,
        natspec: merge_natspec(compiled.userdoc.as_ref(), compiled.devdoc.as_ref()),
    })
}

/// Read compiler version and optimizer flag from solc's metadata string.
/// Empty metadata yields no compiler entry.
fn compiler_info(contract: &str, metadata: &str) -> PipelineResult<Option<CompilerInfo>> {
    if metadata.trim().is_empty() {
        return Ok(None);
    }
    let malformed = |reason: String| PipelineError::Metadata {
        contract: contract.to_string(),
        reason,
    };
    let parsed: Value = serde_json::from_str(metadata).map_err(|e| malformed(e.to_string()))?;
    let version = parsed
        .pointer("/compiler/version")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing compiler.version".into()))?;
    let optimize = parsed
        .pointer("/settings/optimizer/enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(Some(CompilerInfo {
        name: SOLC.to_string(),
        version: version.to_string(),
        settings: CompilerSettings { optimize },
    }))
}

/// Shallow merge of user and developer docs. Developer keys win.
fn merge_natspec(userdoc: Option<&Value>, devdoc: Option<&Value>) -> Map<String, Value> {
    let mut merged = Map::new();
    for doc in [userdoc, devdoc].into_iter().flatten() {
        if let Value::Object(fields) = doc {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
