use epm_types::{BytecodeRecord, LinkReference, LINK_REFERENCE_LENGTH};

use crate::compiler::EvmBytecode;
use crate::error::{PipelineError, PipelineResult};

/// Convert compiler bytecode into its canonical manifest form.
///
/// The result is `0x`-prefixed and every library placeholder region
/// (`LINK_REFERENCE_LENGTH` bytes at each recorded offset) is zero-filled,
/// so the bytecode is plain hex. Offsets are kept unchanged for a later
/// linker. Link references are flattened across source files in key order.
///
/// Normalizing an already normalized object yields the same record.
pub fn normalize_bytecode(raw: &EvmBytecode) -> PipelineResult<BytecodeRecord> {
    let object = raw.object.strip_prefix("0x").unwrap_or(&raw.object);
    if !object.is_ascii() {
        return Err(PipelineError::Bytecode);
    }

    let mut hex = Vec::with_capacity(object.len() + 2);
    hex.extend_from_slice(b"0x");
    hex.extend_from_slice(object.as_bytes());

    let mut link_references = Vec::new();
    for libraries in raw.link_references.values() {
        for (name, positions) in libraries {
            let offsets: Vec<usize> = positions.iter().map(|p| p.start).collect();
            for &offset in &offsets {
                zero_fill(&mut hex, name, offset)?;
            }
            link_references.push(LinkReference::new(name.clone(), offsets));
        }
    }

    let bytecode = String::from_utf8(hex).map_err(|_| PipelineError::Bytecode)?;
    Ok(BytecodeRecord {
        bytecode,
        link_references,
    })
}

fn zero_fill(hex: &mut [u8], name: &str, offset: usize) -> PipelineResult<()> {
    let start = offset.checked_mul(2).and_then(|o| o.checked_add(2));
    let end = start.and_then(|s| s.checked_add(2 * LINK_REFERENCE_LENGTH));
    match (start, end) {
        (Some(start), Some(end)) if end <= hex.len() => {
            hex[start..end].fill(b'0');
            Ok(())
        }
        _ => Err(PipelineError::LinkReference {
            name: name.to_string(),
            offset,
            len: hex.len() - 2,
        }),
    }
}
