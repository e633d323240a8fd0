use epm_types::Sources;

use crate::compiler::CompilationFileSources;

/// Manifest source map from compiler input: every path relative (`./`).
pub fn extract_sources(input: &CompilationFileSources) -> Sources {
    input
        .sources
        .iter()
        .map(|(path, file)| (relative_path(path), file.content.clone()))
        .collect()
}

fn relative_path(path: &str) -> String {
    if path.starts_with("./") {
        path.to_string()
    } else {
        format!("./{path}")
    }
}
