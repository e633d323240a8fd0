use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{SdkError, SdkResult};

/// The host's file tree, addressed by `/`-separated relative paths.
///
/// Existence is whatever `get_file` reports at the time of the call; the
/// tree may change between calls.
#[async_trait]
pub trait FileNamespace: Send + Sync {
    /// Content of `path`, or `None` if no file exists there.
    async fn get_file(&self, path: &str) -> SdkResult<Option<String>>;

    /// Create or overwrite `path`.
    async fn set_file(&self, path: &str, content: &str) -> SdkResult<()>;
}

/// `BTreeMap`-backed namespace for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryFiles {
    files: RwLock<BTreeMap<String, String>>,
}

impl InMemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), content.into());
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.read().expect("lock poisoned").keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FileNamespace for InMemoryFiles {
    async fn get_file(&self, path: &str) -> SdkResult<Option<String>> {
        Ok(self.files.read().expect("lock poisoned").get(path).cloned())
    }

    async fn set_file(&self, path: &str, content: &str) -> SdkResult<()> {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), content.to_string());
        Ok(())
    }
}

/// Namespace rooted at a directory on disk.
///
/// Paths must stay inside the root: absolute paths and `..` are rejected.
#[derive(Clone, Debug)]
pub struct LocalFiles {
    root: PathBuf,
}

impl LocalFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> SdkResult<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || path.is_empty() {
            return Err(SdkError::user_input(format!(
                "path '{path}' is outside the workspace"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileNamespace for LocalFiles {
    async fn get_file(&self, path: &str) -> SdkResult<Option<String>> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SdkError::io(full, e)),
        }
    }

    async fn set_file(&self, path: &str, content: &str) -> SdkResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SdkError::io(parent, e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| SdkError::io(full, e))
    }
}
