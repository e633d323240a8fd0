use serde::{Deserialize, Serialize};

/// Severity of a status notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Info,
    Warning,
    Error,
    /// Clears a previously shown status.
    None,
}

/// A fire-and-forget status notification for the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: StatusKind,
    #[serde(default)]
    pub title: String,
}

impl StatusEvent {
    pub fn new(key: impl Into<String>, kind: StatusKind, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            title: title.into(),
        }
    }

    /// A new interface was generated from a compilation.
    pub fn compiled() -> Self {
        Self::new("succeed", StatusKind::Success, "New interface generated")
    }

    /// A manifest was generated and stored.
    pub fn generating() -> Self {
        Self::new("loading", StatusKind::Info, "Generating ...")
    }

    /// A manifest was fetched for import.
    pub fn loading_manifests() -> Self {
        Self::new("loading", StatusKind::Info, "Loading manifests ...")
    }

    /// An operation failed; `title` carries the error text.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new("failed", StatusKind::Error, message)
    }

    pub fn cleared() -> Self {
        Self::new("none", StatusKind::None, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(StatusEvent::compiled()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"key": "succeed", "type": "success", "title": "New interface generated"})
        );
    }

    #[test]
    fn failed_carries_message() {
        let ev = StatusEvent::failed("boom");
        assert_eq!(ev.kind, StatusKind::Error);
        assert_eq!(ev.title, "boom");
    }
}
