use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name under which a service is configured and later looked up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceKey {
    Manifests,
    Storage,
    Registries,
    /// Any caller-defined key.
    Custom(String),
}

impl ServiceKey {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manifests => "manifests",
            Self::Storage => "storage",
            Self::Registries => "registries",
            Self::Custom(name) => name,
        }
    }

    /// The service family a connector configured under this key must produce.
    pub fn expected_kind(&self) -> ServiceKind {
        match self {
            Self::Manifests => ServiceKind::Manifests,
            Self::Storage => ServiceKind::Storage,
            Self::Registries => ServiceKind::Registries,
            Self::Custom(_) => ServiceKind::Custom,
        }
    }

    /// `true` for `manifests`, `storage` and `registries`.
    pub fn is_well_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for ServiceKey {
    fn from(s: &str) -> Self {
        match s {
            "manifests" => Self::Manifests,
            "storage" => Self::Storage,
            "registries" => Self::Registries,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for ServiceKey {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for ServiceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// Family of a connected service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Manifests,
    Storage,
    Registries,
    Custom,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Manifests => "manifests",
            Self::Storage => "storage",
            Self::Registries => "registries",
            Self::Custom => "custom",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_known_keys() {
        assert_eq!(ServiceKey::from("manifests"), ServiceKey::Manifests);
        assert_eq!(ServiceKey::from("storage"), ServiceKey::Storage);
        assert_eq!(ServiceKey::from("registries"), ServiceKey::Registries);
        assert_eq!(ServiceKey::from("cache"), ServiceKey::Custom("cache".into()));
    }

    #[test]
    fn display_roundtrip() {
        for key in ["manifests", "storage", "registries", "telemetry"] {
            assert_eq!(ServiceKey::from(key).to_string(), key);
        }
    }

    #[test]
    fn expected_kinds() {
        assert_eq!(ServiceKey::Storage.expected_kind(), ServiceKind::Storage);
        assert_eq!(ServiceKey::from("x").expected_kind(), ServiceKind::Custom);
        assert!(!ServiceKey::from("x").is_well_known());
    }
}
