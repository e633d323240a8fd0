//! Package naming rules.
//!
//! A valid package name:
//! - starts with a lowercase ASCII letter
//! - continues with at most 255 lowercase letters, digits or `-`

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;
use crate::uri::ContentUri;

/// Pattern every package name must match.
pub const PACKAGE_NAME_PATTERN: &str = "^[a-z][-a-z0-9]{0,255}$";

static PACKAGE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(PACKAGE_NAME_PATTERN).unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// A validated package name.
///
/// # Examples
///
/// ```
/// use epm_types::PackageName;
///
/// assert!(PackageName::new("my-package2").is_ok());
/// assert!(PackageName::new("MyPackage").is_err());
/// assert!(PackageName::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_package_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validate a package name, returning `Ok(())` if it matches
/// [`PACKAGE_NAME_PATTERN`].
pub fn validate_package_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidPackageName {
            name: name.to_string(),
            reason: "package name must not be empty".into(),
        });
    }
    if !PACKAGE_NAME_RE.is_match(name) {
        return Err(TypeError::InvalidPackageName {
            name: name.to_string(),
            reason: format!("package names must match regex: {PACKAGE_NAME_PATTERN}"),
        });
    }
    Ok(())
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PackageName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// Identifies the package a session query is scoped to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: PackageName,
    pub version: String,
    /// Where the package's manifest is stored, once published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<ContentUri>,
}

impl PackageDescriptor {
    pub fn new(name: PackageName, version: impl Into<String>) -> Self {
        Self {
            name,
            version: version.into(),
            uri: None,
        }
    }

    pub fn with_uri(mut self, uri: ContentUri) -> Self {
        self.uri = Some(uri);
        self
    }
}
