use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::content::ContentId;
use crate::error::TypeError;

/// URI scheme for content stored on IPFS.
pub const IPFS_SCHEME: &str = "ipfs";

/// URI of a stored payload, e.g. `ipfs://QmbFMke1KXqnYyBBWxB74N4c5SBnJMVAiMNRcGu6x1AwQH`.
///
/// The authority component is the content identifier, so a `ContentUri`
/// always resolves to exactly one immutable payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentUri {
    id: ContentId,
}

impl ContentUri {
    /// Build the `ipfs://` URI for a content identifier.
    pub fn ipfs(id: ContentId) -> Self {
        Self { id }
    }

    /// Parse a URI string. A bare `Qm...` identifier is accepted as well.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim();
        if !trimmed.contains("://") {
            let id = ContentId::from_base58(trimmed)?;
            return Ok(Self::ipfs(id));
        }

        let url = Url::parse(trimmed).map_err(|e| TypeError::InvalidUri {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != IPFS_SCHEME {
            return Err(TypeError::InvalidUri {
                value: s.to_string(),
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        let host = url.host_str().ok_or_else(|| TypeError::InvalidUri {
            value: s.to_string(),
            reason: "missing content identifier".into(),
        })?;
        let id = ContentId::from_base58(host)?;
        Ok(Self::ipfs(id))
    }

    /// The content identifier this URI points at.
    pub fn content_id(&self) -> &ContentId {
        &self.id
    }
}

impl fmt::Debug for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentUri({self})")
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{IPFS_SCHEME}://{}", self.id)
    }
}

impl FromStr for ContentUri {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<ContentId> for ContentUri {
    fn from(id: ContentId) -> Self {
        Self::ipfs(id)
    }
}

impl Serialize for ContentUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID: &str = "QmbFMke1KXqnYyBBWxB74N4c5SBnJMVAiMNRcGu6x1AwQH";

    #[test]
    fn parse_ipfs_uri() {
        let uri = ContentUri::parse(&format!("ipfs://{CID}")).unwrap();
        assert_eq!(uri.content_id().to_string(), CID);
        assert_eq!(uri.to_string(), format!("ipfs://{CID}"));
    }

    #[test]
    fn parse_bare_cid() {
        let uri: ContentUri = CID.parse().unwrap();
        assert_eq!(uri.to_string(), format!("ipfs://{CID}"));
    }

    #[test]
    fn rejects_other_schemes() {
        let err = ContentUri::parse(&format!("https://{CID}")).unwrap_err();
        assert!(matches!(err, TypeError::InvalidUri { .. }));
    }

    #[test]
    fn rejects_bad_cid() {
        assert!(ContentUri::parse("ipfs://nope").is_err());
    }

    #[test]
    fn from_content_id() {
        let id = ContentId::from_digest([5u8; 32]);
        let uri = ContentUri::from(id);
        assert_eq!(uri.content_id(), &id);
        assert_eq!(ContentUri::parse(&uri.to_string()).unwrap(), uri);
    }

    #[test]
    fn serde_as_string() {
        let uri = ContentUri::parse(CID).unwrap();
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, format!("\"ipfs://{CID}\""));
        let back: ContentUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }
}
