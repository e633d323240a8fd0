use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TypeError;

/// Scheme of deployment keys in a manifest.
pub const BLOCKCHAIN_SCHEME: &str = "blockchain";

/// Genesis block hashes of well-known public chains.
const KNOWN_CHAINS: &[(&str, &str)] = &[
    ("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3", "mainnet"),
    ("a3c565fc15c7478862d50ccd6561e3c06b24cc509bf388941c25ea985ce32cb9", "kovan"),
    ("41941023680923e0fe4d74a34bdac8141f2540e3ae90623718e47d66d1ca4a2d", "ropsten"),
    ("6341fd3daf94b748c72ced5a5b26028f2474f5f00d824504e4fa37a75767e177", "rinkeby"),
    ("bf7e331f7f7c1dd2e05159666b3bf8bc7a8a3a9eb1d518969eab529dd9b88c1a", "goerli"),
];

/// Chain identity taken from a `blockchain://<genesis>/block/<hash>` URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId {
    /// Genesis block hash, lowercase hex without `0x`.
    pub genesis: String,
    /// Human name when the genesis hash is a known public chain.
    pub name: Option<String>,
}

impl ChainId {
    /// Look up a genesis hash in the table of known chains.
    pub fn from_genesis(genesis: &str) -> Self {
        let genesis = genesis.trim_start_matches("0x").to_ascii_lowercase();
        let name = KNOWN_CHAINS
            .iter()
            .find(|(hash, _)| *hash == genesis)
            .map(|(_, name)| (*name).to_string());
        Self { genesis, name }
    }

    /// Parse the chain out of a deployment's blockchain URI.
    pub fn from_uri(uri: &str) -> Result<Self, TypeError> {
        let parsed = Url::parse(uri).map_err(|e| TypeError::InvalidChainUri {
            value: uri.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != BLOCKCHAIN_SCHEME {
            return Err(TypeError::InvalidChainUri {
                value: uri.to_string(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }
        let genesis = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TypeError::InvalidChainUri {
                value: uri.to_string(),
                reason: "missing genesis hash".into(),
            })?;
        Ok(Self::from_genesis(genesis))
    }

    /// `true` when the genesis hash matched a known public chain.
    pub fn is_known(&self) -> bool {
        self.name.is_some()
    }

    /// Name if known, genesis hash otherwise.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.genesis)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET_URI: &str = "blockchain://d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3/block/752820c0ad7abc1200f9ad42c4adc6fbb4bd44b5bed4667990e64565102c1ba6";

    #[test]
    fn resolves_mainnet() {
        let chain = ChainId::from_uri(MAINNET_URI).unwrap();
        assert_eq!(chain.label(), "mainnet");
        assert!(chain.is_known());
    }

    #[test]
    fn unknown_chain_keeps_genesis() {
        let chain = ChainId::from_uri("blockchain://abcdef/block/1234").unwrap();
        assert!(!chain.is_known());
        assert_eq!(chain.label(), "abcdef");
        assert_eq!(chain.to_string(), "abcdef");
    }

    #[test]
    fn genesis_is_normalized() {
        let chain =
            ChainId::from_genesis("0xBF7E331F7F7C1DD2E05159666B3BF8BC7A8A3A9EB1D518969EAB529DD9B88C1A");
        assert_eq!(chain.label(), "goerli");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(ChainId::from_uri("https://example.com/block/1").is_err());
        assert!(ChainId::from_uri("not a uri").is_err());
    }
}
