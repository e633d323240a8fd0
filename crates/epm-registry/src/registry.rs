use std::fmt;

use url::Url;

use epm_config::RegistryService;

use crate::error::{RegistryError, Result};

/// Byte length of a registry contract address.
pub const ADDRESS_LENGTH: usize = 20;

/// Connected handle to a package registry contract.
///
/// Only identifies the registry; publishing to and querying it are not
/// handled here.
#[derive(Clone, PartialEq, Eq)]
pub struct Registry {
    address: String,
    bytes: [u8; ADDRESS_LENGTH],
    provider: Option<Url>,
}

impl Registry {
    /// Validate `address` (`0x` + 40 hex chars) and the optional provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use epm_registry::Registry;
    ///
    /// let registry = Registry::new("0x8011df4830b4f696cd81393997e5371b93338878", None).unwrap();
    /// assert_eq!(registry.address_bytes()[0], 0x80);
    /// assert!(Registry::new("8011df48", None).is_err());
    /// ```
    pub fn new(address: &str, provider: Option<&str>) -> Result<Self> {
        let invalid = |reason: &str| RegistryError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };
        let digits = address
            .strip_prefix("0x")
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        let decoded = hex::decode(digits).map_err(|e| invalid(&e.to_string()))?;
        let bytes: [u8; ADDRESS_LENGTH] = decoded
            .try_into()
            .map_err(|_| invalid("expected 20 bytes"))?;

        let provider = provider
            .map(|raw| {
                Url::parse(raw).map_err(|e| RegistryError::InvalidProvider {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            address: address.to_string(),
            bytes,
            provider,
        })
    }

    pub fn address_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.bytes
    }

    pub fn provider_url(&self) -> Option<&Url> {
        self.provider.as_ref()
    }
}

impl RegistryService for Registry {
    fn address(&self) -> &str {
        &self.address
    }

    fn provider(&self) -> Option<&str> {
        self.provider.as_ref().map(Url::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("address", &self.address)
            .field("provider", &self.provider.as_ref().map(Url::as_str))
            .finish()
    }
}
