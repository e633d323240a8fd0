use std::fmt;
use std::ops::BitOr;

use crate::key::ServiceKey;

/// The set of well-known services a configuration provides.
///
/// Any non-empty subset of {manifests, storage, registries} is legal, and
/// combining configurations takes the union of their capabilities. Custom
/// keys are not tracked here; they are looked up by name.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    const MANIFESTS: u8 = 0b001;
    const STORAGE: u8 = 0b010;
    const REGISTRIES: u8 = 0b100;

    /// No capabilities.
    pub const fn none() -> Self {
        Self(0)
    }

    /// Manifests, storage and registries.
    pub const fn complete() -> Self {
        Self(Self::MANIFESTS | Self::STORAGE | Self::REGISTRIES)
    }

    fn bit(key: &ServiceKey) -> u8 {
        match key {
            ServiceKey::Manifests => Self::MANIFESTS,
            ServiceKey::Storage => Self::STORAGE,
            ServiceKey::Registries => Self::REGISTRIES,
            ServiceKey::Custom(_) => 0,
        }
    }

    /// Returns `true` if the service under `key` is present.
    pub fn contains(&self, key: &ServiceKey) -> bool {
        let bit = Self::bit(key);
        bit != 0 && self.0 & bit == bit
    }

    pub fn insert(&mut self, key: &ServiceKey) {
        self.0 |= Self::bit(key);
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn is_complete(&self) -> bool {
        *self == Self::complete()
    }

    /// Present well-known keys in canonical order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        [ServiceKey::Manifests, ServiceKey::Storage, ServiceKey::Registries]
            .into_iter()
            .filter(|k| self.contains(k))
            .collect()
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<'a> FromIterator<&'a ServiceKey> for Capabilities {
    fn from_iter<I: IntoIterator<Item = &'a ServiceKey>>(iter: I) -> Self {
        let mut caps = Self::none();
        for key in iter {
            caps.insert(key);
        }
        caps
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capabilities({self})")
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let keys = self.keys();
        let names: Vec<&str> = keys.iter().map(ServiceKey::as_str).collect();
        f.write_str(&names.join("+"))
    }
}
