//! Capability flags and platform/toolchain feature negotiation.
//!
//! A feature is a named boolean capability, e.g. whether a package-query
//! tool is available on the target. Platforms declare what they offer,
//! toolchains declare what they support, and [`FeatureSet::negotiate`]
//! combines the two.

use std::collections::{btree_map, BTreeMap};

use serde::Serialize;

/// Capability: a pkg-config style package-query tool is usable.
pub const HAS_PKGCONFIG: &str = "has_pkgconfig";

/// Capability: an apt-get style OS package manager is usable.
pub const HAS_APTGET: &str = "has_aptget";

/// A set of named boolean capabilities.
///
/// A capability absent from the set reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSet {
    features: BTreeMap<String, bool>,
}

impl FeatureSet {
    /// Create an empty feature set.
    pub fn new() -> Self {
        FeatureSet::default()
    }

    /// Set a capability value, replacing any prior value.
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.features.insert(name.into(), enabled);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.set(name, enabled);
        self
    }

    /// Read a capability; absent means disabled.
    pub fn enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }

    /// Whether the capability is explicitly declared.
    pub fn declares(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Iterate over declared capabilities in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, bool> {
        self.features.iter()
    }

    /// Negotiate the platform's capabilities against the toolchain's.
    ///
    /// For a capability both sides declare, the result is the logical AND.
    /// A capability only one side declares passes through unchanged: a
    /// silent side has no opinion, it does not veto.
    pub fn negotiate(platform: &FeatureSet, toolchain: &FeatureSet) -> FeatureSet {
        let mut merged = platform.clone();
        for (name, &enabled) in toolchain.iter() {
            match merged.features.entry(name.clone()) {
                btree_map::Entry::Occupied(mut e) => {
                    *e.get_mut() = *e.get() && enabled;
                }
                btree_map::Entry::Vacant(e) => {
                    e.insert(enabled);
                }
            }
        }
        merged
    }
}

impl FromIterator<(String, bool)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        FeatureSet {
            features: iter.into_iter().collect(),
        }
    }
}
