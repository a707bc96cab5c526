//! Target platform descriptors.

use serde::Serialize;

use crate::core::features::FeatureSet;

/// A target platform: the OS family and CPU architecture produced binaries
/// will run on, plus the capabilities the target offers.
///
/// Platforms are plain values. They are constructed once, at registration
/// or auto-detection time, and never mutated afterward; runtime-probed
/// capabilities (e.g. whether apt-get exists) are resolved while building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    name: String,
    system: String,
    machine: String,
    machine_libdir: String,
    features: FeatureSet,
}

impl Platform {
    /// Start building a platform descriptor.
    pub fn new(
        name: impl Into<String>,
        system: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        Platform {
            name: name.into(),
            system: system.into(),
            machine: machine.into(),
            machine_libdir: "/lib".to_string(),
            features: FeatureSet::new(),
        }
    }

    /// Override the default library subpath (`/lib`).
    pub fn with_machine_libdir(mut self, libdir: impl Into<String>) -> Self {
        self.machine_libdir = libdir.into();
        self
    }

    /// Declare a capability.
    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.set(name, enabled);
        self
    }

    /// Unique platform name, e.g. `linux-x86_64`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host OS family tag, e.g. `Linux`.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// CPU architecture tag, e.g. `x86_64`.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Default library subpath for this architecture.
    pub fn machine_libdir(&self) -> &str {
        &self.machine_libdir
    }

    /// Declared capabilities.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Whether this platform runs on the given host identity.
    pub fn matches_host(&self, machine: &str, system: &str) -> bool {
        self.machine == machine && self.system == system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::HAS_PKGCONFIG;

    #[test]
    fn test_builder_defaults() {
        let pf = Platform::new("linux-x86_64", "Linux", "x86_64");
        assert_eq!(pf.name(), "linux-x86_64");
        assert_eq!(pf.machine_libdir(), "/lib");
        assert!(!pf.features().enabled(HAS_PKGCONFIG));
    }

    #[test]
    fn test_builder_overrides() {
        let pf = Platform::new("linux-x86_64", "Linux", "x86_64")
            .with_machine_libdir("/lib64")
            .with_feature(HAS_PKGCONFIG, true);
        assert_eq!(pf.machine_libdir(), "/lib64");
        assert!(pf.features().enabled(HAS_PKGCONFIG));
    }

    #[test]
    fn test_matches_host() {
        let pf = Platform::new("linux-x86_64", "Linux", "x86_64");
        assert!(pf.matches_host("x86_64", "Linux"));
        assert!(!pf.matches_host("i686", "Linux"));
        assert!(!pf.matches_host("x86_64", "Darwin"));
    }
}
