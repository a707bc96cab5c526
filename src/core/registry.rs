//! Name-keyed stores of platform and toolchain descriptors.
//!
//! The registry is populated during process start-up (built-ins plus any
//! project additions) and treated as read-only for the rest of the run.
//! It is passed explicitly to whoever needs lookups; there is no global
//! shared state.

use std::collections::BTreeMap;

use crate::core::platform::Platform;
use crate::core::toolchain::Toolchain;
use crate::resolver::errors::{ConfigError, DescriptorKind};
use crate::util::host::HostInfo;

/// Stores for platform and toolchain descriptors, keyed by name.
#[derive(Debug, Default)]
pub struct Registry {
    platforms: BTreeMap<String, Platform>,
    toolchains: BTreeMap<String, Toolchain>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a platform descriptor.
    ///
    /// Re-registering an existing name replaces the prior entry; the
    /// replacement is logged so ambiguous setups stay visible.
    pub fn register_platform(&mut self, platform: Platform) -> Result<(), ConfigError> {
        if platform.name().is_empty() {
            return Err(ConfigError::EmptyName {
                kind: DescriptorKind::Platform,
            });
        }
        if let Some(prior) = self.platforms.insert(platform.name().to_string(), platform) {
            tracing::warn!("platform `{}` re-registered, prior entry replaced", prior.name());
        }
        Ok(())
    }

    /// Register a toolchain descriptor. Same replacement rule as platforms.
    pub fn register_toolchain(&mut self, toolchain: Toolchain) -> Result<(), ConfigError> {
        if toolchain.name().is_empty() {
            return Err(ConfigError::EmptyName {
                kind: DescriptorKind::Toolchain,
            });
        }
        if let Some(prior) = self
            .toolchains
            .insert(toolchain.name().to_string(), toolchain)
        {
            tracing::warn!(
                "toolchain `{}` re-registered, prior entry replaced",
                prior.name()
            );
        }
        Ok(())
    }

    /// Look up a platform by name.
    pub fn platform(&self, name: &str) -> Result<&Platform, ConfigError> {
        self.platforms
            .get(name)
            .ok_or_else(|| ConfigError::UnknownIdentifier {
                kind: DescriptorKind::Platform,
                name: name.to_string(),
                known: self.platform_names(),
            })
    }

    /// Look up a toolchain by name.
    pub fn toolchain(&self, name: &str) -> Result<&Toolchain, ConfigError> {
        self.toolchains
            .get(name)
            .ok_or_else(|| ConfigError::UnknownIdentifier {
                kind: DescriptorKind::Toolchain,
                name: name.to_string(),
                known: self.toolchain_names(),
            })
    }

    /// Sorted names of all registered platforms.
    pub fn platform_names(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    /// Sorted names of all registered toolchains.
    pub fn toolchain_names(&self) -> Vec<String> {
        self.toolchains.keys().cloned().collect()
    }

    /// Find the first platform whose `(machine, system)` matches the host.
    ///
    /// Iteration order is not part of the contract beyond "first match
    /// wins"; registries should avoid overlapping entries.
    pub fn auto_detect_platform(&self, host: &HostInfo) -> Result<&Platform, ConfigError> {
        self.platforms
            .values()
            .find(|pf| pf.matches_host(&host.machine, &host.system))
            .ok_or_else(|| ConfigError::UnsupportedPlatform { host: host.clone() })
    }

    /// Find the first toolchain whose system constraint matches the host.
    pub fn auto_detect_toolchain(&self, host: &HostInfo) -> Result<&Toolchain, ConfigError> {
        self.toolchains
            .values()
            .find(|tc| tc.matches_host(&host.system))
            .ok_or_else(|| ConfigError::UnsupportedToolchain { host: host.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_platform(Platform::new("linux-x86_64", "Linux", "x86_64"))
            .unwrap();
        reg.register_platform(Platform::new("linux-x86", "Linux", "i686"))
            .unwrap();
        reg.register_toolchain(Toolchain::new("linux-gcc").with_system("Linux"))
            .unwrap();
        reg.register_toolchain(Toolchain::new("gcc")).unwrap();
        reg
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut reg = Registry::new();
        let err = reg.register_platform(Platform::new("", "Linux", "x86_64"));
        assert!(matches!(err, Err(ConfigError::EmptyName { .. })));
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut reg = Registry::new();
        reg.register_platform(Platform::new("p", "Linux", "x86_64"))
            .unwrap();
        reg.register_platform(Platform::new("p", "Linux", "i686"))
            .unwrap();
        assert_eq!(reg.platform("p").unwrap().machine(), "i686");
        assert_eq!(reg.platform_names(), vec!["p"]);
    }

    #[test]
    fn test_lookup_miss_lists_known_names() {
        let reg = registry();
        match reg.platform("mips") {
            Err(ConfigError::UnknownIdentifier { known, .. }) => {
                assert_eq!(known, vec!["linux-x86", "linux-x86_64"]);
            }
            other => panic!("expected UnknownIdentifier, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_auto_detect_platform_matches_machine_and_system() {
        let reg = registry();
        let host = HostInfo::new("x86_64", "Linux");
        assert_eq!(reg.auto_detect_platform(&host).unwrap().name(), "linux-x86_64");

        let host = HostInfo::new("x86_64", "Plan9");
        assert!(matches!(
            reg.auto_detect_platform(&host),
            Err(ConfigError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_auto_detect_toolchain_matches_system_only() {
        let reg = registry();
        let host = HostInfo::new("aarch64", "Linux");
        assert_eq!(reg.auto_detect_toolchain(&host).unwrap().name(), "linux-gcc");

        let host = HostInfo::new("x86_64", "Windows");
        assert!(matches!(
            reg.auto_detect_toolchain(&host),
            Err(ConfigError::UnsupportedToolchain { .. })
        ));
    }

    #[test]
    fn test_unconstrained_toolchain_not_auto_detected() {
        let mut reg = Registry::new();
        reg.register_toolchain(Toolchain::new("gcc")).unwrap();
        let host = HostInfo::new("x86_64", "Linux");
        assert!(reg.auto_detect_toolchain(&host).is_err());
    }
}
