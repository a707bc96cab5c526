//! Compiler toolchain descriptors.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::features::FeatureSet;
use crate::core::platform::Platform;

/// Extra settings a toolchain applies when configuring one specific
/// platform. Merged last, after the toolchain's base and mode flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformOverride {
    /// Additional compiler/linker flags for this platform
    pub flags: Vec<String>,
}

impl PlatformOverride {
    /// An override with no extra settings; registers the platform as
    /// supported without adding flags.
    pub fn none() -> Self {
        PlatformOverride::default()
    }

    /// An override carrying extra flags.
    pub fn with_flags<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlatformOverride {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }
}

/// A compiler/linker suite, constrained to a host OS family and to the set
/// of platforms it knows how to configure.
///
/// Like [`Platform`], a toolchain is an immutable value built once at
/// registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    name: String,
    system: Option<String>,
    features: FeatureSet,
    libs: Vec<String>,
    defines: Vec<String>,
    flags: Vec<String>,
    debug_flags: Vec<String>,
    release_flags: Vec<String>,
    platforms: BTreeMap<String, PlatformOverride>,
}

impl Toolchain {
    /// Start building a toolchain descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Toolchain {
            name: name.into(),
            system: None,
            features: FeatureSet::new(),
            libs: Vec::new(),
            defines: Vec::new(),
            flags: Vec::new(),
            debug_flags: Vec::new(),
            release_flags: Vec::new(),
            platforms: BTreeMap::new(),
        }
    }

    /// Constrain the toolchain to a host OS family. Unconstrained
    /// toolchains are never auto-detected.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Declare a capability.
    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.set(name, enabled);
        self
    }

    /// Add libraries every build with this toolchain links.
    pub fn with_libs<I, S>(mut self, libs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libs.extend(libs.into_iter().map(Into::into));
        self
    }

    /// Add preprocessor defines.
    pub fn with_defines<I, S>(mut self, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines.extend(defines.into_iter().map(Into::into));
        self
    }

    /// Add base flags applied in every mode.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Add flags applied only to debug builds.
    pub fn with_debug_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.debug_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Add flags applied only to release builds.
    pub fn with_release_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.release_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Register a platform this toolchain can configure.
    pub fn with_platform(mut self, platform_name: impl Into<String>, ov: PlatformOverride) -> Self {
        self.platforms.insert(platform_name.into(), ov);
        self
    }

    /// Unique toolchain name, e.g. `linux-gcc`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host OS family constraint, if any.
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Declared capabilities.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Libraries linked into every build.
    pub fn libs(&self) -> &[String] {
        &self.libs
    }

    /// Preprocessor defines.
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Base flags.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Debug-mode flags.
    pub fn debug_flags(&self) -> &[String] {
        &self.debug_flags
    }

    /// Release-mode flags.
    pub fn release_flags(&self) -> &[String] {
        &self.release_flags
    }

    /// Sorted names of the platforms this toolchain accepts.
    pub fn accepted_platforms(&self) -> Vec<String> {
        self.platforms.keys().cloned().collect()
    }

    /// Look up the override record for a platform, if supported.
    pub fn platform_override(&self, platform: &Platform) -> Option<&PlatformOverride> {
        self.platforms.get(platform.name())
    }

    /// Whether this toolchain runs on the given host OS family.
    pub fn matches_host(&self, system: &str) -> bool {
        self.system.as_deref() == Some(system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_platforms_sorted() {
        let tc = Toolchain::new("gcc")
            .with_platform("linux-x86_64", PlatformOverride::none())
            .with_platform("linux-x86", PlatformOverride::none());
        assert_eq!(tc.accepted_platforms(), vec!["linux-x86", "linux-x86_64"]);
    }

    #[test]
    fn test_platform_override_lookup() {
        let pf = Platform::new("linux-x86_64", "Linux", "x86_64");
        let tc = Toolchain::new("gcc")
            .with_platform("linux-x86_64", PlatformOverride::with_flags(["-m64"]));
        let ov = tc.platform_override(&pf).unwrap();
        assert_eq!(ov.flags, vec!["-m64"]);

        let other = Platform::new("win32-x86", "Windows", "x86");
        assert!(tc.platform_override(&other).is_none());
    }

    #[test]
    fn test_unconstrained_toolchain_never_matches_host() {
        let tc = Toolchain::new("gcc");
        assert!(!tc.matches_host("Linux"));

        let tc = tc.with_system("Linux");
        assert!(tc.matches_host("Linux"));
        assert!(!tc.matches_host("Windows"));
    }

    #[test]
    fn test_flag_accumulators_preserve_order() {
        let tc = Toolchain::new("gcc")
            .with_flags(["-Wall"])
            .with_flags(["-Wextra", "-Wall"]);
        assert_eq!(tc.flags(), ["-Wall", "-Wextra", "-Wall"]);
    }
}
