//! Built-in platform and toolchain descriptors.
//!
//! These mirror the targets the build system ships support for out of the
//! box. Projects may register additional descriptors on top before
//! resolution starts.

use crate::core::features::{HAS_APTGET, HAS_PKGCONFIG};
use crate::core::platform::Platform;
use crate::core::registry::Registry;
use crate::core::toolchain::{PlatformOverride, Toolchain};
use crate::resolver::errors::ConfigError;
use crate::util::process::find_executable;

/// Build a registry populated with the built-in descriptors, probing the
/// host for runtime capabilities (apt-get presence).
pub fn default_registry() -> Result<Registry, ConfigError> {
    let mut registry = Registry::new();
    register_defaults(&mut registry, find_executable("apt-get").is_some())?;
    Ok(registry)
}

/// Register the built-in descriptors. `has_aptget` is the probed
/// availability of the OS package manager on Linux targets.
pub fn register_defaults(registry: &mut Registry, has_aptget: bool) -> Result<(), ConfigError> {
    for platform in builtin_platforms(has_aptget) {
        registry.register_platform(platform)?;
    }
    for toolchain in builtin_toolchains() {
        registry.register_toolchain(toolchain)?;
    }
    Ok(())
}

fn linux_platform(name: &str, machine: &str, has_aptget: bool) -> Platform {
    Platform::new(name, "Linux", machine)
        .with_feature(HAS_PKGCONFIG, true)
        .with_feature(HAS_APTGET, has_aptget)
}

fn builtin_platforms(has_aptget: bool) -> Vec<Platform> {
    vec![
        linux_platform("linux-x86", "i686", has_aptget),
        linux_platform("linux-x86_64", "x86_64", has_aptget),
        Platform::new("win32-x86", "Windows", "x86"),
        Platform::new("win32-x86_64", "Windows", "AMD64"),
        Platform::new("darwin-x86", "Darwin", "i386"),
        Platform::new("darwin-x86_64", "Darwin", "x86_64"),
    ]
}

fn gcc_base(name: &str) -> Toolchain {
    Toolchain::new(name)
        .with_feature(HAS_PKGCONFIG, true)
        .with_debug_flags(["-g"])
        .with_release_flags(["-O2"])
        .with_platform("linux-x86", PlatformOverride::with_flags(["-m32"]))
        .with_platform(
            "linux-x86_64",
            PlatformOverride::with_flags(["-m64", "-fPIC"]),
        )
}

fn builtin_toolchains() -> Vec<Toolchain> {
    vec![
        // Generic gcc has no system constraint and is never auto-detected;
        // select it by name for cross builds.
        gcc_base("gcc"),
        gcc_base("linux-gcc").with_system("Linux"),
        Toolchain::new("win32-msvc")
            .with_system("Windows")
            .with_libs(["Ws2_32"])
            .with_platform("win32-x86", PlatformOverride::none()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::host::HostInfo;

    fn registry() -> Registry {
        let mut reg = Registry::new();
        register_defaults(&mut reg, true).unwrap();
        reg
    }

    #[test]
    fn test_builtin_names() {
        let reg = registry();
        assert_eq!(
            reg.platform_names(),
            vec![
                "darwin-x86",
                "darwin-x86_64",
                "linux-x86",
                "linux-x86_64",
                "win32-x86",
                "win32-x86_64"
            ]
        );
        assert_eq!(reg.toolchain_names(), vec!["gcc", "linux-gcc", "win32-msvc"]);
    }

    #[test]
    fn test_linux_platforms_carry_probed_aptget() {
        let mut reg = Registry::new();
        register_defaults(&mut reg, false).unwrap();
        let pf = reg.platform("linux-x86_64").unwrap();
        assert!(pf.features().enabled(HAS_PKGCONFIG));
        assert!(!pf.features().enabled(HAS_APTGET));

        let reg = registry();
        assert!(reg
            .platform("linux-x86_64")
            .unwrap()
            .features()
            .enabled(HAS_APTGET));
    }

    #[test]
    fn test_auto_detection_on_linux_host() {
        let reg = registry();
        let host = HostInfo::new("x86_64", "Linux");
        assert_eq!(reg.auto_detect_platform(&host).unwrap().name(), "linux-x86_64");
        assert_eq!(reg.auto_detect_toolchain(&host).unwrap().name(), "linux-gcc");
    }

    #[test]
    fn test_msvc_accepts_only_win32_x86() {
        let reg = registry();
        let tc = reg.toolchain("win32-msvc").unwrap();
        assert_eq!(tc.accepted_platforms(), vec!["win32-x86"]);
        assert_eq!(tc.libs(), ["Ws2_32"]);
    }
}
