//! Configuration resolution.
//!
//! Takes a validated toolchain/platform pairing and produces the frozen
//! [`Environment`] the external build executor consumes. Resolution is a
//! single synchronous pass; the first failing step aborts and no partial
//! environment escapes.

use crate::core::environment::Environment;
use crate::core::features::FeatureSet;
use crate::core::platform::Platform;
use crate::core::toolchain::Toolchain;
use crate::resolver::errors::ConfigError;

/// Install-path components composed into the environment's monikers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// Root path of installation
    pub destdir: String,
    /// Prefix for all installed files, relative to destdir
    pub prefix: String,
    /// Binary prefix, relative to prefix
    pub bindir: String,
    /// Library prefix, relative to prefix; `None` uses the platform's
    /// machine_libdir
    pub libdir: Option<String>,
    /// Header prefix, relative to prefix
    pub includedir: String,
    /// Config-file prefix, relative to destdir
    pub etcdir: String,
    /// Shared-resource prefix, relative to prefix
    pub sharedir: String,
    /// Documentation prefix, relative to prefix
    pub docdir: String,
}

impl Default for InstallPaths {
    fn default() -> Self {
        InstallPaths {
            destdir: String::new(),
            prefix: "/usr/local".to_string(),
            bindir: "/bin".to_string(),
            libdir: None,
            includedir: "/include".to_string(),
            etcdir: "/usr/local/etc".to_string(),
            sharedir: "/share".to_string(),
            docdir: "/doc".to_string(),
        }
    }
}

/// Options for a resolution pass.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Debug vs release configuration
    pub debug: bool,
    /// Install-path components
    pub install: InstallPaths,
}

/// Resolve a toolchain against a platform into a frozen [`Environment`].
///
/// Merge order matters and is fixed: toolchain base flags, then the
/// debug/release set, then the per-platform override flags last, so the
/// override always wins.
pub fn resolve(
    toolchain: &Toolchain,
    platform: &Platform,
    options: &ResolveOptions,
) -> Result<Environment, ConfigError> {
    // The pairing must be declared up front; anything else is fatal.
    let Some(override_record) = toolchain.platform_override(platform) else {
        return Err(ConfigError::UnsupportedPlatformForToolchain {
            toolchain: toolchain.name().to_string(),
            platform: platform.name().to_string(),
            accepted: toolchain.accepted_platforms(),
        });
    };

    let mut env = Environment {
        platform_name: platform.name().to_string(),
        toolchain_name: toolchain.name().to_string(),
        features: FeatureSet::negotiate(platform.features(), toolchain.features()),
        machine_libdir: platform.machine_libdir().to_string(),
        debug: options.debug,
        ..Environment::default()
    };

    env.merge_libs(toolchain.libs().iter().cloned());
    env.merge_defines(toolchain.defines().iter().cloned());
    env.merge_flags(toolchain.flags().iter().cloned());

    env.variant_dir = format!(
        "/{}/{}",
        platform.name(),
        if options.debug { "debug" } else { "release" }
    );
    if options.debug {
        env.merge_flags(toolchain.debug_flags().iter().cloned());
    } else {
        env.merge_flags(toolchain.release_flags().iter().cloned());
    }

    env.merge_flags(override_record.flags.iter().cloned());

    let paths = &options.install;
    let libdir = paths
        .libdir
        .clone()
        .unwrap_or_else(|| platform.machine_libdir().to_string());

    env.install_dir = format!("{}{}", paths.destdir, paths.prefix);
    env.install_bin_dir = format!("{}{}", env.install_dir, paths.bindir);
    env.install_lib_dir = format!("{}{}", env.install_dir, libdir);
    env.install_include_dir = format!("{}{}", env.install_dir, paths.includedir);
    env.install_etc_dir = format!("{}{}", paths.destdir, paths.etcdir);
    env.install_share_dir = format!("{}{}", env.install_dir, paths.sharedir);
    env.install_doc_dir = format!("{}{}", env.install_dir, paths.docdir);

    tracing::debug!(
        "resolved `{}` on `{}` -> {}",
        toolchain.name(),
        platform.name(),
        env.variant_dir
    );

    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::HAS_PKGCONFIG;
    use crate::core::toolchain::PlatformOverride;

    fn linux_x86_64() -> Platform {
        Platform::new("linux-x86_64", "Linux", "x86_64").with_feature(HAS_PKGCONFIG, true)
    }

    fn gcc() -> Toolchain {
        Toolchain::new("gcc")
            .with_system("Linux")
            .with_feature(HAS_PKGCONFIG, true)
            .with_libs(["m"])
            .with_debug_flags(["-g"])
            .with_release_flags(["-O2"])
            .with_platform(
                "linux-x86_64",
                PlatformOverride::with_flags(["-m64", "-fPIC"]),
            )
            .with_platform("linux-x86", PlatformOverride::with_flags(["-m32"]))
    }

    #[test]
    fn test_variant_dir_debug_and_release() {
        let pf = linux_x86_64();
        let tc = gcc();

        let opts = ResolveOptions {
            debug: true,
            ..ResolveOptions::default()
        };
        let env = resolve(&tc, &pf, &opts).unwrap();
        assert_eq!(env.variant_dir, "/linux-x86_64/debug");
        assert!(env.flags.contains(&"-g".to_string()));

        let env = resolve(&tc, &pf, &ResolveOptions::default()).unwrap();
        assert_eq!(env.variant_dir, "/linux-x86_64/release");
        assert!(env.flags.contains(&"-O2".to_string()));
    }

    #[test]
    fn test_unsupported_pairing_lists_accepted_sorted() {
        let pf = Platform::new("win32-x86", "Windows", "x86");
        let err = resolve(&gcc(), &pf, &ResolveOptions::default()).unwrap_err();
        match err {
            ConfigError::UnsupportedPlatformForToolchain { accepted, .. } => {
                assert_eq!(accepted, vec!["linux-x86", "linux-x86_64"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_override_flags_merge_last() {
        let env = resolve(&gcc(), &linux_x86_64(), &ResolveOptions::default()).unwrap();
        assert_eq!(env.flags, vec!["-O2", "-m64", "-fPIC"]);
        assert_eq!(env.libs, vec!["m"]);
    }

    #[test]
    fn test_features_negotiated_into_environment() {
        let pf = linux_x86_64().with_feature("has_aptget", true);
        let tc = gcc().with_feature(HAS_PKGCONFIG, false);
        let env = resolve(&tc, &pf, &ResolveOptions::default()).unwrap();
        // shared key ANDed, one-sided key passed through
        assert!(!env.features.enabled(HAS_PKGCONFIG));
        assert!(env.features.enabled("has_aptget"));
    }

    #[test]
    fn test_install_path_composition() {
        let opts = ResolveOptions {
            debug: false,
            install: InstallPaths {
                destdir: "/tmp/stage".to_string(),
                ..InstallPaths::default()
            },
        };
        let env = resolve(&gcc(), &linux_x86_64(), &opts).unwrap();
        assert_eq!(env.install_dir, "/tmp/stage/usr/local");
        assert_eq!(env.install_bin_dir, "/tmp/stage/usr/local/bin");
        assert_eq!(env.install_etc_dir, "/tmp/stage/usr/local/etc");
        assert_eq!(env.install_share_dir, "/tmp/stage/usr/local/share");
        assert_eq!(env.install_doc_dir, "/tmp/stage/usr/local/doc");
        assert_eq!(env.install_include_dir, "/tmp/stage/usr/local/include");
    }

    #[test]
    fn test_default_libdir_uses_machine_libdir() {
        let pf = Platform::new("linux-x86_64", "Linux", "x86_64").with_machine_libdir("/lib64");
        let tc = gcc();
        let env = resolve(&tc, &pf, &ResolveOptions::default()).unwrap();
        assert!(env.install_lib_dir.ends_with("/lib64"));
        assert_eq!(env.install_lib_dir, "/usr/local/lib64");

        let opts = ResolveOptions {
            debug: false,
            install: InstallPaths {
                libdir: Some("/lib/custom".to_string()),
                ..InstallPaths::default()
            },
        };
        let env = resolve(&tc, &pf, &opts).unwrap();
        assert_eq!(env.install_lib_dir, "/usr/local/lib/custom");
    }
}
