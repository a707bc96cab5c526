//! The resolved build environment.

use std::fmt;

use serde::Serialize;

use crate::core::features::FeatureSet;

/// The fully resolved configuration snapshot handed to the build executor.
///
/// Created empty, populated by the configuration resolver during a single
/// synchronous pass, then treated as read-only. Accumulators preserve
/// insertion order and keep duplicates; deduplication is the executor's
/// business, not ours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Environment {
    /// Name of the resolved target platform
    pub platform_name: String,
    /// Name of the resolved toolchain
    pub toolchain_name: String,
    /// Negotiated capabilities
    pub features: FeatureSet,
    /// Default library subpath for the target architecture
    pub machine_libdir: String,
    /// Libraries to link
    pub libs: Vec<String>,
    /// Preprocessor defines
    pub defines: Vec<String>,
    /// Compiler/linker flags, in merge order
    pub flags: Vec<String>,
    /// Build-output subdirectory, `/<platform>/<debug|release>`
    pub variant_dir: String,
    /// Whether this is a debug configuration
    pub debug: bool,
    /// `destdir + prefix`
    pub install_dir: String,
    /// `install_dir + bindir`
    pub install_bin_dir: String,
    /// `install_dir + libdir`
    pub install_lib_dir: String,
    /// `install_dir + includedir`
    pub install_include_dir: String,
    /// `destdir + etcdir`
    pub install_etc_dir: String,
    /// `install_dir + sharedir`
    pub install_share_dir: String,
    /// `install_dir + docdir`
    pub install_doc_dir: String,
}

impl Environment {
    /// Append flags, preserving order and duplicates.
    pub(crate) fn merge_flags<I, S>(&mut self, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
    }

    /// Append libraries.
    pub(crate) fn merge_libs<I, S>(&mut self, libs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.libs.extend(libs.into_iter().map(Into::into));
    }

    /// Append preprocessor defines.
    pub(crate) fn merge_defines<I, S>(&mut self, defines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defines.extend(defines.into_iter().map(Into::into));
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "platform = {}", self.platform_name)?;
        writeln!(f, "toolchain = {}", self.toolchain_name)?;
        writeln!(f, "debug = {}", self.debug)?;
        writeln!(f, "variant_dir = {}", self.variant_dir)?;
        writeln!(f, "machine_libdir = {}", self.machine_libdir)?;
        for (name, enabled) in self.features.iter() {
            writeln!(f, "{} = {}", name, enabled)?;
        }
        writeln!(f, "libs = [{}]", self.libs.join(", "))?;
        writeln!(f, "defines = [{}]", self.defines.join(", "))?;
        writeln!(f, "flags = [{}]", self.flags.join(", "))?;
        writeln!(f, "install_dir = {}", self.install_dir)?;
        writeln!(f, "install_bin_dir = {}", self.install_bin_dir)?;
        writeln!(f, "install_lib_dir = {}", self.install_lib_dir)?;
        writeln!(f, "install_include_dir = {}", self.install_include_dir)?;
        writeln!(f, "install_etc_dir = {}", self.install_etc_dir)?;
        writeln!(f, "install_share_dir = {}", self.install_share_dir)?;
        write!(f, "install_doc_dir = {}", self.install_doc_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulators_keep_duplicates() {
        let mut env = Environment::default();
        env.merge_flags(["-Wall", "-m64"]);
        env.merge_flags(["-Wall"]);
        assert_eq!(env.flags, ["-Wall", "-m64", "-Wall"]);
    }

    #[test]
    fn test_display_includes_variant_dir() {
        let env = Environment {
            platform_name: "linux-x86_64".to_string(),
            variant_dir: "/linux-x86_64/release".to_string(),
            ..Environment::default()
        };
        let text = env.to_string();
        assert!(text.contains("variant_dir = /linux-x86_64/release"));
    }
}
