//! Configuration error types and diagnostics.

use std::fmt;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::host::HostInfo;

/// Which registry a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Platform,
    Toolchain,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Platform => write!(f, "platform"),
            DescriptorKind::Toolchain => write!(f, "toolchain"),
        }
    }
}

/// Why a dependency check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyFailure {
    /// The library is not present and no install fallback was available.
    Missing,
    /// Present, but older than the requested minimum.
    VersionTooLow { min_version: String },
    /// The one-shot install attempt did not make the library appear.
    InstallFailed { package: String },
    /// The external query or install tool exceeded its deadline.
    Timeout { tool: String },
    /// The external tool could not be run at all.
    QueryError { message: String },
}

impl fmt::Display for DependencyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyFailure::Missing => write!(f, "library not found"),
            DependencyFailure::VersionTooLow { min_version } => {
                write!(f, "installed version is older than {}", min_version)
            }
            DependencyFailure::InstallFailed { package } => {
                write!(f, "installing `{}` did not satisfy it", package)
            }
            DependencyFailure::Timeout { tool } => {
                write!(f, "`{}` did not respond in time", tool)
            }
            DependencyFailure::QueryError { message } => write!(f, "{}", message),
        }
    }
}

/// Error during configuration resolution.
///
/// Every variant is fatal: resolution aborts before any build work is
/// scheduled, and no partial environment is exposed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: DescriptorKind },

    #[error("unknown {kind} `{name}`")]
    UnknownIdentifier {
        kind: DescriptorKind,
        name: String,
        known: Vec<String>,
    },

    #[error("the current platform can not be recognized, or is not supported yet")]
    UnsupportedPlatform { host: HostInfo },

    #[error("the current toolchain can not be recognized, or is not supported yet")]
    UnsupportedToolchain { host: HostInfo },

    #[error("`{toolchain}` toolchain only accepts platforms {accepted:?}")]
    UnsupportedPlatformForToolchain {
        toolchain: String,
        platform: String,
        accepted: Vec<String>,
    },

    #[error("unknown variables: {}", keys.join(", "))]
    UnknownVariables { keys: Vec<String> },

    #[error("invalid value `{value}` for `{key}`: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("dependency on `{name}` not satisfied: {reason}")]
    DependencyUnsatisfied {
        name: String,
        reason: DependencyFailure,
    },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::EmptyName { kind } => {
                Diagnostic::error(format!("{} name must not be empty", kind))
            }

            ConfigError::UnknownIdentifier { kind, name, known } => {
                let mut diag = Diagnostic::error(format!("unknown {} `{}`", kind, name));
                if !known.is_empty() {
                    diag = diag
                        .with_context(format!("known {}s: {}", kind, known.join(", ")));
                }
                diag
            }

            ConfigError::UnsupportedPlatform { host } => {
                let mut diag = Diagnostic::error(
                    "the current platform can not be recognized, or is not supported yet",
                );
                for line in host.to_string().lines() {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(suggestions::AUTO_DETECT_FAILED)
            }

            ConfigError::UnsupportedToolchain { host } => {
                let mut diag = Diagnostic::error(
                    "the current toolchain can not be recognized, or is not supported yet",
                );
                for line in host.to_string().lines() {
                    diag = diag.with_context(line.to_string());
                }
                diag.with_suggestion(suggestions::AUTO_DETECT_FAILED)
            }

            ConfigError::UnsupportedPlatformForToolchain {
                toolchain,
                platform,
                accepted,
            } => Diagnostic::error(format!(
                "`{}` toolchain can not configure platform `{}`",
                toolchain, platform
            ))
            .with_context(format!("accepted platforms: {}", accepted.join(", ")))
            .with_suggestion("Pick one of the accepted platforms, or a different toolchain"),

            ConfigError::UnknownVariables { keys } => {
                Diagnostic::error(format!("unknown variables: {}", keys.join(", ")))
                    .with_suggestion(suggestions::UNKNOWN_VARIABLE)
            }

            ConfigError::InvalidValue {
                key,
                value,
                expected,
            } => Diagnostic::error(format!("invalid value `{}` for `{}`", value, key))
                .with_context(format!("expected {}", expected)),

            ConfigError::DependencyUnsatisfied { name, reason } => {
                let diag = Diagnostic::error(format!("dependency on `{}` not satisfied", name))
                    .with_context(reason.to_string());
                match reason {
                    DependencyFailure::Missing | DependencyFailure::InstallFailed { .. } => {
                        diag.with_suggestion(suggestions::MISSING_DEPENDENCY)
                    }
                    _ => diag,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_identifier_lists_known_names() {
        let err = ConfigError::UnknownIdentifier {
            kind: DescriptorKind::Platform,
            name: "mips".to_string(),
            known: vec!["linux-x86".to_string(), "linux-x86_64".to_string()],
        };
        let text = err.to_diagnostic().format(false);
        assert!(text.contains("unknown platform `mips`"));
        assert!(text.contains("linux-x86, linux-x86_64"));
    }

    #[test]
    fn test_unsupported_platform_carries_host_stats() {
        let err = ConfigError::UnsupportedPlatform {
            host: HostInfo::new("sparc64", "SunOS"),
        };
        let text = err.to_diagnostic().format(false);
        assert!(text.contains("Machine: sparc64"));
        assert!(text.contains("System: SunOS"));
    }

    #[test]
    fn test_dependency_failure_messages() {
        let err = ConfigError::DependencyUnsatisfied {
            name: "jack".to_string(),
            reason: DependencyFailure::VersionTooLow {
                min_version: "0.118".to_string(),
            },
        };
        assert!(err.to_string().contains("older than 0.118"));
    }
}
