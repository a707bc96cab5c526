//! External dependency checking.
//!
//! For each required library the resolver asks a [`PackageQuery`] backend
//! whether the library is present, optionally enforces a minimum version,
//! and on platforms with an OS package manager makes exactly one attempt
//! to install a missing library before giving up.
//!
//! State machine per dependency:
//!
//! ```text
//! unchecked -> satisfied                      (direct hit)
//! unchecked -> attempting-install -> satisfied (install, recheck hits)
//! unchecked -> attempting-install -> failed    (recheck still misses)
//! unchecked -> failed                          (no fallback available)
//! ```
//!
//! There is no retry loop; the single install-then-recheck is the only
//! bounded exception to fail-fast resolution.

use std::fmt;
use std::str::FromStr;

use crate::core::environment::Environment;
use crate::core::features::{HAS_APTGET, HAS_PKGCONFIG};
use crate::resolver::errors::{ConfigError, DependencyFailure};

/// Backend answering package queries and performing installs.
///
/// The production implementation shells out to pkg-config and apt-get;
/// tests substitute a scripted fake.
pub trait PackageQuery {
    /// Whether the library is known to the query tool.
    fn exists(&mut self, name: &str) -> Result<bool, DependencyFailure>;

    /// Whether the library is present at least at the given version.
    fn exists_at_least(&mut self, name: &str, min_version: &str)
        -> Result<bool, DependencyFailure>;

    /// Compiler/linker flags the library requires.
    fn build_flags(&mut self, name: &str) -> Result<Vec<String>, DependencyFailure>;

    /// Install an OS package; `Ok(false)` means the tool ran but failed.
    fn install(&mut self, package: &str) -> Result<bool, DependencyFailure>;
}

/// A required external library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    /// Library name as the query tool knows it (e.g. `jack`)
    pub name: String,
    /// Minimum acceptable version, if any
    pub min_version: Option<String>,
    /// OS package that provides the library, enabling the install fallback
    pub package: Option<String>,
}

impl DependencyRequest {
    /// A plain existence requirement.
    pub fn new(name: impl Into<String>) -> Self {
        DependencyRequest {
            name: name.into(),
            min_version: None,
            package: None,
        }
    }

    /// Require at least the given version.
    pub fn at_least(mut self, min_version: impl Into<String>) -> Self {
        self.min_version = Some(min_version.into());
        self
    }

    /// Name the OS package used for the install fallback.
    pub fn from_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

impl FromStr for DependencyRequest {
    type Err = String;

    /// Grammar: `name`, `name>=MIN`, `name:PACKAGE`, `name>=MIN:PACKAGE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (spec, package) = match s.split_once(':') {
            Some((spec, pkg)) if !pkg.is_empty() => (spec, Some(pkg.to_string())),
            Some((_, _)) => return Err(format!("empty package name in `{}`", s)),
            None => (s, None),
        };
        let (name, min_version) = match spec.split_once(">=") {
            Some((name, min)) if !min.is_empty() => (name, Some(min.to_string())),
            Some((_, _)) => return Err(format!("empty minimum version in `{}`", s)),
            None => (spec, None),
        };
        if name.is_empty() {
            return Err(format!("empty dependency name in `{}`", s));
        }
        Ok(DependencyRequest {
            name: name.to_string(),
            min_version,
            package,
        })
    }
}

impl fmt::Display for DependencyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(min) = &self.min_version {
            write!(f, ">={}", min)?;
        }
        if let Some(pkg) = &self.package {
            write!(f, ":{}", pkg)?;
        }
        Ok(())
    }
}

/// How a dependency ended up satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Present without intervention (or checking is a no-op on this
    /// platform).
    Satisfied,
    /// Present after the one-shot install fallback.
    SatisfiedAfterInstall,
}

/// Check one dependency, merging its build flags into the environment.
///
/// On platforms without the package-query capability this is a no-op that
/// reports [`CheckOutcome::Satisfied`] and never touches the backend.
pub fn check_dependency(
    env: &mut Environment,
    query: &mut dyn PackageQuery,
    request: &DependencyRequest,
) -> Result<CheckOutcome, ConfigError> {
    if !env.features.enabled(HAS_PKGCONFIG) {
        tracing::debug!(
            "no package-query capability, assuming `{}` is satisfied",
            request.name
        );
        return Ok(CheckOutcome::Satisfied);
    }

    let fail = |reason: DependencyFailure| ConfigError::DependencyUnsatisfied {
        name: request.name.clone(),
        reason,
    };

    let mut found = query.exists(&request.name).map_err(fail)?;
    let mut outcome = CheckOutcome::Satisfied;

    if !found {
        match &request.package {
            Some(package) if env.features.enabled(HAS_APTGET) => {
                tracing::info!(
                    "dependency `{}` missing, attempting to install `{}`",
                    request.name,
                    package
                );
                if query.install(package).map_err(fail)? {
                    found = query.exists(&request.name).map_err(fail)?;
                }
                if !found {
                    return Err(fail(DependencyFailure::InstallFailed {
                        package: package.clone(),
                    }));
                }
                outcome = CheckOutcome::SatisfiedAfterInstall;
            }
            _ => return Err(fail(DependencyFailure::Missing)),
        }
    }

    if let Some(min_version) = &request.min_version {
        if !query
            .exists_at_least(&request.name, min_version)
            .map_err(fail)?
        {
            return Err(fail(DependencyFailure::VersionTooLow {
                min_version: min_version.clone(),
            }));
        }
    }

    let flags = query.build_flags(&request.name).map_err(fail)?;
    env.merge_flags(flags);

    Ok(outcome)
}
