//! pkg-config and apt-get backed [`PackageQuery`] implementation.
//!
//! All external calls run under a deadline; a hung tool reports as a
//! timeout failure instead of stalling resolution.

use std::time::Duration;

use crate::resolver::deps::PackageQuery;
use crate::resolver::errors::DependencyFailure;
use crate::util::process::{ProcessBuilder, TimedOutput};

/// Deadline for pkg-config queries.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Deadline for a package installation. Generous: apt-get may download.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Production query backend shelling out to `pkg-config` and `apt-get`.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    query_timeout: Duration,
    install_timeout: Duration,
}

impl PkgConfig {
    /// Backend with the default deadlines.
    pub fn new() -> Self {
        PkgConfig {
            query_timeout: QUERY_TIMEOUT,
            install_timeout: INSTALL_TIMEOUT,
        }
    }

    /// Override both deadlines; used by tests with stub executables.
    pub fn with_timeouts(query_timeout: Duration, install_timeout: Duration) -> Self {
        PkgConfig {
            query_timeout,
            install_timeout,
        }
    }

    fn run(
        &self,
        builder: ProcessBuilder,
        timeout: Duration,
    ) -> Result<std::process::Output, DependencyFailure> {
        let tool = builder.get_program().display().to_string();
        match builder.exec_with_timeout(timeout) {
            Ok(TimedOutput::Completed(output)) => Ok(output),
            Ok(TimedOutput::TimedOut) => Err(DependencyFailure::Timeout { tool }),
            Err(e) => Err(DependencyFailure::QueryError {
                message: format!("{:#}", e),
            }),
        }
    }
}

impl Default for PkgConfig {
    fn default() -> Self {
        PkgConfig::new()
    }
}

impl PackageQuery for PkgConfig {
    fn exists(&mut self, name: &str) -> Result<bool, DependencyFailure> {
        let output = self.run(
            ProcessBuilder::new("pkg-config").args(["--exists", name]),
            self.query_timeout,
        )?;
        Ok(output.status.success())
    }

    fn exists_at_least(
        &mut self,
        name: &str,
        min_version: &str,
    ) -> Result<bool, DependencyFailure> {
        let constraint = format!("{} >= {}", name, min_version);
        let output = self.run(
            ProcessBuilder::new("pkg-config").args(["--exists", &constraint]),
            self.query_timeout,
        )?;
        Ok(output.status.success())
    }

    fn build_flags(&mut self, name: &str) -> Result<Vec<String>, DependencyFailure> {
        let output = self.run(
            ProcessBuilder::new("pkg-config").args(["--cflags", "--libs", name]),
            self.query_timeout,
        )?;
        if !output.status.success() {
            return Err(DependencyFailure::QueryError {
                message: format!(
                    "pkg-config could not report flags for `{}`: {}",
                    name,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(split_flags(&String::from_utf8_lossy(&output.stdout)))
    }

    fn install(&mut self, package: &str) -> Result<bool, DependencyFailure> {
        let output = self.run(
            ProcessBuilder::new("sudo").args(["apt-get", "install", "-y", package]),
            self.install_timeout,
        )?;
        Ok(output.status.success())
    }
}

/// Split pkg-config output into individual flags.
fn split_flags(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_flags() {
        assert_eq!(
            split_flags("-I/usr/include/jack  -ljack\n"),
            vec!["-I/usr/include/jack", "-ljack"]
        );
        assert!(split_flags("  \n").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_tool_is_query_error() {
        // A backend pointed at a nonexistent tool must fail loudly, not
        // report the library as absent.
        let pc = PkgConfig::with_timeouts(Duration::from_secs(1), Duration::from_secs(1));
        let builder = ProcessBuilder::new("/nonexistent/pkg-config").args(["--exists", "jack"]);
        let err = pc.run(builder, pc.query_timeout).unwrap_err();
        assert!(matches!(err, DependencyFailure::QueryError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_tool_is_timeout() {
        let pc = PkgConfig::with_timeouts(Duration::from_millis(100), Duration::from_millis(100));
        let builder = ProcessBuilder::new("sleep").arg("30");
        let err = pc.run(builder, pc.query_timeout).unwrap_err();
        assert_eq!(
            err,
            DependencyFailure::Timeout {
                tool: "sleep".to_string()
            }
        );
    }
}
