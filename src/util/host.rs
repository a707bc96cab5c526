//! Host machine probing.
//!
//! Produces the diagnostics printed when auto-detection fails and by the
//! `dump` target: machine, processor, system, release, version.

use std::fmt;

use serde::Serialize;

use crate::util::process::ProcessBuilder;

/// Upper bound on the parallel job count handed to the build executor.
pub const MAX_JOBS: usize = 8;

/// Snapshot of the host machine's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    /// CPU architecture tag (e.g., `x86_64`, `i686`)
    pub machine: String,
    /// Processor description; falls back to the machine tag
    pub processor: String,
    /// OS family tag (e.g., `Linux`, `Windows`, `Darwin`)
    pub system: String,
    /// Kernel release string
    pub release: String,
    /// Kernel version string
    pub version: String,
}

impl HostInfo {
    /// Probe the current host.
    pub fn detect() -> Self {
        let machine = machine_tag(std::env::consts::ARCH).to_string();
        HostInfo {
            processor: machine.clone(),
            machine,
            system: system_tag(std::env::consts::OS).to_string(),
            release: uname("-r"),
            version: uname("-v"),
        }
    }

    /// Construct a host identity directly; used by tests and overrides.
    pub fn new(machine: impl Into<String>, system: impl Into<String>) -> Self {
        let machine = machine.into();
        HostInfo {
            processor: machine.clone(),
            machine,
            system: system.into(),
            release: "unknown".to_string(),
            version: "unknown".to_string(),
        }
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine: {}", self.machine)?;
        writeln!(f, "Processor: {}", self.processor)?;
        writeln!(f, "System: {}", self.system)?;
        writeln!(f, "Release: {}", self.release)?;
        write!(f, "Version: {}", self.version)
    }
}

/// Map Rust's arch constant to the tag used in platform descriptors.
fn machine_tag(arch: &str) -> &str {
    match arch {
        "x86" => "i686",
        other => other,
    }
}

/// Map Rust's OS constant to the family tag used in descriptors.
fn system_tag(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "windows" => "Windows",
        "macos" => "Darwin",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn uname(flag: &str) -> String {
    if cfg!(unix) {
        ProcessBuilder::new("uname")
            .arg(flag)
            .exec()
            .ok()
            .filter(|out| out.status.success())
            .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    } else {
        "unknown".to_string()
    }
}

/// Default parallel job count: available parallelism clamped to 1..=MAX_JOBS.
pub fn default_jobs() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    cpus.clamp(1, MAX_JOBS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_populates_all_fields() {
        let host = HostInfo::detect();
        assert!(!host.machine.is_empty());
        assert!(!host.system.is_empty());
        assert!(!host.release.is_empty());
        assert!(!host.version.is_empty());
    }

    #[test]
    fn test_system_tag_mapping() {
        assert_eq!(system_tag("linux"), "Linux");
        assert_eq!(system_tag("macos"), "Darwin");
        assert_eq!(system_tag("windows"), "Windows");
    }

    #[test]
    fn test_machine_tag_mapping() {
        assert_eq!(machine_tag("x86_64"), "x86_64");
        assert_eq!(machine_tag("x86"), "i686");
    }

    #[test]
    fn test_default_jobs_bounds() {
        let jobs = default_jobs();
        assert!((1..=MAX_JOBS).contains(&jobs));
    }

    #[test]
    fn test_display_lists_five_diagnostics() {
        let host = HostInfo::new("x86_64", "Linux");
        let text = host.to_string();
        for label in ["Machine:", "Processor:", "System:", "Release:", "Version:"] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
