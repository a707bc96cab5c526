//! Persisted build settings.
//!
//! Settings live in a flat `name=value` file at a fixed path (`build.cfg`)
//! next to the project, the same file the command line writes through:
//! assignments given as `NAME=VALUE` arguments are merged over the file
//! contents and saved back, so a choice made once sticks for later runs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::resolver::errors::ConfigError;
use crate::util::host::{default_jobs, MAX_JOBS};

/// Fixed settings file path, relative to the invocation directory.
pub const SETTINGS_FILE: &str = "build.cfg";

/// The recognized settings keys, and nothing else.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "debug",
    "toolchain",
    "platform",
    "jobs",
    "destdir",
    "prefix",
    "bindir",
    "libdir",
    "includedir",
    "etcdir",
    "sharedir",
    "docdir",
    "tidy",
];

/// Explicit `name=value` assignments, from the settings file and the
/// command line. Unset keys fall back to their documented defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Create empty settings (all defaults).
    pub fn new() -> Self {
        Settings::default()
    }

    /// Load settings from a file; a missing file means empty settings.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::new());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file: {}", path.display()))
    }

    /// Parse flat `name=value` lines. Blank lines and `#` comments are
    /// skipped.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                bail!("line {}: expected `name=value`, got `{}`", lineno + 1, line);
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Settings { values })
    }

    /// Record an explicit assignment, replacing any prior value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Reject settings containing keys outside [`RECOGNIZED_KEYS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unknown: Vec<String> = self
            .values
            .keys()
            .filter(|k| !RECOGNIZED_KEYS.contains(&k.as_str()))
            .cloned()
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::UnknownVariables { keys: unknown })
        }
    }

    /// Write explicit assignments back, one `name=value` per line, sorted.
    ///
    /// Saving and reloading yields identical settings, so re-running
    /// without new assignments never changes the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for (key, value) in &self.values {
            contents.push_str(&format!("{}={}\n", key, value));
        }
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write settings file: {}", path.display()))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => parse_bool(raw).ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected: "a boolean (true/false, yes/no, on/off, 1/0)".to_string(),
            }),
        }
    }

    /// Debug vs release configuration. Default: release.
    pub fn debug(&self) -> Result<bool, ConfigError> {
        self.get_bool("debug", false)
    }

    /// Verbose vs condensed command echoing by the executor. Default: tidy.
    pub fn tidy(&self) -> Result<bool, ConfigError> {
        self.get_bool("tidy", true)
    }

    /// Selected toolchain name, or `auto`.
    pub fn toolchain(&self) -> &str {
        self.get("toolchain").unwrap_or("auto")
    }

    /// Selected platform name, or `auto`.
    pub fn platform(&self) -> &str {
        self.get("platform").unwrap_or("auto")
    }

    /// Parallel job count for the external executor, in 1..=8.
    pub fn jobs(&self) -> Result<usize, ConfigError> {
        match self.get("jobs") {
            None => Ok(default_jobs()),
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_JOBS).contains(&n) => Ok(n),
                _ => Err(ConfigError::InvalidValue {
                    key: "jobs".to_string(),
                    value: raw.to_string(),
                    expected: format!("an integer between 1 and {}", MAX_JOBS),
                }),
            },
        }
    }

    /// Root path of installation. Default: empty.
    pub fn destdir(&self) -> &str {
        self.get("destdir").unwrap_or("")
    }

    /// Prefix for all installed files, relative to destdir.
    pub fn prefix(&self) -> &str {
        self.get("prefix").unwrap_or("/usr/local")
    }

    /// Prefix for binaries, relative to prefix.
    pub fn bindir(&self) -> &str {
        self.get("bindir").unwrap_or("/bin")
    }

    /// Prefix for libraries, relative to prefix. Unset resolves to the
    /// platform's machine_libdir.
    pub fn libdir(&self) -> Option<&str> {
        self.get("libdir")
    }

    /// Prefix for headers, relative to prefix.
    pub fn includedir(&self) -> &str {
        self.get("includedir").unwrap_or("/include")
    }

    /// Prefix for config files, relative to destdir.
    pub fn etcdir(&self) -> &str {
        self.get("etcdir").unwrap_or("/usr/local/etc")
    }

    /// Prefix for shared resources, relative to prefix.
    pub fn sharedir(&self) -> &str {
        self.get("sharedir").unwrap_or("/share")
    }

    /// Prefix for documentation, relative to prefix.
    pub fn docdir(&self) -> &str {
        self.get("docdir").unwrap_or("/doc")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
