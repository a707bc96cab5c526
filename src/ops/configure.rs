//! End-to-end configuration: settings, selection, resolution, dependencies.
//!
//! This is the one-shot pass that runs before any compilation: load and
//! persist settings, pick (or auto-detect) the toolchain/platform pair,
//! resolve the environment, and validate external dependencies. The
//! returned [`Resolved`] snapshot is what an external build executor
//! consumes; executing the build is out of scope here.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::builtin::default_registry;
use crate::core::environment::Environment;
use crate::core::registry::Registry;
use crate::resolver::deps::{check_dependency, DependencyRequest, PackageQuery};
use crate::resolver::resolve::{resolve, InstallPaths, ResolveOptions};
use crate::util::host::HostInfo;
use crate::util::pkgconfig::PkgConfig;
use crate::util::settings::{Settings, SETTINGS_FILE};

/// Inputs for a configuration pass.
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    /// Settings file location; the fixed [`SETTINGS_FILE`] by default
    pub settings_path: PathBuf,
    /// `NAME=VALUE` assignments from the command line
    pub assignments: Vec<(String, String)>,
    /// External libraries the project requires
    pub requires: Vec<DependencyRequest>,
}

impl Default for ConfigureRequest {
    fn default() -> Self {
        ConfigureRequest {
            settings_path: PathBuf::from(SETTINGS_FILE),
            assignments: Vec::new(),
            requires: Vec::new(),
        }
    }
}

/// The completed configuration handed to the external build executor.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved {
    /// The frozen environment
    pub environment: Environment,
    /// Parallel job count for the executor, already clamped
    pub jobs: usize,
    /// Condensed vs verbose command echoing by the executor
    pub tidy: bool,
    /// Host diagnostics captured at resolution time
    pub host: HostInfo,
}

impl Resolved {
    /// Render the `dump` target output: the full environment, host
    /// diagnostics, and the chosen names.
    pub fn render_dump(&self) -> String {
        format!(
            "{}\njobs = {}\ntidy = {}\n\n{}\n\nToolchain: {}\nPlatform: {}",
            self.environment,
            self.jobs,
            self.tidy,
            self.host,
            self.environment.toolchain_name,
            self.environment.platform_name,
        )
    }
}

/// Run a configuration pass with the built-in registry, the detected
/// host, and the real pkg-config backend.
pub fn configure(request: &ConfigureRequest) -> Result<Resolved> {
    let registry = default_registry()?;
    let host = HostInfo::detect();
    let mut query = PkgConfig::new();
    configure_with(request, &registry, &host, &mut query)
}

/// Run a configuration pass against explicit collaborators. Tests use
/// this with a fixed host and a scripted query backend.
pub fn configure_with(
    request: &ConfigureRequest,
    registry: &Registry,
    host: &HostInfo,
    query: &mut dyn PackageQuery,
) -> Result<Resolved> {
    let mut settings = Settings::load_or_default(&request.settings_path)?;
    for (key, value) in &request.assignments {
        settings.set(key, value);
    }
    settings.validate()?;

    let debug = settings.debug()?;
    let jobs = settings.jobs()?;
    let tidy = settings.tidy()?;

    let toolchain = match settings.toolchain() {
        "auto" => registry.auto_detect_toolchain(host)?,
        name => registry.toolchain(name)?,
    };
    let platform = match settings.platform() {
        "auto" => registry.auto_detect_platform(host)?,
        name => registry.platform(name)?,
    };

    // Settings persist only once every value has validated, so a typo'd
    // run never poisons the next plain invocation.
    settings.save(&request.settings_path)?;

    let mode = if debug { "debug" } else { "release" };
    tracing::info!(
        "configuring `{}` for `{}` ({})",
        toolchain.name(),
        platform.name(),
        mode
    );

    let options = ResolveOptions {
        debug,
        install: InstallPaths {
            destdir: settings.destdir().to_string(),
            prefix: settings.prefix().to_string(),
            bindir: settings.bindir().to_string(),
            libdir: settings.libdir().map(str::to_string),
            includedir: settings.includedir().to_string(),
            etcdir: settings.etcdir().to_string(),
            sharedir: settings.sharedir().to_string(),
            docdir: settings.docdir().to_string(),
        },
    };

    let mut environment = resolve(toolchain, platform, &options)?;

    for require in &request.requires {
        let outcome = check_dependency(&mut environment, query, require)?;
        tracing::debug!("dependency `{}`: {:?}", require.name, outcome);
    }

    Ok(Resolved {
        environment,
        jobs,
        tidy,
        host: host.clone(),
    })
}
