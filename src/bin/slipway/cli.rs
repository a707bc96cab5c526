//! Command-line definitions for Slipway.

use anyhow::{bail, Result};
use clap::Parser;

use slipway::DependencyRequest;

/// Build-configuration resolver for cross-platform native builds.
///
/// Settings are given as `NAME=VALUE` words and persist in `build.cfg`,
/// so `slipway debug=1` followed by a plain `slipway` keeps resolving a
/// debug configuration.
#[derive(Debug, Parser)]
#[command(name = "slipway", version, about)]
pub struct Cli {
    /// Targets (`dump`, `install`) and `NAME=VALUE` settings assignments
    #[arg(value_name = "TARGET|NAME=VALUE")]
    pub words: Vec<String>,

    /// Required external library: `name[>=MINVER][:APT_PACKAGE]`
    #[arg(long = "require", value_name = "SPEC")]
    pub requires: Vec<String>,

    /// Emit the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the invocation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Resolve and print a short summary
    #[default]
    Configure,
    /// Print the full resolved environment and host diagnostics, then exit
    Dump,
    /// Resolve and report the installation destination
    Install,
}

/// The positional words, split into a target and settings assignments.
#[derive(Debug, Default)]
pub struct Invocation {
    pub target: Target,
    pub assignments: Vec<(String, String)>,
}

/// Split positional words into `NAME=VALUE` assignments and at most one
/// recognized target word.
pub fn parse_words(words: &[String]) -> Result<Invocation> {
    let mut invocation = Invocation::default();
    let mut target_seen = false;

    for word in words {
        if let Some((key, value)) = word.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                bail!("expected `NAME=VALUE`, got `{}`", word);
            }
            invocation
                .assignments
                .push((key.to_string(), value.trim().to_string()));
            continue;
        }
        let target = match word.as_str() {
            "dump" => Target::Dump,
            "install" => Target::Install,
            other => bail!("unknown target `{}`; expected `dump` or `install`", other),
        };
        if target_seen {
            bail!("at most one target may be given");
        }
        invocation.target = target;
        target_seen = true;
    }

    Ok(invocation)
}

/// Parse the `--require` specs.
pub fn parse_requires(specs: &[String]) -> Result<Vec<DependencyRequest>> {
    specs
        .iter()
        .map(|spec| {
            spec.parse::<DependencyRequest>()
                .map_err(|e| anyhow::anyhow!("invalid --require spec: {}", e))
        })
        .collect()
}
