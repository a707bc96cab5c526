//! Slipway CLI - build-configuration resolution for native builds

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Target};
use slipway::ops::{self, ConfigureRequest};
use slipway::ConfigError;

fn main() {
    if let Err(e) = run() {
        if let Some(config_err) = e.downcast_ref::<ConfigError>() {
            let color = std::io::stderr().is_terminal();
            eprint!("{}", config_err.to_diagnostic().format(color));
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("slipway=debug")
    } else {
        EnvFilter::new("slipway=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let invocation = cli::parse_words(&cli.words)?;

    let request = ConfigureRequest {
        assignments: invocation.assignments,
        requires: cli::parse_requires(&cli.requires)?,
        ..ConfigureRequest::default()
    };

    let resolved = ops::configure(&request)?;

    match invocation.target {
        Target::Dump => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{}", resolved.render_dump());
            }
        }
        Target::Install => {
            println!("install => {}", resolved.environment.install_dir);
        }
        Target::Configure => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!(
                    "Toolchain: {}\nPlatform: {}\nVariant: {}\nJobs: {}",
                    resolved.environment.toolchain_name,
                    resolved.environment.platform_name,
                    resolved.environment.variant_dir,
                    resolved.jobs,
                );
            }
        }
    }

    Ok(())
}
