//! High-level operations invoked by the CLI.

pub mod configure;

pub use configure::{configure, configure_with, ConfigureRequest, Resolved};
