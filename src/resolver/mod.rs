//! Configuration resolution.
//!
//! The resolver is pure and deterministic: the only I/O happens in the
//! dependency checks, behind the [`deps::PackageQuery`] seam.

pub mod deps;
pub mod errors;
pub mod resolve;

pub use deps::{check_dependency, CheckOutcome, DependencyRequest, PackageQuery};
pub use errors::{ConfigError, DependencyFailure};
pub use resolve::{resolve, InstallPaths, ResolveOptions};
