//! Slipway - build-configuration resolution for cross-platform native builds
//!
//! This crate validates a target platform against a compiler toolchain,
//! negotiates their capability flags, derives paths and compiler/linker
//! settings, and checks external native dependencies. The result is a
//! fully resolved, read-only environment handed to an external build
//! executor; Slipway itself never invokes a compiler.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

pub use core::{Environment, FeatureSet, Platform, PlatformOverride, Registry, Toolchain};
pub use resolver::{ConfigError, DependencyRequest};
pub use util::{HostInfo, Settings};
