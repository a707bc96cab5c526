//! Core data structures for Slipway.
//!
//! This module contains the foundational types used throughout the
//! resolver:
//! - Platform and toolchain descriptors
//! - Capability flags and negotiation
//! - The descriptor registry with auto-detection
//! - The resolved environment snapshot

pub mod builtin;
pub mod environment;
pub mod features;
pub mod platform;
pub mod registry;
pub mod toolchain;

pub use environment::Environment;
pub use features::FeatureSet;
pub use platform::Platform;
pub use registry::Registry;
pub use toolchain::{PlatformOverride, Toolchain};
