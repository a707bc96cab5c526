//! Shared utilities

pub mod diagnostic;
pub mod host;
pub mod pkgconfig;
pub mod process;
pub mod settings;

pub use diagnostic::Diagnostic;
pub use host::HostInfo;
pub use settings::Settings;
