//! Harness version information.
//!
//! Exposes the crate version as a single constant so the CLI and the generated
//! pipeline headers agree on the same value.

/// The harness version string (for example, `0.2.0`).
pub const LFT_VERSION: &str = env!("CARGO_PKG_VERSION");
