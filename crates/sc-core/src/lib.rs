//! Core types shared by the shapecmp crates.

pub mod error;

pub use error::{Error, Result};

/// Tool version string (workspace version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
