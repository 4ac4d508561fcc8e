//! Error types for shapecmp

use thiserror::Error;

/// shapecmp error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or unreadable input data
    #[error("Input error: {0}")]
    Input(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let e = Error::Input("missing column 'mJJ'".into());
        assert!(format!("{e}").starts_with("Input error:"));

        let e = Error::Validation("column length mismatch".into());
        assert!(format!("{e}").contains("length mismatch"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
