use thiserror::Error;

/// Error types for Epe metric operations
#[derive(Error, Debug)]
pub enum EpeError {
    /// Malformed input: non-finite coefficients, mismatched lengths, degenerate
    /// ranges, an unknown column or a column with no reference value
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reading a configuration or data file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing CSV failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration file is not valid TOML for `EpeConfig`
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be written as TOML
    #[error("Configuration serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl EpeError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EpeError::InvalidInput(msg.into())
    }

    /// Returns true for the `InvalidInput` kind
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, EpeError::InvalidInput(_))
    }
}

/// Result type for Epe operations
pub type Result<T> = std::result::Result<T, EpeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = EpeError::invalid("deg must be >= 0");
        assert_eq!(err.to_string(), "Invalid input: deg must be >= 0");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EpeError = io.into();
        assert!(matches!(err, EpeError::Io(_)));
        assert!(!err.is_invalid_input());
    }
}
