//! Error types shared across Daymap crates.

use std::path::PathBuf;

/// Top-level error type for Daymap operations.
///
/// Data-quality problems (bad timestamps, out-of-range grid positions) are
/// never errors; they degrade to empty days or missed hits. Only I/O
/// boundaries and invalid arguments produce a `DaymapError`.
#[derive(Debug, thiserror::Error)]
pub enum DaymapError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Event input error: {message}")]
    Events { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Year {year} is outside the supported calendar range")]
    InvalidYear { year: i32 },

    #[error("Invalid calendar day: {input}")]
    InvalidDay { input: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DaymapError.
pub type DaymapResult<T> = Result<T, DaymapError>;

impl DaymapError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn events(msg: impl Into<String>) -> Self {
        Self::Events {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn invalid_day(input: impl Into<String>) -> Self {
        Self::InvalidDay {
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_input() {
        let err = DaymapError::invalid_day("2024-13-40");
        assert_eq!(err.to_string(), "Invalid calendar day: 2024-13-40");

        let err = DaymapError::InvalidYear { year: 400_000 };
        assert!(err.to_string().contains("400000"));
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> DaymapResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(DaymapError::Io(_))));
    }
}
