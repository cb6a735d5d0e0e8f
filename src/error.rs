//! Error types for the print_quote library

use thiserror::Error;

/// Result type alias for print_quote operations
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Error types for coverage measurement and pricing operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Width, height, length or percentage that cannot be classified or priced
    #[error("Invalid dimension: {parameter} = {value}")]
    InvalidDimension { parameter: String, value: f64 },

    /// Sheet category missing from the cost tables
    #[error("Unknown sheet category: {key}")]
    UnknownCategory { key: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A pixel statistics backend could not process the buffer
    #[error("Pixel backend '{backend}' failed: {message}")]
    BackendError { backend: String, message: String },

    /// Measures rejected for a large-format material
    #[error("Unsupported measure for {material}: {reason}")]
    UnsupportedMeasure { material: String, reason: String },
}

impl QuoteError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration validation error without an underlying cause
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn invalid_dimension(parameter: impl Into<String>, value: f64) -> Self {
        Self::InvalidDimension {
            parameter: parameter.into(),
            value,
        }
    }

    pub(crate) fn unknown_category(key: impl Into<String>) -> Self {
        Self::UnknownCategory { key: key.into() }
    }

    /// Check if this error indicates a condition the user can fix by changing input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QuoteError::InvalidDimension { .. }
                | QuoteError::InvalidParameter { .. }
                | QuoteError::UnsupportedMeasure { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            QuoteError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            QuoteError::InvalidDimension { parameter, .. } => {
                format!("The {} must be a positive number.", parameter.replace('_', " "))
            }
            QuoteError::UnknownCategory { key } => {
                format!("There is no price defined for sheet type '{}'.", key)
            }
            QuoteError::UnsupportedMeasure { material, reason } => {
                format!("{} cannot be quoted with these measures: {}.", material, reason)
            }
            QuoteError::ConfigError { .. } => {
                "The price configuration could not be loaded. Please check the configuration file."
                    .to_string()
            }
            _ => "The quotation failed. Please try with different input.".to_string(),
        }
    }
}
