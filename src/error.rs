use thiserror::Error;

/// Errors raised by the painting core
#[derive(Debug, Error)]
pub enum PaintError {
    /// Malformed construction input, e.g. a sample with non-finite coordinates
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// History index outside the retained window
    #[error("History index {index} out of bounds [{min}, {max}]")]
    OutOfBounds { index: usize, min: usize, max: usize },

    /// Tool name that is not registered with the session
    #[error("No such tool: {0}")]
    UnknownTool(String),

    /// Option key that the tool does not expose
    #[error("Tool '{tool}' has no option '{key}'")]
    UnknownOption { tool: &'static str, key: String },

    /// Color string in none of the accepted formats
    #[error("Invalid color string: {0}")]
    InvalidColor(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for painting operations
pub type PaintResult<T> = Result<T, PaintError>;
