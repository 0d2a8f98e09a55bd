//! Error handling

/// Errors raised by the image pipeline. Every variant is fatal: each
/// external call is attempted exactly once and failures propagate
/// straight to the top-level run.
#[derive(Debug)]
pub enum AqiscapeError {
    /// AQI provider unreachable, or it reported a non-ok status
    Upstream(String),
    /// Image provider returned no usable image
    Generation(String),
    /// Fetching the generated image failed or yielded undecodable bytes
    Download(String),
    /// Local write/copy failure
    Io(std::io::Error),
}

impl std::fmt::Display for AqiscapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upstream(message) => write!(f, "AQI provider error: {message}"),
            Self::Generation(message) => write!(f, "Image generation error: {message}"),
            Self::Download(message) => write!(f, "Image download error: {message}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for AqiscapeError {}

impl From<std::io::Error> for AqiscapeError {
    fn from(err: std::io::Error) -> Self {
        AqiscapeError::Io(err)
    }
}
