/// Error types for document editing operations.
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the editing engine and its storage edge.
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes are not a readable document package
    #[error("malformed package: {0}")]
    MalformedPackage(String),

    /// Storage locator unknown to the collaborator
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Strict structural index outside the current tree size
    #[error("{what} index {index} out of range. Document has {len} {what}s.")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Ragged or empty input grid for a table operation
    #[error("invalid table shape: {0}")]
    InvalidTableShape(String),

    /// Style name not present in the document stylesheet
    #[error("unknown style: {0}")]
    UnknownStyle(String),

    /// Image payload is neither a decodable inline encoding nor a known raster format
    #[error("invalid image data: {0}")]
    InvalidImageData(String),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failure
    #[error("task error: {0}")]
    Task(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
