/// Error types for presentation parsing.
use thiserror::Error;

/// Result type for presentation parsing.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for presentation parsing.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Timing tree nested deeper than the configured cap
    #[error("Timing tree exceeds maximum depth of {0}")]
    TimingTooDeep(usize),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OoxmlError {
    /// Whether the error means the package as a whole cannot be processed.
    pub fn is_fatal(&self) -> bool {
        match self {
            OoxmlError::Opc(e) => e.is_fatal(),
            _ => false,
        }
    }
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<std::str::Utf8Error> for OoxmlError {
    fn from(err: std::str::Utf8Error) -> Self {
        OoxmlError::Xml(format!("Invalid UTF-8: {}", err))
    }
}
