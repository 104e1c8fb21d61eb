/// Error types for OPC package operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    /// The buffer is not a readable ZIP container.
    #[error("Package corrupt: {0}")]
    PackageCorrupt(String),

    /// A size or entry-count bound was hit while inflating the container.
    #[error("Package limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Quick-XML error: {0}")]
    QuickXmlError(#[from] quick_xml::Error),

    #[error("Attribute error: {0}")]
    AttrError(String),
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::AttrError(err.to_string())
    }
}

impl OpcError {
    /// Whether the error means the package as a whole is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OpcError::PackageCorrupt(_) | OpcError::LimitExceeded(_) | OpcError::ZipError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
