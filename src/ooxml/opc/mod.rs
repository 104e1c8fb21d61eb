/// Open Packaging Conventions (OPC) implementation.
///
/// This module provides the read side of the OPC specification, which defines the
/// structure and packaging format for Office Open XML documents:
///
/// - Package structure (parts, relationships)
/// - ZIP-based physical packaging with decompression bounds
/// - Relationship resolution (`rId` → target partname)
///
/// The package is immutable once opened and is shared by reference across
/// per-slide workers.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use phys_pkg::PackageLimits;
pub use rel::{Relationship, Relationships};
