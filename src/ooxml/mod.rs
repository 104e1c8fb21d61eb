//! Office Open XML (OOXML) presentation reading.
//!
//! The module is organized into layers:
//!
//! 1. **OPC Layer** (`opc`): ZIP container, partnames and relationships
//! 2. **Shared** (`error`, `metadata`): error type and document properties
//! 3. **PresentationML** (`pptx`): slide order, slide content, animations, media
//!
//! # Example
//!
//! ```rust,no_run
//! use slidetrack::common::NullSink;
//! use slidetrack::ooxml::opc::{OpcPackage, PackageLimits};
//! use slidetrack::ooxml::pptx::read_deck_structure;
//!
//! let bytes = std::fs::read("deck.pptx")?;
//! let pkg = OpcPackage::from_bytes(&bytes, &PackageLimits::default())?;
//! let deck = read_deck_structure(&pkg, &pkg.main_document_uri()?, &NullSink)?;
//! println!("{} slides", deck.slide_parts.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod metadata;
pub mod opc;
pub mod pptx;
pub(crate) mod xml;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
pub use metadata::{DeckMetadata, extract_metadata};
