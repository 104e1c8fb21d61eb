/// The in-memory OPC package.
///
/// This module provides the OpcPackage type, an immutable map of partname to
/// bytes built once from a ZIP buffer. Relationships are parsed on request from
/// the `_rels` parts, so a damaged `.rels` only affects the parts that consult it.
use crate::ooxml::opc::constants::{part_name, relationship_type};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::{PackageLimits, PhysPkgReader};
use crate::ooxml::opc::rel::Relationships;
use std::collections::HashMap;

/// Main API type for reading an OPC package.
///
/// Immutable after construction; `&OpcPackage` can be shared freely across
/// worker threads.
///
/// # Example
/// ```no_run
/// use slidetrack::ooxml::opc::{OpcPackage, PackageLimits};
///
/// let bytes = std::fs::read("deck.pptx")?;
/// let pkg = OpcPackage::from_bytes(&bytes, &PackageLimits::default())?;
/// let rels = pkg.relationships_for("/ppt/presentation.xml")?;
/// println!("presentation declares {} relationships", rels.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct OpcPackage {
    /// All parts in the package, indexed by partname
    parts: HashMap<PackURI, Vec<u8>>,
}

impl OpcPackage {
    /// Open an OPC package from a byte buffer.
    ///
    /// # Errors
    /// `PackageCorrupt` if the buffer is not a ZIP container and
    /// `LimitExceeded` if it inflates past `limits`.
    pub fn from_bytes(data: &[u8], limits: &PackageLimits) -> Result<Self> {
        let parts = PhysPkgReader::read_all(data, limits)?;
        Ok(Self { parts })
    }

    /// Get the bytes of a part by its partname.
    #[inline]
    pub fn part(&self, partname: &PackURI) -> Option<&[u8]> {
        self.parts.get(partname).map(Vec::as_slice)
    }

    /// Get the bytes of a part by path, e.g. `"/ppt/slides/slide1.xml"`.
    ///
    /// A path without a leading slash is treated as a ZIP member name.
    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        let uri = if path.starts_with('/') {
            PackURI::new(path)
        } else {
            PackURI::from_membername(path)
        };
        uri.ok().and_then(|uri| self.part(&uri))
    }

    /// Get the bytes of a part, failing with `PartNotFound` if absent.
    pub fn require_part(&self, partname: &PackURI) -> Result<&[u8]> {
        self.part(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Check if a part exists in the package.
    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    /// Get the relationships declared by a part.
    ///
    /// Reads the sibling `_rels/<name>.rels` part. A missing rels part yields an
    /// empty collection rather than an error.
    pub fn relationships(&self, source: &PackURI) -> Result<Relationships> {
        let rels_uri = source.rels_uri().map_err(OpcError::InvalidPackUri)?;
        match self.part(&rels_uri) {
            Some(xml) => Relationships::from_xml(xml, source.base_uri()),
            None => Ok(Relationships::new()),
        }
    }

    /// Get the relationships declared by a part given as a path string.
    pub fn relationships_for(&self, path: &str) -> Result<Relationships> {
        let uri = PackURI::new(path).map_err(OpcError::InvalidPackUri)?;
        self.relationships(&uri)
    }

    /// Get the package-level relationships (`/_rels/.rels`).
    pub fn package_relationships(&self) -> Result<Relationships> {
        let root = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        self.relationships(&root)
    }

    /// Locate the main document part.
    ///
    /// Follows the package officeDocument relationship and falls back to the
    /// conventional `/ppt/presentation.xml` when the package rels are missing or
    /// unusable.
    pub fn main_document_uri(&self) -> Result<PackURI> {
        if let Ok(rels) = self.package_relationships()
            && let Some(rel) = rels.first_of_type(relationship_type::OFFICE_DOCUMENT)
            && let Ok(uri) = rel.target_partname()
            && self.contains_part(&uri)
        {
            return Ok(uri);
        }

        let fallback = PackURI::new(part_name::PRESENTATION).map_err(OpcError::InvalidPackUri)?;
        if self.contains_part(&fallback) {
            Ok(fallback)
        } else {
            Err(OpcError::PartNotFound(
                "main presentation part".to_string(),
            ))
        }
    }

    /// Get an iterator over all partnames, in sorted order.
    pub fn partnames(&self) -> impl Iterator<Item = &PackURI> {
        let mut names: Vec<&PackURI> = self.parts.keys().collect();
        names.sort();
        names.into_iter()
    }

    /// Get the number of parts in the package.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
