/// Relationship-related objects for OPC packages.
///
/// This module provides types for reading the relationships declared by a part
/// in its `_rels/<name>.rels` sibling, including internal and external targets.
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
///
/// Identified by an rId. Can be either internal (pointing to another part)
/// or external (pointing to a URL outside the package).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI or external URL
    target_ref: String,

    /// Base URI for resolving relative references
    base_uri: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the raw target reference as written in the .rels part.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Get the absolute target partname for internal relationships.
    ///
    /// Returns an error if this is an external relationship.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} targets external resource '{}'",
                self.r_id, self.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref).map_err(OpcError::InvalidPackUri)
    }
}

/// Collection of relationships declared by a single source part.
///
/// Keeps document order for iteration and a hash index for O(1) lookup by rId.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Relationships in the order they appear in the .rels part
    rels: Vec<Relationship>,

    /// Map of relationship ID to position in `rels`
    index: HashMap<String, usize>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part.
    ///
    /// # Arguments
    /// * `xml` - The raw bytes of the relationships part
    /// * `base_uri` - Directory of the source part, used to resolve relative targets
    pub fn from_xml(xml: &[u8], base_uri: &str) -> Result<Self> {
        let mut rels = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = None;
                    let mut reltype = String::new();
                    let mut target = None;
                    let mut external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(attr.unescape_value()?.into_owned()),
                            b"Type" => reltype = attr.unescape_value()?.into_owned(),
                            b"Target" => target = Some(attr.unescape_value()?.into_owned()),
                            b"TargetMode" => {
                                external = attr.unescape_value()? == target_mode::EXTERNAL;
                            },
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(target)) = (r_id, target) {
                        rels.add_relationship(Relationship::new(
                            r_id,
                            reltype,
                            target,
                            base_uri.to_string(),
                            external,
                        ));
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Relationships parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Add a relationship; a later duplicate rId replaces the earlier entry.
    pub fn add_relationship(&mut self, rel: Relationship) {
        match self.index.get(rel.r_id()) {
            Some(&pos) => self.rels[pos] = rel,
            None => {
                self.index.insert(rel.r_id().to_string(), self.rels.len());
                self.rels.push(rel);
            },
        }
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.index.get(r_id).map(|&pos| &self.rels[pos])
    }

    /// Resolve an rId straight to its internal target partname.
    pub fn target_partname(&self, r_id: &str) -> Result<PackURI> {
        self.get(r_id)
            .ok_or_else(|| OpcError::InvalidRelationship(format!("no relationship '{}'", r_id)))?
            .target_partname()
    }

    /// Get the first relationship of a specific type, in document order.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.reltype() == reltype)
    }

    /// Get an iterator over all relationships in document order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
