/// Deck metadata extraction.
///
/// Core properties live in `docProps/core.xml` (Dublin Core plus OPC
/// extensions); extended properties in `docProps/app.xml`. Both are optional:
/// a deck without them, or with unreadable ones, still yields metadata built
/// from defaults.
use crate::common::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{part_name, relationship_type};
use crate::ooxml::opc::{OpcPackage, PackURI};
use crate::ooxml::xml::{push_entity, push_text};
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled Presentation";
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Deck-level document properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    /// Resolved slide count once the deck is parsed; the declared count from
    /// `app.xml` before that
    pub slide_count: u32,
    pub application: Option<String>,
    pub app_version: Option<String>,
    pub template: Option<String>,
}

impl Default for DeckMetadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            subject: String::new(),
            keywords: Vec::new(),
            created: None,
            modified: None,
            slide_count: 0,
            application: None,
            app_version: None,
            template: None,
        }
    }
}

/// Extract deck metadata from a package.
///
/// Never fails: missing parts keep the defaults silently, malformed parts keep
/// the defaults and emit a `MetadataFallback` diagnostic.
pub fn extract_metadata(package: &OpcPackage, sink: &dyn DiagnosticSink) -> DeckMetadata {
    let mut metadata = DeckMetadata::default();

    if let Some(xml) = properties_part(package, relationship_type::CORE_PROPERTIES, part_name::CORE_PROPERTIES)
        && let Err(e) = parse_core_properties_xml(xml, &mut metadata)
    {
        sink.emit(Diagnostic::warning(
            DiagnosticKind::MetadataFallback,
            format!("core properties unreadable, using defaults: {}", e),
        ));
        metadata = DeckMetadata::default();
    }

    if let Some(xml) = properties_part(package, relationship_type::EXTENDED_PROPERTIES, part_name::APP_PROPERTIES) {
        let mut extended = metadata.clone();
        match parse_app_properties_xml(xml, &mut extended) {
            Ok(()) => metadata = extended,
            Err(e) => sink.emit(Diagnostic::warning(
                DiagnosticKind::MetadataFallback,
                format!("extended properties unreadable, ignored: {}", e),
            )),
        }
    }

    metadata
}

/// Find a properties part via the package relationships, falling back to its
/// conventional location.
fn properties_part<'a>(package: &'a OpcPackage, reltype: &str, fallback: &str) -> Option<&'a [u8]> {
    if let Ok(rels) = package.package_relationships()
        && let Some(rel) = rels.first_of_type(reltype)
        && let Ok(uri) = rel.target_partname()
        && let Some(bytes) = package.part(&uri)
    {
        return Some(bytes);
    }
    PackURI::new(fallback).ok().and_then(|uri| package.part(&uri))
}

/// Parse core properties XML into `metadata`; blank fields keep their defaults.
fn parse_core_properties_xml(xml: &[u8], metadata: &mut DeckMetadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let field = e.local_name().as_ref().to_vec();
                let known = matches!(
                    field.as_slice(),
                    b"title" | b"creator" | b"subject" | b"keywords" | b"created" | b"modified"
                );
                if known && let Some(text) = read_text_element(&mut reader)? {
                    match field.as_slice() {
                        b"title" => metadata.title = text,
                        b"creator" => metadata.author = text,
                        b"subject" => metadata.subject = text,
                        b"keywords" => metadata.keywords = split_keywords(&text),
                        b"created" => metadata.created = parse_datetime(&text).ok(),
                        _ => metadata.modified = parse_datetime(&text).ok(),
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("core properties: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(())
}

/// Parse extended (application) properties XML into `metadata`.
fn parse_app_properties_xml(xml: &[u8], metadata: &mut DeckMetadata) -> Result<()> {
    let mut reader = Reader::from_reader(xml);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            // Only direct children of <Properties>; HeadingPairs etc. nest vectors
            Ok(Event::Start(ref e)) if depth == 1 => {
                let field = e.local_name().as_ref().to_vec();
                match field.as_slice() {
                    b"Application" | b"AppVersion" | b"Template" | b"Slides" => {
                        if let Some(text) = read_text_element(&mut reader)? {
                            match field.as_slice() {
                                b"Application" => metadata.application = Some(text),
                                b"AppVersion" => metadata.app_version = Some(text),
                                b"Template" => metadata.template = Some(text),
                                _ => {
                                    if let Ok(count) = text.parse::<u32>() {
                                        metadata.slide_count = count;
                                    }
                                },
                            }
                        }
                    },
                    _ => depth += 1,
                }
            },
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(format!("extended properties: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(())
}

/// Read the text content of the element just opened, consuming its end tag.
fn read_text_element<R: std::io::BufRead>(reader: &mut Reader<R>) -> Result<Option<String>> {
    let mut text = String::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => push_text(&mut text, &e)?,
            Event::GeneralRef(e) => push_entity(&mut text, &e)?,
            Event::CData(e) => text.push_str(std::str::from_utf8(e.as_ref())?),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Split a keywords field on `,` and `;`, dropping empty entries.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a W3CDTF timestamp into UTC.
///
/// Supports formats like:
/// - 2023-10-10T14:30:00Z
/// - 2023-10-10T14:30:00.1234567Z
/// - 2023-10-10T14:30:00+02:00
/// - 2023-10-10T14:30:00
/// - 2023-10-10
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, format) {
            return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
        }
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(dt) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
    }

    Err(OoxmlError::InvalidFormat(format!("Invalid datetime format: {}", s)))
}
