//! Slide backgrounds.
//!
//! Only a background set on the slide itself (`p:cSld/p:bg`) is read. A slide
//! without one inherits from its layout or master, which is left to the caller.

use crate::common::diagnostics::DiagnosticSink;
use crate::ooxml::error::Result;
use crate::ooxml::opc::{OpcPackage, Relationships};
use crate::ooxml::pptx::media::{ImageRef, resolve_images_with};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

/// One stop of a gradient fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    /// Position along the gradient, 0 to 100
    pub position: u32,
    pub color: Option<String>,
}

/// Fill of a slide background.
///
/// Colors are `#RRGGBB` for RGB and system colors, or the theme/preset color
/// name (`accent1`, `black`) otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SlideBackground {
    Solid {
        color: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Gradient {
        stops: Vec<GradientStop>,
        /// Angle of a linear gradient in degrees
        angle_deg: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        relationship_id: String,
        /// `None` when the relationship does not resolve to a media part
        image: Option<ImageRef>,
    },
    Pattern {
        preset: Option<String>,
        foreground: Option<String>,
        background: Option<String>,
    },
    /// Background style from the theme (`p:bgRef/@idx`)
    ThemeStyle {
        index: u32,
        color: Option<String>,
    },
    NoFill,
}

impl SlideBackground {
    /// Resolve a picture background to its media part.
    pub fn resolve(
        self,
        package: &OpcPackage,
        rels: &Relationships,
        slide_number: u32,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        match self {
            SlideBackground::Image { relationship_id, .. } => {
                let image = resolve_images_with(
                    package,
                    rels,
                    slide_number,
                    std::slice::from_ref(&relationship_id),
                    sink,
                )
                .into_iter()
                .next();
                SlideBackground::Image { relationship_id, image }
            },
            other => other,
        }
    }
}

/// An element of the `p:bg` subtree; depth 1 is a direct child of `p:bg`.
#[derive(Debug)]
struct Element {
    depth: usize,
    name: String,
    /// (local name, value, prefixed)
    attrs: Vec<(String, String, bool)>,
}

impl Element {
    fn read(e: &BytesStart<'_>, depth: usize) -> Result<Self> {
        let name = std::str::from_utf8(e.local_name().into_inner())?.to_string();
        let mut attrs = Vec::new();
        for a in e.attributes() {
            let a = a?;
            let key = std::str::from_utf8(a.key.local_name().into_inner())?.to_string();
            attrs.push((key, a.unescape_value()?.into_owned(), a.key.prefix().is_some()));
        }
        Ok(Self { depth, name, attrs })
    }

    fn get(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _, _)| k == local)
            .map(|(_, v, _)| v.as_str())
    }

    fn get_prefixed(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _, prefixed)| *prefixed && k == local)
            .map(|(_, v, _)| v.as_str())
    }

    fn color(&self) -> Option<String> {
        match self.name.as_str() {
            "srgbClr" => self.get("val").map(hex),
            "sysClr" => self.get("lastClr").map(hex).or_else(|| self.get("val").map(str::to_string)),
            "schemeClr" | "prstClr" => self.get("val").map(str::to_string),
            _ => None,
        }
    }
}

fn hex(v: &str) -> String {
    format!("#{}", v.to_ascii_uppercase())
}

/// Read the background of a slide part, if it sets one.
pub fn parse_background_xml(xml: &[u8]) -> Result<Option<SlideBackground>> {
    let Some(elements) = read_bg_elements(xml)? else {
        return Ok(None);
    };
    Ok(interpret(&elements))
}

/// Flatten `p:bg` into its descendants. Stops at the shape tree, which always
/// follows the background.
fn read_bg_elements(xml: &[u8]) -> Result<Option<Vec<Element>>> {
    let mut reader = Reader::from_reader(xml);
    let mut elements = Vec::new();
    // Depth the next child of p:bg would get; None outside p:bg
    let mut depth: Option<usize> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match depth {
                None => match e.local_name().as_ref() {
                    b"bg" => depth = Some(1),
                    b"spTree" => return Ok(None),
                    _ => {},
                },
                Some(d) => {
                    elements.push(Element::read(&e, d)?);
                    depth = Some(d + 1);
                },
            },
            Event::Empty(e) => match depth {
                None if e.local_name().as_ref() == b"spTree" => return Ok(None),
                None => {},
                Some(d) => elements.push(Element::read(&e, d)?),
            },
            Event::End(_) => match depth {
                Some(1) => return Ok(Some(elements)),
                Some(d) => depth = Some(d - 1),
                None => {},
            },
            Event::Eof => return Ok(None),
            _ => {},
        }
    }
}

/// Indices of the descendants of `elements[i]`.
fn descendants(elements: &[Element], i: usize) -> impl Iterator<Item = usize> + '_ {
    let depth = elements[i].depth;
    (i + 1..elements.len()).take_while(move |&j| elements[j].depth > depth)
}

fn children(elements: &[Element], i: usize) -> impl Iterator<Item = usize> + '_ {
    let depth = elements[i].depth;
    descendants(elements, i).filter(move |&j| elements[j].depth == depth + 1)
}

fn color_of(elements: &[Element], i: usize) -> Option<String> {
    children(elements, i).find_map(|j| elements[j].color())
}

fn interpret(elements: &[Element]) -> Option<SlideBackground> {
    let first = elements.iter().position(|e| e.depth == 1)?;
    match elements[first].name.as_str() {
        "bgPr" => {
            let fill = children(elements, first).next()?;
            fill_of(elements, fill)
        },
        "bgRef" => Some(SlideBackground::ThemeStyle {
            index: elements[first]
                .get("idx")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            color: color_of(elements, first),
        }),
        _ => None,
    }
}

fn fill_of(elements: &[Element], i: usize) -> Option<SlideBackground> {
    let find = |name: &str| descendants(elements, i).find(|&j| elements[j].name == name);

    match elements[i].name.as_str() {
        "solidFill" => Some(SlideBackground::Solid {
            color: color_of(elements, i),
        }),
        "gradFill" => {
            let stops = descendants(elements, i)
                .filter(|&j| elements[j].name == "gs")
                .map(|j| GradientStop {
                    position: elements[j]
                        .get("pos")
                        .and_then(|v| v.parse::<u32>().ok())
                        .map_or(0, |p| p / 1000),
                    color: color_of(elements, j),
                })
                .collect();
            // ang is in 60000ths of a degree
            let angle_deg = find("lin")
                .and_then(|j| elements[j].get("ang"))
                .and_then(|v| v.parse::<u64>().ok())
                .map(|a| (a / 60_000) as u32);
            Some(SlideBackground::Gradient { stops, angle_deg })
        },
        "blipFill" => {
            let r_id = find("blip").and_then(|j| elements[j].get_prefixed("embed"))?;
            Some(SlideBackground::Image {
                relationship_id: r_id.to_string(),
                image: None,
            })
        },
        "pattFill" => {
            let side = |name: &str| {
                children(elements, i)
                    .find(|&j| elements[j].name == name)
                    .and_then(|j| color_of(elements, j))
            };
            Some(SlideBackground::Pattern {
                preset: elements[i].get("prst").map(str::to_string),
                foreground: side("fgClr"),
                background: side("bgClr"),
            })
        },
        "noFill" => Some(SlideBackground::NoFill),
        _ => None,
    }
}
