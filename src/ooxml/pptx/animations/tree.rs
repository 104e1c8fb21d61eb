//! Typed timing tree read from `p:timing/p:tnLst`.
//!
//! The subtree is read by recursive descent over the quick-xml event stream.
//! Each time-node level costs one unit of depth; exceeding the cap aborts the
//! read with `TimingTooDeep` before the stack can grow further.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::xml::{attr, push_entity, push_text};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

/// Attributes of a `p:cTn` common time node, plus its first start delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommonTimeNode {
    pub id: Option<u32>,
    pub dur: Option<String>,
    pub fill: Option<String>,
    pub accel: i64,
    pub decel: i64,
    pub repeat_count: Option<String>,
    pub auto_rev: bool,
    pub node_type: Option<String>,
    pub preset_class: Option<String>,
    pub preset_id: Option<String>,
    pub preset_subtype: Option<String>,
    /// `stCondLst/cond[0]/@delay`
    pub delay: Option<String>,
}

impl CommonTimeNode {
    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let mut ctn = CommonTimeNode::default();
        for a in e.attributes() {
            let a = a?;
            let value = a.unescape_value()?.into_owned();
            match a.key.local_name().as_ref() {
                b"id" => ctn.id = value.parse().ok(),
                b"dur" => ctn.dur = Some(value),
                b"fill" => ctn.fill = Some(value),
                b"accel" => ctn.accel = value.parse().unwrap_or(0),
                b"decel" => ctn.decel = value.parse().unwrap_or(0),
                b"repeatCount" => ctn.repeat_count = Some(value),
                b"autoRev" => ctn.auto_rev = matches!(value.as_str(), "1" | "true"),
                b"nodeType" => ctn.node_type = Some(value),
                b"presetClass" => ctn.preset_class = Some(value),
                b"presetID" => ctn.preset_id = Some(value),
                b"presetSubtype" => ctn.preset_subtype = Some(value),
                _ => {},
            }
        }
        Ok(ctn)
    }

    /// Numeric start delay in ms; `indefinite` (click) and absent count as 0.
    pub fn delay_ms(&self) -> u64 {
        self.delay.as_deref().and_then(|d| d.parse().ok()).unwrap_or(0)
    }
}

/// A `par`, `seq` or `excl` container with its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TimeContainer {
    pub ctn: CommonTimeNode,
    pub children: Vec<TimeNode>,
}

/// Which behavior element a leaf came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BehaviorKind {
    AnimEffect,
    AnimMotion,
    Set,
    AnimScale,
    AnimRot,
    Anim,
    AnimClr,
    Cmd,
    Audio,
    Video,
}

impl BehaviorKind {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        Some(match name {
            b"animEffect" => BehaviorKind::AnimEffect,
            b"animMotion" => BehaviorKind::AnimMotion,
            b"set" => BehaviorKind::Set,
            b"animScale" => BehaviorKind::AnimScale,
            b"animRot" => BehaviorKind::AnimRot,
            b"anim" => BehaviorKind::Anim,
            b"animClr" => BehaviorKind::AnimClr,
            b"cmd" => BehaviorKind::Cmd,
            b"audio" => BehaviorKind::Audio,
            b"video" => BehaviorKind::Video,
            _ => return None,
        })
    }

    /// Element local name.
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorKind::AnimEffect => "animEffect",
            BehaviorKind::AnimMotion => "animMotion",
            BehaviorKind::Set => "set",
            BehaviorKind::AnimScale => "animScale",
            BehaviorKind::AnimRot => "animRot",
            BehaviorKind::Anim => "anim",
            BehaviorKind::AnimClr => "animClr",
            BehaviorKind::Cmd => "cmd",
            BehaviorKind::Audio => "audio",
            BehaviorKind::Video => "video",
        }
    }
}

/// A leaf behavior with its `cBhvr` contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Behavior {
    pub kind: BehaviorKind,
    /// Attributes of the behavior element itself (`transition`, `filter`, `path`, ...)
    pub attrs: BTreeMap<String, String>,
    pub ctn: CommonTimeNode,
    /// `tgtEl/spTgt/@spid`
    pub target: Option<String>,
    pub attr_names: Vec<String>,
    /// `to/*Val/@val` of a `set`
    pub to_value: Option<String>,
}

/// Node of the timing tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimeNode {
    Par(TimeContainer),
    Seq(TimeContainer),
    Excl(TimeContainer),
    Behavior(Behavior),
}

/// Read the `tnLst` of a slide's `p:timing`.
///
/// Returns `None` when the slide has no timing element.
pub(crate) fn parse_timing(xml: &[u8], max_depth: usize) -> Result<Option<Vec<TimeNode>>> {
    let mut reader = Reader::from_reader(xml);
    let mut timing = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"timing" => {
                timing = Some(read_timing(&mut reader, max_depth)?);
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(timing)
}

fn read_timing(reader: &mut Reader<&[u8]>, max_depth: usize) -> Result<Vec<TimeNode>> {
    let mut roots = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"tnLst" => {
                roots.extend(read_node_list(reader, 1, max_depth)?);
            },
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            },
            Event::End(_) => return Ok(roots),
            Event::Eof => return Err(unexpected_eof("timing")),
            _ => {},
        }
    }
}

/// Read time nodes until the enclosing list element ends.
fn read_node_list(reader: &mut Reader<&[u8]>, depth: usize, max_depth: usize) -> Result<Vec<TimeNode>> {
    if depth > max_depth {
        return Err(OoxmlError::TimingTooDeep(max_depth));
    }

    let mut nodes = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"par" => nodes.push(TimeNode::Par(read_container(reader, depth, max_depth)?)),
                    b"seq" => nodes.push(TimeNode::Seq(read_container(reader, depth, max_depth)?)),
                    b"excl" => nodes.push(TimeNode::Excl(read_container(reader, depth, max_depth)?)),
                    name => match BehaviorKind::from_local_name(name) {
                        Some(kind) => nodes.push(TimeNode::Behavior(read_behavior(reader, kind, &e, depth, max_depth)?)),
                        None => {
                            reader.read_to_end(e.name())?;
                        },
                    },
                }
            },
            Event::Empty(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"par" => nodes.push(TimeNode::Par(TimeContainer::default())),
                    b"seq" => nodes.push(TimeNode::Seq(TimeContainer::default())),
                    b"excl" => nodes.push(TimeNode::Excl(TimeContainer::default())),
                    name => {
                        if let Some(kind) = BehaviorKind::from_local_name(name) {
                            nodes.push(TimeNode::Behavior(Behavior {
                                kind,
                                attrs: element_attrs(&e)?,
                                ctn: CommonTimeNode::default(),
                                target: None,
                                attr_names: Vec::new(),
                                to_value: None,
                            }));
                        }
                    },
                }
            },
            Event::End(_) => return Ok(nodes),
            Event::Eof => return Err(unexpected_eof("time node list")),
            _ => {},
        }
    }
}

/// Read a container element whose start tag was just consumed.
fn read_container(reader: &mut Reader<&[u8]>, depth: usize, max_depth: usize) -> Result<TimeContainer> {
    let mut container = TimeContainer::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"cTn" => {
                container.ctn = CommonTimeNode::from_start(&e)?;
                container.children = read_ctn_body(reader, &mut container.ctn, depth + 1, max_depth)?;
            },
            Event::Empty(e) if e.local_name().as_ref() == b"cTn" => {
                container.ctn = CommonTimeNode::from_start(&e)?;
            },
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            },
            Event::End(_) => return Ok(container),
            Event::Eof => return Err(unexpected_eof("time container")),
            _ => {},
        }
    }
}

/// Read the children of a `cTn`: its first start condition delay and its child time nodes.
fn read_ctn_body(
    reader: &mut Reader<&[u8]>,
    ctn: &mut CommonTimeNode,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<TimeNode>> {
    let mut children = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"stCondLst" => ctn.delay = read_first_cond_delay(reader)?,
                b"childTnLst" => children = read_node_list(reader, depth, max_depth)?,
                _ => {
                    reader.read_to_end(e.name())?;
                },
            },
            Event::End(_) => return Ok(children),
            Event::Eof => return Err(unexpected_eof("cTn")),
            _ => {},
        }
    }
}

fn read_first_cond_delay(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut delay = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"cond" && delay.is_none() {
                    delay = attr(&e, b"delay")?;
                }
                reader.read_to_end(e.name())?;
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"cond" && delay.is_none() {
                    delay = attr(&e, b"delay")?;
                }
            },
            Event::End(_) => return Ok(delay),
            Event::Eof => return Err(unexpected_eof("stCondLst")),
            _ => {},
        }
    }
}

fn read_behavior(
    reader: &mut Reader<&[u8]>,
    kind: BehaviorKind,
    start: &BytesStart<'_>,
    depth: usize,
    max_depth: usize,
) -> Result<Behavior> {
    let mut behavior = Behavior {
        kind,
        attrs: element_attrs(start)?,
        ctn: CommonTimeNode::default(),
        target: None,
        attr_names: Vec::new(),
        to_value: None,
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"cBhvr" | b"cMediaNode" => read_common_behavior(reader, &mut behavior, depth, max_depth)?,
                b"to" if kind == BehaviorKind::Set => behavior.to_value = read_value(reader)?,
                _ => {
                    reader.read_to_end(e.name())?;
                },
            },
            Event::End(_) => return Ok(behavior),
            Event::Eof => return Err(unexpected_eof(kind.as_str())),
            _ => {},
        }
    }
}

fn read_common_behavior(
    reader: &mut Reader<&[u8]>,
    behavior: &mut Behavior,
    depth: usize,
    max_depth: usize,
) -> Result<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"cTn" => {
                    behavior.ctn = CommonTimeNode::from_start(&e)?;
                    // Behavior cTn children are not expanded into the tree
                    read_ctn_body(reader, &mut behavior.ctn, depth + 1, max_depth)?;
                },
                b"tgtEl" => behavior.target = read_target(reader)?,
                b"attrNameLst" => behavior.attr_names = read_attr_names(reader)?,
                _ => {
                    reader.read_to_end(e.name())?;
                },
            },
            Event::Empty(e) if e.local_name().as_ref() == b"cTn" => {
                behavior.ctn = CommonTimeNode::from_start(&e)?;
            },
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(unexpected_eof("cBhvr")),
            _ => {},
        }
    }
}

/// `spTgt/@spid` inside a `tgtEl`; slide and sound targets give `None`.
fn read_target(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut target = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"spTgt" {
                    target = attr(&e, b"spid")?;
                }
                reader.read_to_end(e.name())?;
            },
            Event::Empty(e) if e.local_name().as_ref() == b"spTgt" => target = attr(&e, b"spid")?,
            Event::End(_) => return Ok(target),
            Event::Eof => return Err(unexpected_eof("tgtEl")),
            _ => {},
        }
    }
}

fn read_attr_names(reader: &mut Reader<&[u8]>) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut current: Option<String> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"attrName" => current = Some(String::new()),
            Event::Text(t) => {
                if let Some(name) = current.as_mut() {
                    push_text(name, &t)?;
                }
            },
            Event::GeneralRef(r) => {
                if let Some(name) = current.as_mut() {
                    push_entity(name, &r)?;
                }
            },
            Event::End(e) if e.local_name().as_ref() == b"attrName" => {
                if let Some(name) = current.take() {
                    names.push(name.trim().to_string());
                }
            },
            Event::Start(e) => {
                reader.read_to_end(e.name())?;
            },
            Event::End(_) => return Ok(names),
            Event::Eof => return Err(unexpected_eof("attrNameLst")),
            _ => {},
        }
    }
}

/// First `@val` found below a `to` element (`strVal`, `boolVal`, `intVal`, ...).
fn read_value(reader: &mut Reader<&[u8]>) -> Result<Option<String>> {
    let mut value = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if value.is_none() {
                    value = attr(&e, b"val")?;
                }
                reader.read_to_end(e.name())?;
            },
            Event::Empty(e) => {
                if value.is_none() {
                    value = attr(&e, b"val")?;
                }
            },
            Event::End(_) => return Ok(value),
            Event::Eof => return Err(unexpected_eof("to")),
            _ => {},
        }
    }
}

fn element_attrs(e: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for a in e.attributes() {
        let a = a?;
        let key = String::from_utf8_lossy(a.key.local_name().as_ref()).into_owned();
        attrs.insert(key, a.unescape_value()?.into_owned());
    }
    Ok(attrs)
}

fn unexpected_eof(context: &str) -> OoxmlError {
    OoxmlError::Xml(format!("unexpected end of document inside {}", context))
}
