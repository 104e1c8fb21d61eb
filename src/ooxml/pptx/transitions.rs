//! Slide transition effects.
//!
//! `p:transition` follows the shape tree of a slide. PowerPoint 2010 and later
//! wrap it in `mc:AlternateContent`: the `p14` choice carries the exact
//! duration in `p14:dur`, the fallback only a speed. The first transition in
//! the part is used.

use crate::ooxml::error::Result;
use crate::ooxml::xml::attr;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

/// Visual effect of a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionKind {
    /// Timing only, no visual effect
    None,
    Cut,
    Fade,
    Push,
    Wipe,
    Split,
    Cover,
    Pull,
    RandomBar,
    Dissolve,
    Blinds,
    Checker,
    Circle,
    Diamond,
    Plus,
    Wedge,
    Wheel,
    Zoom,
    Strips,
    Comb,
    Newsflash,
    Random,
    /// Any other effect element, e.g. `p14:vortex`
    Other(String),
}

impl TransitionKind {
    /// Map the local name of an effect element.
    pub fn from_element(local: &str) -> Self {
        match local {
            "cut" => TransitionKind::Cut,
            "fade" => TransitionKind::Fade,
            "push" => TransitionKind::Push,
            "wipe" => TransitionKind::Wipe,
            "split" => TransitionKind::Split,
            "cover" => TransitionKind::Cover,
            "pull" => TransitionKind::Pull,
            "randomBar" => TransitionKind::RandomBar,
            "dissolve" => TransitionKind::Dissolve,
            "blinds" => TransitionKind::Blinds,
            "checker" => TransitionKind::Checker,
            "circle" => TransitionKind::Circle,
            "diamond" => TransitionKind::Diamond,
            "plus" => TransitionKind::Plus,
            "wedge" => TransitionKind::Wedge,
            "wheel" => TransitionKind::Wheel,
            "zoom" => TransitionKind::Zoom,
            "strips" => TransitionKind::Strips,
            "comb" => TransitionKind::Comb,
            "newsflash" => TransitionKind::Newsflash,
            "random" => TransitionKind::Random,
            other => TransitionKind::Other(other.to_string()),
        }
    }
}

/// Transition speed (`p:transition/@spd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransitionSpeed {
    Slow,
    Medium,
    /// Schema default when `spd` is absent
    #[default]
    Fast,
}

impl TransitionSpeed {
    /// Duration in milliseconds.
    pub fn duration_ms(self) -> u64 {
        match self {
            TransitionSpeed::Slow => 1500,
            TransitionSpeed::Medium => 1000,
            TransitionSpeed::Fast => 500,
        }
    }

    fn from_xml_value(value: &str) -> Self {
        match value {
            "slow" => TransitionSpeed::Slow,
            "med" => TransitionSpeed::Medium,
            _ => TransitionSpeed::Fast,
        }
    }
}

/// How a slide enters the show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideTransition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    /// `dir` of the effect element (`l`, `r`, `u`, `d`, `horz`, `vert`, `in`, `out`)
    pub direction: Option<String>,
    pub speed: TransitionSpeed,
    /// `p14:dur` when present, otherwise the speed's duration
    pub duration_ms: u64,
    pub advance_on_click: bool,
    /// Auto-advance delay (`advTm`)
    pub advance_after_ms: Option<u64>,
}

impl SlideTransition {
    fn from_element(e: &BytesStart<'_>) -> Result<Self> {
        let speed = attr(e, b"spd")?
            .map(|v| TransitionSpeed::from_xml_value(&v))
            .unwrap_or_default();
        let duration_ms = attr(e, b"dur")?
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(|| speed.duration_ms());
        let advance_on_click = attr(e, b"advClick")?.is_none_or(|v| v == "1" || v == "true");
        let advance_after_ms = attr(e, b"advTm")?.and_then(|v| v.parse::<u64>().ok());

        Ok(Self {
            kind: TransitionKind::None,
            direction: None,
            speed,
            duration_ms,
            advance_on_click,
            advance_after_ms,
        })
    }

    /// Take the effect from the first effect child; sounds and extensions are skipped.
    fn apply_child(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let local = std::str::from_utf8(e.local_name().into_inner())?;
        if self.kind != TransitionKind::None || matches!(local, "sndAc" | "extLst") {
            return Ok(());
        }
        self.kind = TransitionKind::from_element(local);
        self.direction = attr(e, b"dir")?;
        Ok(())
    }
}

/// Read the transition of a slide part, if it declares one.
pub fn parse_transition_xml(xml: &[u8]) -> Result<Option<SlideTransition>> {
    let mut reader = Reader::from_reader(xml);
    let mut transition: Option<SlideTransition> = None;
    // Open elements from p:transition down, p:transition included
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match transition.as_mut() {
                None if e.local_name().as_ref() == b"transition" => {
                    transition = Some(SlideTransition::from_element(&e)?);
                    depth = 1;
                },
                None => {},
                Some(t) => {
                    if depth == 1 {
                        t.apply_child(&e)?;
                    }
                    depth += 1;
                },
            },
            Event::Empty(e) => match transition.as_mut() {
                None if e.local_name().as_ref() == b"transition" => {
                    return SlideTransition::from_element(&e).map(Some);
                },
                None => {},
                Some(t) => {
                    if depth == 1 {
                        t.apply_child(&e)?;
                    }
                },
            },
            Event::End(_) if transition.is_some() => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(transition)
}
