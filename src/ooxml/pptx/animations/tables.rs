//! Static vocabulary tables mapping PowerPoint names to the internal effect taxonomy.
//!
//! Keys are `animEffect/@filter` base names (the part before any `(`).
use super::model::{AnimationCategory, FillMode};
use phf::phf_map;

pub const DEFAULT_ENTRANCE: &str = "fadeIn";
pub const DEFAULT_EXIT: &str = "fadeOut";
pub const DEFAULT_EMPHASIS: &str = "pulse";

static ENTRANCE_EFFECTS: phf::Map<&'static str, &'static str> = phf_map! {
    "fade" => "fadeIn",
    "appear" => "appear",
    "fly" => "slideIn",
    "slide" => "slideIn",
    "zoom" => "zoomIn",
    "wipe" => "wipeIn",
    "dissolve" => "dissolveIn",
    "barn" => "splitIn",
    "blinds" => "blindsIn",
    "box" => "boxIn",
    "checkerboard" => "checkerboardIn",
    "circle" => "circleIn",
    "diamond" => "diamondIn",
    "plus" => "plusIn",
    "randombar" => "randomBarsIn",
    "strips" => "stripsIn",
    "wedge" => "wedgeIn",
    "wheel" => "wheelIn",
};

static EXIT_EFFECTS: phf::Map<&'static str, &'static str> = phf_map! {
    "fade" => "fadeOut",
    "appear" => "disappear",
    "fly" => "slideOut",
    "slide" => "slideOut",
    "zoom" => "zoomOut",
    "wipe" => "wipeOut",
    "dissolve" => "dissolveOut",
    "barn" => "splitOut",
    "blinds" => "blindsOut",
    "box" => "boxOut",
    "checkerboard" => "checkerboardOut",
    "circle" => "circleOut",
    "diamond" => "diamondOut",
    "plus" => "plusOut",
    "randombar" => "randomBarsOut",
    "strips" => "stripsOut",
    "wedge" => "wedgeOut",
    "wheel" => "wheelOut",
};

static EMPHASIS_EFFECTS: phf::Map<&'static str, &'static str> = phf_map! {
    "spin" => "spin",
    "grow" => "grow",
    "pulse" => "pulse",
    "teeter" => "teeter",
    "flash" => "flash",
    "image" => "flash",
};

static FILL_MODES: phf::Map<&'static str, FillMode> = phf_map! {
    "remove" => FillMode::None,
    "hold" => FillMode::Forwards,
    "freeze" => FillMode::Both,
    "transition" => FillMode::Both,
};

/// `"wipe(down)"` → `"wipe"`.
#[inline]
pub fn filter_base(filter: &str) -> &str {
    filter.split('(').next().unwrap_or(filter).trim()
}

/// Category and effect name for an `animEffect` with the given transition and filter.
pub fn map_effect(transition: Option<&str>, filter: Option<&str>) -> (AnimationCategory, &'static str) {
    let key = filter.map(filter_base).unwrap_or("");
    match transition {
        Some("in") => (
            AnimationCategory::Entrance,
            ENTRANCE_EFFECTS.get(key).copied().unwrap_or(DEFAULT_ENTRANCE),
        ),
        Some("out") => (
            AnimationCategory::Exit,
            EXIT_EFFECTS.get(key).copied().unwrap_or(DEFAULT_EXIT),
        ),
        _ => (
            AnimationCategory::Emphasis,
            EMPHASIS_EFFECTS.get(key).copied().unwrap_or(DEFAULT_EMPHASIS),
        ),
    }
}

/// Map a `cTn/@fill` value; unknown or absent values fill forwards.
#[inline]
pub fn map_fill(fill: Option<&str>) -> FillMode {
    fill.and_then(|f| FILL_MODES.get(f).copied()).unwrap_or_default()
}
