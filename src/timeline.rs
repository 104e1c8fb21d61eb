//! Deck-level scene timeline.
//!
//! Each slide becomes one scene. A scene lasts long enough for its content to
//! be read, for its animations to play, and never less than a floor:
//!
//! ```text
//! duration = max(min_scene_ms, reading_ms(content), total_duration_ms)
//! ```
//!
//! Scenes follow each other without gaps, so start offsets are running sums.
use crate::ooxml::pptx::animations::{AnimationNode, AnimationSequence};
use crate::ooxml::pptx::slide::Slide;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Scene timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineOptions {
    /// Shortest scene, in ms
    pub min_scene_ms: u64,
    /// Reading time per word of slide content, in ms
    pub reading_ms_per_word: u64,
    /// Cap on the reading estimate; `None` for no cap
    pub max_reading_ms: Option<u64>,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            min_scene_ms: 3000,
            reading_ms_per_word: 500,
            max_reading_ms: Some(15_000),
        }
    }
}

impl TimelineOptions {
    #[inline]
    pub fn with_min_scene_ms(mut self, ms: u64) -> Self {
        self.min_scene_ms = ms;
        self
    }

    #[inline]
    pub fn with_reading_ms_per_word(mut self, ms: u64) -> Self {
        self.reading_ms_per_word = ms;
        self
    }

    #[inline]
    pub fn with_max_reading_ms(mut self, ms: Option<u64>) -> Self {
        self.max_reading_ms = ms;
        self
    }
}

/// An animation placed on its scene's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAnimation {
    pub animation_id: String,
    pub element_id: String,
    pub effect_name: String,
    /// Offset from the scene start
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl ScheduledAnimation {
    #[inline]
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// One slide's slot in the deck timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub slide_number: u32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub reading_ms: u64,
    pub animation_ms: u64,
    pub animations: Vec<ScheduledAnimation>,
}

impl Scene {
    #[inline]
    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }
}

/// Scenes of a whole deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneTimeline {
    pub total_duration_ms: u64,
    pub scenes: Vec<Scene>,
}

/// Reading time for a block of text.
pub fn estimate_reading_ms(content: &str, options: &TimelineOptions) -> u64 {
    let words = content.split_whitespace().count() as u64;
    let estimate = words.saturating_mul(options.reading_ms_per_word);
    match options.max_reading_ms {
        Some(cap) => estimate.min(cap),
        None => estimate,
    }
}

/// Build the scene timeline. Sequences are matched to slides by slide number;
/// a slide without one has no animation time.
pub fn compute_timeline(
    slides: &[Slide],
    sequences: &[AnimationSequence],
    options: &TimelineOptions,
) -> SceneTimeline {
    let by_slide: HashMap<u32, &AnimationSequence> =
        sequences.iter().map(|s| (s.slide_number, s)).collect();

    let mut cursor = 0u64;
    let mut scenes = Vec::with_capacity(slides.len());
    for slide in slides {
        let sequence = by_slide.get(&slide.slide_number).copied();
        let reading_ms = estimate_reading_ms(&slide.content, options);
        let animation_ms = sequence.map_or(0, |s| s.total_duration_ms);
        let duration_ms = options.min_scene_ms.max(reading_ms).max(animation_ms);

        scenes.push(Scene {
            slide_number: slide.slide_number,
            start_ms: cursor,
            duration_ms,
            reading_ms,
            animation_ms,
            animations: sequence.map(schedule_sequence).unwrap_or_default(),
        });
        cursor += duration_ms;
    }

    SceneTimeline {
        total_duration_ms: cursor,
        scenes,
    }
}

/// Place every animation of a sequence on the slide clock.
///
/// Steps of one sequence play one after another, each lasting until its
/// longest node ends. Nodes of a step start together, offset by their own
/// start delay. Separate sequences all start at 0. Output keeps input order.
pub fn schedule_sequence(sequence: &AnimationSequence) -> Vec<ScheduledAnimation> {
    let offset_in_step = |node: &AnimationNode| {
        let c = node.common();
        c.position.start_delay_ms + c.delay_ms
    };

    // (sequence, step) -> length of the step
    let mut step_len: BTreeMap<(u32, u32), u64> = BTreeMap::new();
    for node in &sequence.animations {
        let p = node.common().position;
        let end = offset_in_step(node) + node.common().duration_ms;
        let len = step_len.entry((p.sequence, p.step)).or_default();
        *len = (*len).max(end);
    }

    // (sequence, step) -> start of the step
    let mut step_start: HashMap<(u32, u32), u64> = HashMap::with_capacity(step_len.len());
    let mut current: Option<u32> = None;
    let mut cursor = 0u64;
    for (&(seq, step), &len) in &step_len {
        if current != Some(seq) {
            current = Some(seq);
            cursor = 0;
        }
        step_start.insert((seq, step), cursor);
        cursor += len;
    }

    sequence
        .animations
        .iter()
        .map(|node| {
            let c = node.common();
            let base = step_start
                .get(&(c.position.sequence, c.position.step))
                .copied()
                .unwrap_or(0);
            ScheduledAnimation {
                animation_id: c.id.clone(),
                element_id: c.element_id.clone(),
                effect_name: c.effect_name.clone(),
                start_ms: base + offset_in_step(node),
                duration_ms: c.duration_ms,
            }
        })
        .collect()
}
