//! Configuration for deck parsing.
//!
//! This module defines the options that bound and tune a parse: package size
//! limits, the timing-tree depth cap, scene timing and worker fan-out.
//!
//! # Examples
//!
//! ```rust
//! use slidetrack::ParseOptions;
//!
//! // Create with defaults
//! let options = ParseOptions::default();
//!
//! // Or customize
//! let options = ParseOptions::new()
//!     .with_parallel(false)
//!     .with_deck_timeout_ms(Some(30_000));
//! assert!(!options.parallel);
//! ```
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PackageLimits;
use crate::ooxml::pptx::animations::AnimationOptions;
use crate::timeline::TimelineOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options controlling a deck parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Bounds applied while inflating the ZIP container
    pub limits: PackageLimits,
    /// Timing-tree walk settings
    pub animation: AnimationOptions,
    /// Scene duration settings
    pub timeline: TimelineOptions,
    /// Whether slides are parsed on the rayon pool
    pub parallel: bool,
    /// Deck-level deadline in milliseconds; slides not started in time become stubs
    pub deck_timeout_ms: Option<u64>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            limits: PackageLimits::default(),
            animation: AnimationOptions::default(),
            timeline: TimelineOptions::default(),
            parallel: true,
            deck_timeout_ms: None,
        }
    }
}

impl ParseOptions {
    /// Create a new `ParseOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a YAML document. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use slidetrack::ParseOptions;
    ///
    /// let options = ParseOptions::from_yaml_str(
    ///     "parallel: false\nanimation:\n  maxDepth: 20\ntimeline:\n  minSceneMs: 5000\n",
    /// )?;
    /// assert_eq!(options.animation.max_depth, 20);
    /// assert_eq!(options.timeline.min_scene_ms, 5000);
    /// # Ok::<(), slidetrack::OoxmlError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml).map_err(|e| OoxmlError::Config(e.to_string()))
    }

    /// Set the package limits.
    #[inline]
    pub fn with_limits(mut self, limits: PackageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the timing-tree options.
    #[inline]
    pub fn with_animation(mut self, animation: AnimationOptions) -> Self {
        self.animation = animation;
        self
    }

    /// Set the scene timing options.
    #[inline]
    pub fn with_timeline(mut self, timeline: TimelineOptions) -> Self {
        self.timeline = timeline;
        self
    }

    /// Set whether slides are parsed in parallel.
    #[inline]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the deck-level deadline.
    #[inline]
    pub fn with_deck_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.deck_timeout_ms = timeout_ms;
        self
    }

    /// The deck deadline as a `Duration`.
    pub fn deck_timeout(&self) -> Option<Duration> {
        self.deck_timeout_ms.map(Duration::from_millis)
    }
}
