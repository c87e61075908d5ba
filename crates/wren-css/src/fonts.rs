//! Font descriptors, text measurement, and the metrics cache.
//!
//! Layout never touches real fonts. It resolves each node's style into a
//! small [`FontDescriptor`] and asks an externally supplied
//! [`TextMeasurer`] for widths and vertical metrics. As long as the
//! measurer is deterministic for fixed inputs, layout is a pure function
//! of its inputs.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::style::ComputedStyle;

/// Screen-density correction applied to CSS pixel sizes.
const FONT_SIZE_SCALE: f32 = 0.75;

/// Font weight, reduced to the two faces the engine renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FontWeight {
    /// Weights below 600 and unrecognized keywords.
    Normal,
    /// `bold` or a numeric weight of 600 and above.
    Bold,
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FontSlant {
    /// Upright. `normal` and unrecognized keywords land here.
    Roman,
    /// `italic`.
    Italic,
    /// `oblique`.
    Oblique,
}

/// The resolved font of one text run: the key text measurement is cached
/// under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontDescriptor {
    /// Point size after the density correction.
    pub size: i32,
    /// The resolved weight.
    pub weight: FontWeight,
    /// The resolved slant.
    pub slant: FontSlant,
}

impl FontDescriptor {
    /// Size used when a font-size value cannot be parsed.
    pub const FALLBACK_SIZE: i32 = 12;

    /// Resolve a node's computed style into a font descriptor.
    ///
    /// Numeric font-weights of 600 and above count as bold; `font-style`
    /// maps onto the closed slant set; `font-size` must be a `px` value
    /// (`inherit`/`initial`/`unset` read as the 16px default), scaled by
    /// the density correction and truncated. Anything unparsable falls
    /// back to [`Self::FALLBACK_SIZE`].
    #[must_use]
    pub fn from_style(style: &ComputedStyle) -> Self {
        let weight_raw = style.get("font-weight").unwrap_or("normal");
        let weight = match weight_raw.parse::<u32>() {
            Ok(numeric) if numeric >= 600 => FontWeight::Bold,
            Ok(_) => FontWeight::Normal,
            Err(_) if weight_raw == "bold" => FontWeight::Bold,
            Err(_) => FontWeight::Normal,
        };

        let slant = match style.get("font-style").unwrap_or("normal") {
            "italic" => FontSlant::Italic,
            "oblique" => FontSlant::Oblique,
            _ => FontSlant::Roman,
        };

        let size_raw = match style.get("font-size") {
            None | Some("" | "inherit" | "initial" | "unset") => "16px",
            Some(other) => other,
        };
        let size = size_raw
            .strip_suffix("px")
            .and_then(|v| v.trim().parse::<f32>().ok())
            .map_or(Self::FALLBACK_SIZE, |px| (px * FONT_SIZE_SCALE) as i32);

        Self {
            size,
            weight,
            slant,
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.size, self.weight, self.slant)
    }
}

/// Vertical metrics of one font face at one size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline, as a positive number.
    pub descent: f32,
    /// The face's natural line height.
    pub linespace: f32,
}

/// Text measurement backend, supplied by the embedder.
///
/// Layout numbers are only as deterministic as this: the same descriptor
/// and text must always measure the same.
pub trait TextMeasurer {
    /// The advance width of `text` rendered with `font`.
    fn measure(&self, font: &FontDescriptor, text: &str) -> f32;

    /// The vertical metrics of `font`.
    fn metrics(&self, font: &FontDescriptor) -> FontMetrics;
}

/// Fixed-ratio measurement for tests and font-less embedders.
///
/// The average advance width of Latin glyphs in a proportional face is
/// roughly 0.6 of the point size; ascent and descent split the em at
/// 0.8/0.2 and the natural line height is 1.2. Deterministic, which is
/// all layout requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, font: &FontDescriptor, text: &str) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font.size as f32 * CHAR_WIDTH_RATIO
    }

    fn metrics(&self, font: &FontDescriptor) -> FontMetrics {
        let size = font.size as f32;
        FontMetrics {
            ascent: size * 0.8,
            descent: size * 0.2,
            linespace: size * 1.2,
        }
    }
}

/// Per-pass metrics cache keyed by font descriptor.
///
/// The key space is bounded (sizes are small integers, weight and slant
/// are tiny enums) so there is no eviction. One cache per layout pass:
/// nothing leaks across documents.
#[derive(Debug, Default)]
pub struct FontCache {
    metrics: HashMap<FontDescriptor, FontMetrics>,
}

impl FontCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The metrics for `font`, measured through `measurer` on first use.
    pub fn metrics(&mut self, measurer: &dyn TextMeasurer, font: &FontDescriptor) -> FontMetrics {
        *self
            .metrics
            .entry(*font)
            .or_insert_with(|| measurer.metrics(font))
    }

    /// The number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
