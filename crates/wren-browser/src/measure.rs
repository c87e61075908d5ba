//! Fontdue-backed text measurement.
//!
//! Real glyph advances and line metrics for layout, from font bytes the
//! embedder supplies. Uses `Font::metrics()` (not `Font::rasterize()`) to
//! avoid the cost of bitmap generation when only measurements are needed.

use fontdue::{Font, FontSettings};
use wren_css::{FontDescriptor, FontMetrics, FontSlant, FontWeight, TextMeasurer};

/// Errors produced while loading measurement fonts.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// The font bytes could not be parsed.
    #[error("failed to load font: {0}")]
    FontLoad(&'static str),
}

/// A [`TextMeasurer`] over up to four loaded faces.
///
/// Only the regular face is required; a missing variant falls back along
/// bold-italic → bold → italic → regular, so measurements stay defined
/// for every descriptor.
pub struct FontdueMeasurer {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontdueMeasurer {
    /// Load the regular face from raw font bytes (TTF/OTF).
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the bytes cannot be parsed.
    pub fn from_bytes(regular: &[u8]) -> Result<Self, MeasureError> {
        Ok(Self {
            regular: load(regular)?,
            bold: None,
            italic: None,
            bold_italic: None,
        })
    }

    /// Add a bold face.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the bytes cannot be parsed.
    pub fn with_bold(mut self, bytes: &[u8]) -> Result<Self, MeasureError> {
        self.bold = Some(load(bytes)?);
        Ok(self)
    }

    /// Add an italic face.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the bytes cannot be parsed.
    pub fn with_italic(mut self, bytes: &[u8]) -> Result<Self, MeasureError> {
        self.italic = Some(load(bytes)?);
        Ok(self)
    }

    /// Add a bold-italic face.
    ///
    /// # Errors
    ///
    /// Returns a [`MeasureError`] when the bytes cannot be parsed.
    pub fn with_bold_italic(mut self, bytes: &[u8]) -> Result<Self, MeasureError> {
        self.bold_italic = Some(load(bytes)?);
        Ok(self)
    }

    /// The loaded face closest to the descriptor.
    fn face(&self, font: &FontDescriptor) -> &Font {
        let bold = font.weight == FontWeight::Bold;
        let slanted = !matches!(font.slant, FontSlant::Roman);
        match (bold, slanted) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref())
                .unwrap_or(&self.regular),
            (true, false) => self.bold.as_ref().unwrap_or(&self.regular),
            (false, true) => self.italic.as_ref().unwrap_or(&self.regular),
            (false, false) => &self.regular,
        }
    }
}

impl TextMeasurer for FontdueMeasurer {
    fn measure(&self, font: &FontDescriptor, text: &str) -> f32 {
        let face = self.face(font);
        let px = font.size as f32;
        // Sum per-character advance widths, matching how a glyph-based
        // render surface advances its cursor.
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, px).advance_width)
            .sum()
    }

    fn metrics(&self, font: &FontDescriptor) -> FontMetrics {
        let face = self.face(font);
        let px = font.size as f32;
        face.horizontal_line_metrics(px).map_or(
            // No horizontal metrics in the face: approximate with the
            // usual em split.
            FontMetrics {
                ascent: px * 0.8,
                descent: px * 0.2,
                linespace: px * 1.2,
            },
            |lm| FontMetrics {
                ascent: lm.ascent,
                // fontdue reports descent as a negative offset.
                descent: -lm.descent,
                linespace: lm.new_line_size,
            },
        )
    }
}

fn load(bytes: &[u8]) -> Result<Font, MeasureError> {
    Font::from_bytes(bytes.to_vec(), FontSettings::default()).map_err(MeasureError::FontLoad)
}
