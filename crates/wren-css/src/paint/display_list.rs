//! Draw commands and the flat display list.
//!
//! Commands carry colors as the name/hex strings the style system
//! produced; rasterizing them is the render sink's business. Every
//! command exposes its own vertical extent so the sink can cull against
//! a scrolled viewport without understanding command internals.

use std::fmt;

use serde::Serialize;

use crate::fonts::FontDescriptor;

/// An axis-aligned rectangle in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle from its edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Whether the rectangle contains the given point.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }
}

/// One primitive drawing operation.
///
/// Immutable once produced; owned by the display list for exactly one
/// render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Draw a run of text.
    Text {
        /// Left edge of the text origin.
        x: f32,
        /// Top edge of the text origin.
        y: f32,
        /// The text content.
        text: String,
        /// The font to render with.
        font: FontDescriptor,
        /// Text color (named or hex).
        color: String,
        /// The text's bounding box, used for culling.
        bounds: Rect,
    },
    /// Fill a rectangle with a solid color.
    Rect {
        /// The rectangle to fill.
        rect: Rect,
        /// Fill color (named or hex).
        color: String,
    },
    /// Draw a straight line segment.
    Line {
        /// Start x.
        x1: f32,
        /// Start y.
        y1: f32,
        /// End x.
        x2: f32,
        /// End y.
        y2: f32,
        /// Line color (named or hex).
        color: String,
        /// Stroke thickness.
        thickness: f32,
    },
    /// Stroke a rectangle's border without filling it.
    Outline {
        /// The rectangle to outline.
        rect: Rect,
        /// Stroke color (named or hex).
        color: String,
        /// Stroke thickness.
        thickness: f32,
    },
}

impl DrawCommand {
    /// The command's topmost vertical extent, for viewport culling.
    #[must_use]
    pub fn top(&self) -> f32 {
        match self {
            Self::Text { bounds, .. } | Self::Outline { rect: bounds, .. } => bounds.top,
            Self::Rect { rect, .. } => rect.top,
            Self::Line { y1, y2, .. } => y1.min(*y2),
        }
    }

    /// The command's bottommost vertical extent, for viewport culling.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        match self {
            Self::Text { bounds, .. } | Self::Outline { rect: bounds, .. } => bounds.bottom,
            Self::Rect { rect, .. } => rect.bottom,
            Self::Line { y1, y2, .. } => y1.max(*y2),
        }
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text {
                x, y, text, font, color, ..
            } => write!(f, "text ({x:.1}, {y:.1}) {text:?} [{font}] {color}"),
            Self::Rect { rect, color } => write!(
                f,
                "rect ({:.1}, {:.1}) to ({:.1}, {:.1}) {color}",
                rect.left, rect.top, rect.right, rect.bottom
            ),
            Self::Line {
                x1, y1, x2, y2, color, thickness,
            } => write!(
                f,
                "line ({x1:.1}, {y1:.1}) to ({x2:.1}, {y2:.1}) {color} thickness {thickness}"
            ),
            Self::Outline {
                rect, color, thickness,
            } => write!(
                f,
                "outline ({:.1}, {:.1}) to ({:.1}, {:.1}) {color} thickness {thickness}",
                rect.left, rect.top, rect.right, rect.bottom
            ),
        }
    }
}

/// A flat list of draw commands in painting order.
///
/// Produced once per pipeline run. The order is exactly the order the
/// paint-tree walk appended commands in, and must be preserved: later
/// entries paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command to the list.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The commands whose vertical extent intersects a viewport of the
    /// given height scrolled to `scroll`, in painting order.
    pub fn visible(&self, scroll: f32, viewport_height: f32) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |cmd| cmd.bottom() >= scroll && cmd.top() <= scroll + viewport_height)
    }
}
