//! Display list and paint-tree construction.
//!
//! Painting turns a laid-out tree into one flat, time-ordered list of
//! primitive draw commands for an external render surface to execute.
//! Order is a hard guarantee: later commands paint over earlier ones.

/// Draw commands and the flat display list.
pub mod display_list;
/// Paint-tree construction from a layout tree.
pub mod painter;

pub use display_list::{DisplayList, DrawCommand, Rect};
pub use painter::paint_tree;
