//! Bounding rectangles captured around a DOM mutation.

use serde::{Deserialize, Serialize};

/// Bounding rectangle of a node, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Detached or not-yet-rendered nodes report negative offsets.
    pub fn is_offscreen(&self) -> bool {
        self.x < 0.0 || self.y < 0.0
    }

    /// True if the node occupies a non-zero area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn same_size(&self, other: &Rect) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Rectangles for a mutation target, its parent and each argument of the
/// mutating call, captured at one instant.
///
/// `None` means the node could not be measured (no parent, or an argument
/// that is not a DOM node).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionSnapshot {
    #[serde(default)]
    pub target: Option<Rect>,
    #[serde(default)]
    pub parent: Option<Rect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Option<Rect>>,
}

impl DimensionSnapshot {
    pub fn new(target: Option<Rect>, parent: Option<Rect>) -> Self {
        Self {
            target,
            parent,
            args: Vec::new(),
        }
    }

    /// Builder method: add one argument rectangle.
    pub fn with_arg(mut self, rect: Option<Rect>) -> Self {
        self.args.push(rect);
        self
    }
}
