//! Boundary gap: which display edges a window is snapped to

use serde::{Deserialize, Serialize};
use crate::geometry::BOUNDARY_GAP;

/// Per-edge snap distances
///
/// A positive edge means the window is held flush against that display edge,
/// inset by the gap. A zero edge means the window floats freely on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryGap {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundaryGap {
    /// Not snapped to any edge
    pub const EMPTY: BoundaryGap = BoundaryGap {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Initial placement: top-right corner
    pub const ORIGIN: BoundaryGap = BoundaryGap {
        left: 0.0,
        top: BOUNDARY_GAP,
        right: BOUNDARY_GAP,
        bottom: 0.0,
    };

    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Check if no edge is snapped
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left <= 0.0 && self.top <= 0.0 && self.right <= 0.0 && self.bottom <= 0.0
    }

    /// Copy the positive edges of `other` into this gap
    ///
    /// Edges that are zero in `other` keep their current value.
    pub fn merge_positive(&mut self, other: &BoundaryGap) {
        if other.left > 0.0 {
            self.left = other.left;
        }
        if other.top > 0.0 {
            self.top = other.top;
        }
        if other.right > 0.0 {
            self.right = other.right;
        }
        if other.bottom > 0.0 {
            self.bottom = other.bottom;
        }
    }
}
