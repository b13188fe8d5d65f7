//! Axis-aligned rectangle type

use floatwin_hal::Bounds;
use serde::{Deserialize, Serialize};
use super::{Size, Vec2};

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Zero rectangle at origin
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Create a new rectangle
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create from edges
    #[inline]
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    /// Create from position and size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Create from center point and size
    #[inline]
    pub fn from_center_size(center: Vec2, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Round to integer host bounds
    #[inline]
    pub fn to_bounds(&self) -> Bounds {
        Bounds::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.right().round() as i32,
            self.bottom().round() as i32,
        )
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Get position (top-left corner)
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Get size
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Clamp a point into the rectangle (edges inclusive)
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.right().max(self.x)),
            p.y.clamp(self.y, self.bottom().max(self.y)),
        )
    }

    /// Expand rectangle by a different amount per axis
    #[inline]
    pub fn expand_xy(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + dx * 2.0,
            self.height + dy * 2.0,
        )
    }

    /// Translate rectangle by offset
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Rect::from_ltrb(b.left as f32, b.top as f32, b.right as f32, b.bottom as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center() {
        let r = Rect::new(100.0, 200.0, 50.0, 30.0);
        let c = r.center();
        assert!((c.x - 125.0).abs() < 0.001);
        assert!((c.y - 215.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Vec2::new(50.0, 40.0)));
        assert!(!rect.contains(Vec2::new(5.0, 40.0)));
        assert!(!rect.contains(Vec2::new(50.0, 100.0)));
    }

    #[test]
    fn test_rect_clamp_point() {
        let rect = Rect::new(0.0, 100.0, 1080.0, 2200.0);
        let p = rect.clamp_point(Vec2::new(-20.0, 2500.0));
        assert!((p.x - 0.0).abs() < 0.001);
        assert!((p.y - 2300.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_bounds_conversion() {
        let r: Rect = Bounds::new(10, 20, 110, 70).into();
        assert!((r.width - 100.0).abs() < 0.001);
        assert!((r.height - 50.0).abs() < 0.001);
        assert_eq!(r.to_bounds(), Bounds::new(10, 20, 110, 70));
    }

    #[test]
    fn test_rect_from_center_size() {
        let r = Rect::from_center_size(Vec2::new(100.0, 100.0), Size::new(50.0, 30.0));
        assert!((r.x - 75.0).abs() < 0.001);
        assert!((r.y - 85.0).abs() < 0.001);
        assert!((r.center().x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_expand_xy() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0).expand_xy(5.0, 10.0);
        assert!((r.x - 5.0).abs() < 0.001);
        assert!((r.y - 10.0).abs() < 0.001);
        assert!((r.width - 110.0).abs() < 0.001);
        assert!((r.height - 70.0).abs() < 0.001);
    }
}
