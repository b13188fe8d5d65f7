//! 2D size type for dimensions

use serde::{Deserialize, Serialize};

/// 2D size for width and height
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if size is zero or negative
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if the size is strictly taller than wide
    #[inline]
    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }

    /// Longer edge
    #[inline]
    pub fn long_edge(self) -> f32 {
        self.width.max(self.height)
    }

    /// Shorter edge
    #[inline]
    pub fn short_edge(self) -> f32 {
        self.width.min(self.height)
    }

    /// Scale both dimensions
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_edges() {
        let s = Size::new(1080.0, 2400.0);
        assert!(s.is_portrait());
        assert!((s.long_edge() - 2400.0).abs() < 0.001);
        assert!((s.short_edge() - 1080.0).abs() < 0.001);
    }

    #[test]
    fn test_size_square_is_not_portrait() {
        assert!(!Size::new(500.0, 500.0).is_portrait());
    }

    #[test]
    fn test_size_scale() {
        let scaled = Size::new(100.0, 50.0).scale(2.0);
        assert!((scaled.width - 200.0).abs() < 0.001);
        assert!((scaled.height - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_size_empty() {
        assert!(Size::ZERO.is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }
}
