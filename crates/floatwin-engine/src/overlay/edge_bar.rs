//! Edge drag handle of the mini window

use serde::Serialize;

use crate::config::EdgeBarMetrics;
use crate::math::{Rect, Vec2};

/// Layout of the edge handle next to a mini window
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct EdgeBar {
    /// Visible bar
    pub bar: Rect,
    /// Enlarged touch area around the bar
    pub touch: Rect,
}

impl EdgeBar {
    /// Lay the handle out for a window's on-screen rectangle
    ///
    /// The handle sits below the window on a portrait display and to its
    /// right on a landscape display. Its dimensions follow the window scale.
    pub fn layout(surface: Rect, scale: f32, landscape: bool, metrics: &EdgeBarMetrics) -> Self {
        let thickness = metrics.height * scale;
        let margin = metrics.margin * scale;
        let length = metrics.width * scale;

        if landscape {
            let bar = Rect::new(
                surface.right() + margin,
                surface.top() + (surface.height - length) / 2.0,
                thickness,
                length,
            );
            let touch = Rect::from_ltrb(
                surface.right(),
                bar.top() - margin * 3.0,
                bar.right() + margin * 4.0,
                bar.bottom() + margin * 3.0,
            );
            Self { bar, touch }
        } else {
            let bar = Rect::new(
                surface.left() + (surface.width - length) / 2.0,
                surface.bottom() + margin,
                length,
                thickness,
            );
            let touch = Rect::from_ltrb(
                bar.left() - margin * 3.0,
                surface.bottom(),
                bar.right() + margin * 3.0,
                bar.bottom() + margin * 4.0,
            );
            Self { bar, touch }
        }
    }

    /// Check if a point hits the handle's touch area
    #[inline]
    pub fn hit(&self, p: Vec2) -> bool {
        self.touch.contains(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_layout_below_window() {
        let surface = Rect::new(100.0, 200.0, 800.0, 1200.0);
        let bar = EdgeBar::layout(surface, 0.5, false, &EdgeBarMetrics::default());
        assert!((bar.bar.width - 60.0).abs() < 0.001);
        assert!((bar.bar.height - 6.0).abs() < 0.001);
        assert!((bar.bar.top() - 1408.0).abs() < 0.001);
        assert!((bar.bar.center().x - 500.0).abs() < 0.001);
        assert!((bar.touch.top() - 1400.0).abs() < 0.001);
        assert!((bar.touch.bottom() - (1414.0 + 32.0)).abs() < 0.001);
        assert!((bar.touch.left() - (470.0 - 24.0)).abs() < 0.001);
        assert!(bar.hit(Vec2::new(500.0, 1410.0)));
        assert!(!bar.hit(Vec2::new(500.0, 1300.0)));
    }

    #[test]
    fn test_landscape_layout_right_of_window() {
        let surface = Rect::new(100.0, 100.0, 1200.0, 700.0);
        let bar = EdgeBar::layout(surface, 1.0, true, &EdgeBarMetrics::default());
        assert!((bar.bar.left() - 1316.0).abs() < 0.001);
        assert!((bar.bar.width - 12.0).abs() < 0.001);
        assert!((bar.bar.height - 120.0).abs() < 0.001);
        assert!((bar.bar.center().y - 450.0).abs() < 0.001);
        assert!((bar.touch.left() - 1300.0).abs() < 0.001);
        assert!((bar.touch.right() - (1328.0 + 64.0)).abs() < 0.001);
    }
}
