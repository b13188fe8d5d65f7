//! Dismiss target shown while a pinned window is being moved

use serde::Serialize;

use crate::animation::EXIT_CURVE;
use crate::config::DismissMetrics;
use crate::math::{Rect, Vec2};

const SHOW_DELAY_MS: f64 = 100.0;
const FADE_MS: f64 = 100.0;
const HIDE_DELAY_DISMISSED_MS: f64 = 200.0;
const FADE_DISMISSED_MS: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
struct Fade {
    start_ms: f64,
    delay_ms: f64,
    duration_ms: f64,
    from: f32,
    to: f32,
}

impl Fade {
    fn alpha(&self, now_ms: f64) -> f32 {
        let elapsed = now_ms - self.start_ms - self.delay_ms;
        if elapsed <= 0.0 {
            return self.from;
        }
        let t = (elapsed / self.duration_ms).min(1.0) as f32;
        self.from + (self.to - self.from) * EXIT_CURVE.ease(t)
    }
}

/// Screen-edge drop target for dismissing a pinned window
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DismissTarget {
    hit_rect: Rect,
    visible: bool,
    hovered: bool,
    fade: Option<Fade>,
}

impl DismissTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit rectangle for a stable area: the button centered at the top,
    /// widened sideways and extended downward by the padding
    pub fn layout(stable: Rect, metrics: &DismissMetrics) -> Rect {
        let left = stable.center().x - metrics.button_width / 2.0 - metrics.padding_width;
        let top = stable.top() + metrics.top_margin;
        Rect::new(
            left,
            top,
            metrics.button_width + metrics.padding_width * 2.0,
            metrics.button_height + metrics.padding_height,
        )
    }

    /// Show the target for a new drag
    pub fn show(&mut self, stable: Rect, metrics: &DismissMetrics, now_ms: f64) {
        self.hit_rect = Self::layout(stable, metrics);
        self.hovered = false;
        if self.visible {
            return;
        }
        let from = self.alpha(now_ms);
        self.visible = true;
        self.fade = Some(Fade {
            start_ms: now_ms,
            delay_ms: SHOW_DELAY_MS,
            duration_ms: FADE_MS,
            from,
            to: 1.0,
        });
    }

    /// Hide the target; a dismissal fades out later and slower
    pub fn hide(&mut self, dismissed: bool, now_ms: f64) {
        if !self.visible {
            return;
        }
        let from = self.alpha(now_ms);
        self.visible = false;
        self.hovered = false;
        let (delay_ms, duration_ms) = if dismissed {
            (HIDE_DELAY_DISMISSED_MS, FADE_DISMISSED_MS)
        } else {
            (0.0, FADE_MS)
        };
        self.fade = Some(Fade {
            start_ms: now_ms,
            delay_ms,
            duration_ms,
            from,
            to: 0.0,
        });
    }

    /// Track the pointer against the hit rectangle
    ///
    /// # Returns
    /// Whether the pointer is inside the target
    pub fn cross_over(&mut self, pointer: Vec2) -> bool {
        self.hovered = self.visible && self.hit_rect.contains(pointer);
        self.hovered
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[inline]
    pub fn hit_rect(&self) -> Rect {
        self.hit_rect
    }

    /// Opacity of the target at `now_ms`
    pub fn alpha(&self, now_ms: f64) -> f32 {
        match &self.fade {
            Some(fade) => fade.alpha(now_ms),
            None => 0.0,
        }
    }
}
