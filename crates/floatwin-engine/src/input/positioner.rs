//! Window positioner: geometry of one drag session
//!
//! The positioner mutates the dragged window's record directly (center,
//! drag scale, boundary gap, vertical ratio) and hands back the surface
//! frame to push for the next vsync. Mode changes that a release implies
//! are returned as a [`DragRelease`] for the controller to carry out.

use serde::Serialize;
use tracing::{debug, trace};

use crate::animation::{SurfaceFrame, LEAVE_BUTTON_EXIT_ALPHA};
use crate::config::DismissMetrics;
use crate::geometry::{self, ResizeZone};
use crate::math::{BoundaryGap, Rect, Size, Vec2};
use crate::record::WindowStateRecord;
use crate::window::{WindowId, WindowMode};
use super::dismiss::DismissTarget;
use super::drag::DragSession;
use super::velocity::VelocityTracker;

/// Display area a drag happens in
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DragArea {
    /// Full display bounds
    pub display: Rect,
    /// Display bounds minus system insets
    pub stable: Rect,
}

impl DragArea {
    pub fn new(display: Rect, stable: Rect) -> Self {
        Self { display, stable }
    }

    #[inline]
    pub fn display_size(&self) -> Size {
        self.display.size()
    }

    #[inline]
    pub fn is_landscape(&self) -> bool {
        !self.display.size().is_portrait()
    }
}

/// Result of one drag move
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragStep {
    pub window: WindowId,
    /// Frame to push on the next vsync
    pub frame: SurfaceFrame,
    /// A threshold or dismiss-target boundary was crossed inward
    pub haptic: bool,
    /// The pointer is over the dismiss target
    pub over_dismiss: bool,
}

/// What a release asks the controller to do
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragRelease {
    /// Settle with a spring from the release position to the snap position
    Fling { from: Vec2, to: Vec2, velocity: Vec2 },
    /// Released over the dismiss target
    Dismiss,
    /// Resize released in a threshold zone
    Resize { zone: ResizeZone },
}

/// Drag state for the floating windows
#[derive(Clone, Debug, Default)]
pub struct Positioner {
    drag: Option<DragSession>,
    velocity: VelocityTracker,
    dismiss: DismissTarget,
}

impl Positioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current drag session
    #[inline]
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Check if currently dragging
    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Window being dragged
    pub fn dragging_window(&self) -> Option<WindowId> {
        self.drag.as_ref().map(DragSession::window)
    }

    pub fn dismiss_target(&self) -> &DismissTarget {
        &self.dismiss
    }

    /// Start moving a window
    ///
    /// The dismiss target is shown when `dismiss` metrics are given.
    pub fn begin_translate(
        &mut self,
        record: &WindowStateRecord,
        pointer: Vec2,
        time_ms: f64,
        area: &DragArea,
        dismiss: Option<&DismissMetrics>,
    ) {
        self.velocity.clear();
        self.velocity.add(time_ms, pointer);
        if let Some(metrics) = dismiss {
            self.dismiss.show(area.stable, metrics, time_ms);
        }
        debug!(window = record.id, "translate drag started");
        self.drag = Some(DragSession::Translate {
            window: record.id,
            start_pointer: pointer,
            start_center: record.center,
        });
    }

    /// Start resizing a window from its edge handle
    ///
    /// # Returns
    /// The first frame of the resize
    pub fn begin_resize(
        &mut self,
        record: &mut WindowStateRecord,
        pointer: Vec2,
        time_ms: f64,
        handle: Rect,
        area: &DragArea,
    ) -> Option<DragStep> {
        self.velocity.clear();
        self.velocity.add(time_ms, pointer);
        let reversed = geometry::is_orientation_reversed(record.orientation(), area.is_landscape());
        debug!(window = record.id, reversed, "resize drag started");
        self.drag = Some(DragSession::Resize {
            window: record.id,
            start_pointer: pointer,
            handle_center: handle.center(),
            handle_size: handle.size(),
            display_landscape: area.is_landscape(),
            reversed,
            zone: ResizeZone::None,
        });
        self.on_move(record, pointer, time_ms, area)
    }

    /// Apply a pointer move to the dragged window
    ///
    /// Returns `None` when no drag is active for `record`.
    pub fn on_move(
        &mut self,
        record: &mut WindowStateRecord,
        pointer: Vec2,
        time_ms: f64,
        area: &DragArea,
    ) -> Option<DragStep> {
        let drag = self.drag.as_mut()?;
        if drag.window() != record.id {
            return None;
        }
        self.velocity.add(time_ms, pointer);

        match drag {
            DragSession::Translate {
                start_pointer,
                start_center,
                ..
            } => {
                let clamped = area.stable.clamp_point(pointer);
                let offset = (clamped - *start_pointer).round();
                record.center = *start_center + offset;
                record.boundary_gap = BoundaryGap::EMPTY;
                record.set_vertical_ratio(record.center, area.stable, true);

                let was_over = self.dismiss.is_hovered();
                let over_dismiss = self.dismiss.cross_over(pointer);
                let alpha = if over_dismiss { LEAVE_BUTTON_EXIT_ALPHA } else { 1.0 };
                trace!(window = record.id, x = record.center.x, y = record.center.y, "translate");
                Some(DragStep {
                    window: record.id,
                    frame: record.resting_frame(area.display_size()).with_alpha(alpha),
                    haptic: over_dismiss && !was_over,
                    over_dismiss,
                })
            }
            DragSession::Resize {
                start_pointer,
                handle_center,
                handle_size,
                display_landscape,
                reversed,
                zone,
                ..
            } => {
                let corrected = geometry::correct_handle_pointer(
                    pointer,
                    *start_pointer,
                    *handle_center,
                    *handle_size,
                    *display_landscape,
                );
                let raw = geometry::drag_scale_from_pointer(
                    record.bounds.size(),
                    area.display_size(),
                    record.center,
                    corrected,
                );
                let (min, max) = geometry::drag_scale_limits(record.scale_factor, *reversed);
                let scale = raw.max(min).min(max);
                record.set_drag_scale(scale);
                if !record.boundary_gap.is_empty() {
                    record.center = record.center_from_gap(area.stable);
                }

                let next = geometry::resize_zone(scale, *reversed);
                let haptic = next != *zone && next != ResizeZone::None;
                *zone = next;
                trace!(window = record.id, scale, zone = ?next, "resize");
                Some(DragStep {
                    window: record.id,
                    frame: record.resting_frame(area.display_size()),
                    haptic,
                    over_dismiss: false,
                })
            }
        }
    }

    /// End the drag on release or cancel
    ///
    /// A translated pinned window snaps to the edges chosen from its release
    /// position and velocity; a translated mini window stays where it was
    /// dropped.
    ///
    /// # Arguments
    /// * `max_velocity` - Cap for the release velocity, in pixels per second
    pub fn finish(
        &mut self,
        record: &mut WindowStateRecord,
        pointer: Vec2,
        time_ms: f64,
        area: &DragArea,
        max_velocity: f32,
    ) -> Option<DragRelease> {
        if self.dragging_window() != Some(record.id) {
            return None;
        }
        let drag = self.drag.take()?;
        self.velocity.add(time_ms, pointer);

        if drag.is_resize() {
            debug!(window = record.id, zone = ?drag.zone(), "resize drag released");
            return Some(DragRelease::Resize { zone: drag.zone() });
        }

        if self.dismiss.is_hovered() {
            self.dismiss.hide(true, time_ms);
            debug!(window = record.id, "released over dismiss target");
            return Some(DragRelease::Dismiss);
        }
        self.dismiss.hide(false, time_ms);

        let velocity = self.velocity.velocity(max_velocity);
        let display = area.display_size();
        let from = record.resting_frame(display).position;
        if record.mode == WindowMode::Pinned {
            let surface = record.placement(display).rect;
            record.boundary_gap = geometry::boundary_gap_after_fling(
                area.display.width,
                area.stable,
                surface,
                pointer,
                velocity,
            );
            record.center = record.center_from_gap(area.stable);
            record.set_vertical_ratio(record.center, area.stable, true);
        }
        let to = record.resting_frame(display).position;
        debug!(
            window = record.id,
            vx = velocity.x,
            vy = velocity.y,
            gap = ?record.boundary_gap,
            "translate drag released"
        );
        Some(DragRelease::Fling { from, to, velocity })
    }

    /// Abort the drag without a release
    pub fn abort(&mut self, now_ms: f64) -> Option<DragSession> {
        self.dismiss.hide(false, now_ms);
        self.velocity.clear();
        self.drag.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::geometry::BOUNDARY_GAP;

    fn area() -> DragArea {
        DragArea::new(
            Rect::new(0.0, 0.0, 1080.0, 2400.0),
            Rect::new(0.0, 100.0, 1080.0, 2200.0),
        )
    }

    fn pinned() -> WindowStateRecord {
        let mut r = WindowStateRecord::new(
            3,
            "com.example",
            Rect::new(0.0, 0.0, 1080.0, 1920.0),
            &EngineConfig::default(),
        );
        r.mode = WindowMode::Pinned;
        r.center = Vec2::new(800.0, 600.0);
        r.boundary_gap = BoundaryGap::ORIGIN;
        r.refresh_scale_factor(area().display_size());
        r
    }

    fn mini() -> WindowStateRecord {
        let mut r = pinned();
        r.mode = WindowMode::Mini;
        r.boundary_gap = BoundaryGap::EMPTY;
        r.scale = 0.75;
        r.center = Vec2::new(540.0, 1200.0);
        r.set_vertical_ratio(r.center, area().stable, false);
        r
    }

    #[test]
    fn test_translate_moves_center_and_clears_gap() {
        let mut p = Positioner::new();
        let mut r = pinned();
        p.begin_translate(&r, Vec2::new(800.0, 600.0), 0.0, &area(), None);
        assert!(p.is_dragging());
        let step = p.on_move(&mut r, Vec2::new(700.0, 900.0), 16.0, &area()).unwrap();
        assert!((r.center.x - 700.0).abs() < 0.001);
        assert!((r.center.y - 900.0).abs() < 0.001);
        assert!(r.boundary_gap.is_empty());
        assert!((step.frame.alpha - 1.0).abs() < 0.001);
        assert!(!step.haptic);
    }

    #[test]
    fn test_translate_pointer_clamped_to_stable() {
        let mut p = Positioner::new();
        let mut r = pinned();
        p.begin_translate(&r, Vec2::new(800.0, 600.0), 0.0, &area(), None);
        p.on_move(&mut r, Vec2::new(800.0, 0.0), 16.0, &area());
        // Pointer held at the stable top (100), so the center moved by -500
        assert!((r.center.y - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_other_window_ignored() {
        let mut p = Positioner::new();
        let r = pinned();
        let mut other = mini();
        other.id = 99;
        p.begin_translate(&r, Vec2::new(800.0, 600.0), 0.0, &area(), None);
        assert!(p.on_move(&mut other, Vec2::new(0.0, 0.0), 16.0, &area()).is_none());
        assert!(p.finish(&mut other, Vec2::ZERO, 20.0, &area(), 8000.0).is_none());
        assert!(p.is_dragging());
    }

    #[test]
    fn test_dismiss_hover_and_release() {
        let mut p = Positioner::new();
        let mut r = pinned();
        let metrics = DismissMetrics::default();
        p.begin_translate(&r, Vec2::new(800.0, 600.0), 0.0, &area(), Some(&metrics));
        let over = p.dismiss_target().hit_rect().center();

        let step = p.on_move(&mut r, over, 16.0, &area()).unwrap();
        assert!(step.over_dismiss);
        assert!(step.haptic);
        assert!((step.frame.alpha - LEAVE_BUTTON_EXIT_ALPHA).abs() < 0.001);

        let again = p.on_move(&mut r, over + Vec2::new(1.0, 0.0), 32.0, &area()).unwrap();
        assert!(!again.haptic);

        let release = p.finish(&mut r, over, 48.0, &area(), 8000.0);
        assert_eq!(release, Some(DragRelease::Dismiss));
        assert!(!p.is_dragging());
        assert!(!p.dismiss_target().is_visible());
    }

    #[test]
    fn test_slow_release_snaps_by_position() {
        let mut p = Positioner::new();
        let mut r = pinned();
        p.begin_translate(&r, Vec2::new(800.0, 600.0), 0.0, &area(), None);
        p.on_move(&mut r, Vec2::new(300.0, 1000.0), 500.0, &area());
        let release = p.finish(&mut r, Vec2::new(300.0, 1000.0), 600.0, &area(), 8000.0);
        let Some(DragRelease::Fling { from, to, velocity }) = release else {
            panic!("expected fling");
        };
        assert!(velocity.x.abs() < 0.001);
        assert!((r.boundary_gap.left - BOUNDARY_GAP).abs() < 0.001);
        assert!(r.boundary_gap.right.abs() < 0.001);
        assert!((to.x - BOUNDARY_GAP).abs() < 0.5);
        assert!((from.x - to.x).abs() > 1.0);
    }

    #[test]
    fn test_fast_release_snaps_by_velocity() {
        let mut p = Positioner::new();
        let mut r = pinned();
        p.begin_translate(&r, Vec2::new(200.0, 1000.0), 0.0, &area(), None);
        // 400 px in 80 ms: 5000 px/s to the right from the left half
        for i in 1..=8 {
            let x = 200.0 + i as f32 * 50.0;
            p.on_move(&mut r, Vec2::new(x, 1000.0), i as f64 * 10.0, &area());
        }
        p.finish(&mut r, Vec2::new(600.0, 1000.0), 80.0, &area(), 8000.0);
        assert!((r.boundary_gap.right - BOUNDARY_GAP).abs() < 0.001);
        assert!(r.boundary_gap.left.abs() < 0.001);
    }

    #[test]
    fn test_mini_translate_does_not_snap() {
        let mut p = Positioner::new();
        let mut r = mini();
        p.begin_translate(&r, Vec2::new(540.0, 1200.0), 0.0, &area(), None);
        p.on_move(&mut r, Vec2::new(500.0, 1100.0), 500.0, &area());
        let release = p.finish(&mut r, Vec2::new(500.0, 1100.0), 600.0, &area(), 8000.0);
        let Some(DragRelease::Fling { from, to, .. }) = release else {
            panic!("expected fling");
        };
        assert!(r.boundary_gap.is_empty());
        assert!((from.x - to.x).abs() < 0.001);
        assert!((from.y - to.y).abs() < 0.001);
    }

    #[test]
    fn test_resize_shrinks_to_pinned_zone() {
        let mut p = Positioner::new();
        let mut r = mini();
        // Handle just below the window bottom (1200 + 720 + margin)
        let handle = Rect::new(480.0, 1932.0, 120.0, 12.0);
        let first = p
            .begin_resize(&mut r, handle.center(), 0.0, handle, &area())
            .unwrap();
        assert!(!first.haptic);
        assert!((r.scale - 0.7625).abs() < 0.001);

        let step = p.on_move(&mut r, Vec2::new(540.0, 1500.0), 16.0, &area()).unwrap();
        assert!(r.scale <= geometry::MINI_WINDOW_SCALE_EXIT_MIN);
        assert!(step.haptic);
        assert_eq!(p.drag().map(DragSession::zone), Some(ResizeZone::ToPinned));

        // Still inside the zone: no second buzz
        let again = p.on_move(&mut r, Vec2::new(540.0, 1490.0), 32.0, &area()).unwrap();
        assert!(!again.haptic);

        let release = p.finish(&mut r, Vec2::new(540.0, 1490.0), 48.0, &area(), 8000.0);
        assert_eq!(
            release,
            Some(DragRelease::Resize {
                zone: ResizeZone::ToPinned
            })
        );
    }

    #[test]
    fn test_resize_scale_clamped() {
        let mut p = Positioner::new();
        let mut r = mini();
        let handle = Rect::new(480.0, 1932.0, 120.0, 12.0);
        p.begin_resize(&mut r, handle.center(), 0.0, handle, &area());
        p.on_move(&mut r, Vec2::new(540.0, 3000.0), 16.0, &area());
        assert!((r.scale - geometry::DRAG_SCALE_MAX).abs() < 0.001);
        p.on_move(&mut r, Vec2::new(540.0, 0.0), 32.0, &area());
        assert!((r.scale - geometry::DRAG_SCALE_MIN).abs() < 0.001);
    }

    #[test]
    fn test_abort_clears_drag() {
        let mut p = Positioner::new();
        let r = pinned();
        p.begin_translate(&r, Vec2::ZERO, 0.0, &area(), Some(&DismissMetrics::default()));
        assert!(p.abort(10.0).is_some());
        assert!(!p.is_dragging());
        assert!(!p.dismiss_target().is_visible());
    }
}
