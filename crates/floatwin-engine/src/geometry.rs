//! Geometry model for floating windows
//!
//! Pure functions mapping a window's logical state (bounds, center, scale,
//! boundary gap) onto an on-screen surface rectangle, plus the scale preset
//! tables and the drag/fling decision rules.
//!
//! All rectangles are in display pixels. Window sizes are the unscaled
//! container size; the on-screen size is `size * scale * scale_factor`.

use serde::Serialize;

use crate::math::{BoundaryGap, Rect, Size, Vec2};
use crate::window::Orientation;

/// Distance between a snapped window and the display edge
pub const BOUNDARY_GAP: f32 = 44.0;

/// Aspect ratio of the default floating container
pub const DEFAULT_POPUP_RATIO: f32 = 16.0 / 9.0;

/// Tolerance when deciding whether bounds already have the default ratio
const POPUP_RATIO_TOLERANCE: f32 = 0.01;

/// Fling speed above which velocity, not position, picks the snap edge
pub const FLING_VELOCITY_THRESHOLD: f32 = 3000.0;

// Pinned presets
pub const PINNED_SCALE_LARGE_LANDSCAPE: f32 = 0.517;
pub const PINNED_SCALE_LARGE_PORTRAIT: f32 = 0.43;
pub const PINNED_SCALE_SMALL_LANDSCAPE: f32 = 0.28;
pub const PINNED_SCALE_SMALL_PORTRAIT: f32 = 0.28;

// Mini presets, window orientation x display orientation
const MINI_SCALE_LANDSCAPE_ON_LANDSCAPE: f32 = 0.68;
const MINI_SCALE_LANDSCAPE_ON_PORTRAIT: f32 = 0.9;
const MINI_SCALE_PORTRAIT_ON_LANDSCAPE: f32 = 0.9;
const MINI_SCALE_PORTRAIT_ON_PORTRAIT: f32 = 0.75;

/// Resizing a mini window above this scale exits to fullscreen
pub const MINI_WINDOW_SCALE_EXIT_MAX: f32 = 0.86;
/// Resizing a mini window to or below this scale docks it as pinned
pub const MINI_WINDOW_SCALE_EXIT_MIN: f32 = 0.6;
/// Upper threshold when window and display orientations differ
pub const MINI_WINDOW_SCALE_EXIT_MAX_REVERSED: f32 = 1.0;
/// Lower threshold when window and display orientations differ
pub const MINI_WINDOW_SCALE_EXIT_MIN_REVERSED: f32 = 0.66;

/// Smallest scale reachable by drag-resize, before the scale factor
pub const DRAG_SCALE_MIN: f32 = 0.28;
/// Largest scale reachable by drag-resize
pub const DRAG_SCALE_MAX: f32 = 0.96;
/// Largest scale reachable by drag-resize when orientations differ
pub const DRAG_SCALE_MAX_REVERSED: f32 = 1.1;

/// On-screen placement of a surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScreenPlacement {
    /// Scaled on-screen rectangle
    pub rect: Rect,
    /// Shrink-to-fit factor applied before scaling (1.0 if none)
    pub scale_factor: f32,
}

impl ScreenPlacement {
    /// Total scale to apply to the unscaled surface
    #[inline]
    pub fn surface_scale(&self, scale: f32) -> f32 {
        scale * self.scale_factor
    }
}

/// Where a drag-resize currently sits relative to the mode thresholds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeZone {
    /// Between thresholds: snaps back to the default mini scale
    #[default]
    None,
    /// At or below the lower threshold: docks as pinned
    ToPinned,
    /// Above the upper threshold: exits to fullscreen
    ToFull,
}

/// Compute the on-screen rectangle of a window
///
/// When `preserve_aspect` is false and the window and display orientations
/// are orthogonal, the window is first shrunk by its short/long edge ratio.
///
/// # Arguments
/// * `window` - Unscaled container size
/// * `display` - Display size (only its orientation matters)
/// * `center` - Logical center of the window
/// * `scale` - Surface scale
/// * `preserve_aspect` - Skip the orthogonal shrink-to-fit
pub fn compute_on_screen_rect(
    window: Size,
    display: Size,
    center: Vec2,
    scale: f32,
    preserve_aspect: bool,
) -> ScreenPlacement {
    let mut scale_factor = 1.0;
    if !preserve_aspect
        && Orientation::of(window) != Orientation::of(display)
        && window.long_edge() > 0.0
    {
        scale_factor = window.short_edge() / window.long_edge();
    }
    let size = window.scale(scale_factor * scale);
    ScreenPlacement {
        rect: Rect::from_center_size(center, size),
        scale_factor,
    }
}

/// Recompute a window's center from the edges it is snapped to
///
/// The vertical position defaults to `vertical_ratio * display.height`; each
/// snapped edge then overrides its axis so the window sits flush against that
/// edge, inset by the gap.
///
/// # Arguments
/// * `window` - On-screen size at scale 1.0 (container size times scale factor)
/// * `display` - Rectangle the window is kept inside
/// * `gap` - Snapped edges
/// * `vertical_ratio` - Remembered vertical position for the current orientation
/// * `prior` - Current center; its x survives when no horizontal edge is snapped
/// * `scale` - Surface scale
pub fn recompute_center_from_gap(
    window: Size,
    display: Rect,
    gap: &BoundaryGap,
    vertical_ratio: f32,
    prior: Vec2,
    scale: f32,
) -> Vec2 {
    let half_w = window.width * scale / 2.0;
    let half_h = window.height * scale / 2.0;
    let mut center = Vec2::new(prior.x, display.height * vertical_ratio);

    if gap.left > 0.0 {
        center.x = display.left() + gap.left + half_w;
    }
    if gap.top > 0.0 {
        center.y = display.top() + gap.top + half_h;
    }
    if gap.right > 0.0 {
        center.x = display.right() - gap.right - half_w;
    }
    if gap.bottom > 0.0 {
        center.y = display.bottom() - gap.bottom - half_h;
    }
    center
}

/// Default scale of a mini window
pub fn default_mini_scale(window: Orientation, display_is_portrait: bool) -> f32 {
    match (window, display_is_portrait) {
        (Orientation::Landscape, false) => MINI_SCALE_LANDSCAPE_ON_LANDSCAPE,
        (Orientation::Landscape, true) => MINI_SCALE_LANDSCAPE_ON_PORTRAIT,
        (Orientation::Portrait, false) => MINI_SCALE_PORTRAIT_ON_LANDSCAPE,
        (Orientation::Portrait, true) => MINI_SCALE_PORTRAIT_ON_PORTRAIT,
    }
}

/// Scale preset of a pinned window
pub fn default_pinned_scale(window: Orientation, small: bool) -> f32 {
    match (window, small) {
        (Orientation::Landscape, true) => PINNED_SCALE_SMALL_LANDSCAPE,
        (Orientation::Portrait, true) => PINNED_SCALE_SMALL_PORTRAIT,
        (Orientation::Landscape, false) => PINNED_SCALE_LARGE_LANDSCAPE,
        (Orientation::Portrait, false) => PINNED_SCALE_LARGE_PORTRAIT,
    }
}

/// Check if a preset matches the small pinned tier
pub fn is_small_pinned_scale(window: Orientation, scale: f32) -> Option<bool> {
    if (scale - default_pinned_scale(window, true)).abs() < f32::EPSILON {
        Some(true)
    } else if (scale - default_pinned_scale(window, false)).abs() < f32::EPSILON {
        Some(false)
    } else {
        None
    }
}

/// Check if the window orientation is orthogonal to the display's
#[inline]
pub fn is_orientation_reversed(window: Orientation, display_is_landscape: bool) -> bool {
    window.is_portrait() == display_is_landscape
}

/// Compute a resize scale from the pointer position
///
/// The scale is the pointer's distance from the center along the display's
/// long axis, relative to half the reference length. The reference length is
/// the window's own extent along that axis when the window is strictly longer
/// along it, otherwise a default-ratio extent derived from the display's
/// short edge. Square windows and square displays take the second branch
/// and the portrait axis respectively.
pub fn drag_scale_from_pointer(window: Size, display: Size, center: Vec2, pointer: Vec2) -> f32 {
    let (delta, reference) = if display.width > display.height {
        let reference = if window.width > window.height {
            window.width
        } else {
            display.height / DEFAULT_POPUP_RATIO
        };
        (pointer.x - center.x, reference)
    } else {
        let reference = if window.height > window.width {
            window.height
        } else {
            display.width / DEFAULT_POPUP_RATIO
        };
        (pointer.y - center.y, reference)
    };
    if reference <= 0.0 {
        return 0.0;
    }
    delta.max(0.0) / (reference / 2.0)
}

/// Scale range allowed during drag-resize
#[inline]
pub fn drag_scale_limits(scale_factor: f32, reversed: bool) -> (f32, f32) {
    let min = if scale_factor > 0.0 {
        DRAG_SCALE_MIN / scale_factor
    } else {
        DRAG_SCALE_MIN
    };
    let max = if reversed {
        DRAG_SCALE_MAX_REVERSED
    } else {
        DRAG_SCALE_MAX
    };
    (min, max)
}

/// Classify a drag-resize scale against the mode thresholds
pub fn resize_zone(scale: f32, reversed: bool) -> ResizeZone {
    let (min, max) = if reversed {
        (MINI_WINDOW_SCALE_EXIT_MIN_REVERSED, MINI_WINDOW_SCALE_EXIT_MAX_REVERSED)
    } else {
        (MINI_WINDOW_SCALE_EXIT_MIN, MINI_WINDOW_SCALE_EXIT_MAX)
    };
    if scale <= min {
        ResizeZone::ToPinned
    } else if scale > max {
        ResizeZone::ToFull
    } else {
        ResizeZone::None
    }
}

/// Decide which display edges a released window snaps to
///
/// Horizontally the window always snaps to the left or right edge: by the
/// half of the display the pointer was released in, unless the horizontal
/// speed exceeds the fling threshold toward the other side. Vertically, a
/// slow release snaps to the top or bottom only when the window already
/// touches that edge's gap band; a fast release also snaps in the direction
/// of a vertical fling.
///
/// # Arguments
/// * `display_width` - Full display width
/// * `display` - Rectangle the window is kept inside
/// * `window` - On-screen rectangle at release
/// * `release` - Pointer position at release
/// * `velocity` - Release velocity in pixels per second
pub fn boundary_gap_after_fling(
    display_width: f32,
    display: Rect,
    window: Rect,
    release: Vec2,
    velocity: Vec2,
) -> BoundaryGap {
    let mut gap = BoundaryGap::EMPTY;

    let is_left = release.x < display_width / 2.0;
    let spring_left = if is_left {
        velocity.x < FLING_VELOCITY_THRESHOLD
    } else {
        velocity.x < -FLING_VELOCITY_THRESHOLD
    };
    if spring_left {
        gap.left = BOUNDARY_GAP;
    } else {
        gap.right = BOUNDARY_GAP;
    }

    let near_top = window.top() <= display.top() + BOUNDARY_GAP;
    let near_bottom = window.bottom() >= display.bottom() - BOUNDARY_GAP;
    let slow = velocity.x.abs() <= FLING_VELOCITY_THRESHOLD
        && velocity.y.abs() <= FLING_VELOCITY_THRESHOLD;

    if slow {
        if near_top {
            gap.top = BOUNDARY_GAP;
        }
        if near_bottom {
            gap.bottom = BOUNDARY_GAP;
        }
    } else {
        if velocity.y < -FLING_VELOCITY_THRESHOLD || near_top {
            gap.top = BOUNDARY_GAP;
        }
        if velocity.y > FLING_VELOCITY_THRESHOLD || near_bottom {
            gap.bottom = BOUNDARY_GAP;
        }
    }
    gap
}

/// Reshape container bounds to the default floating aspect ratio
///
/// Bounds already within tolerance of the ratio are returned unchanged.
/// Otherwise the short edge is kept and the long edge is derived from it.
/// The result is centered on the original bounds, not anchored at their
/// top-left corner, so the popup opens over the middle of the task.
pub fn default_popup_bounds(bounds: Rect) -> Rect {
    let size = bounds.size();
    if size.short_edge() <= 0.0 {
        return bounds;
    }
    let ratio = size.long_edge() / size.short_edge();
    if (ratio - DEFAULT_POPUP_RATIO).abs() <= POPUP_RATIO_TOLERANCE {
        return bounds;
    }
    let reshaped = if size.is_portrait() {
        Size::new(size.width, size.width * DEFAULT_POPUP_RATIO)
    } else {
        Size::new(size.height * DEFAULT_POPUP_RATIO, size.height)
    };
    Rect::from_center_size(bounds.center(), reshaped)
}

/// Shift a resize pointer so the grabbed point of the edge handle stays under the finger
///
/// On a landscape display the handle sits to the right of the window and the
/// correction applies to x; otherwise it sits below and applies to y.
pub fn correct_handle_pointer(
    pointer: Vec2,
    start_pointer: Vec2,
    handle_center: Vec2,
    handle_size: Size,
    display_is_landscape: bool,
) -> Vec2 {
    if display_is_landscape {
        Vec2::new(
            pointer.x - handle_size.width / 2.0 + handle_center.x - start_pointer.x,
            pointer.y,
        )
    } else {
        Vec2::new(
            pointer.x,
            pointer.y - handle_size.height / 2.0 + handle_center.y - start_pointer.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTRAIT_DISPLAY: Size = Size::new(1080.0, 2400.0);

    #[test]
    fn test_on_screen_rect_preserve_aspect() {
        let window = Size::new(1920.0, 1080.0);
        let placement =
            compute_on_screen_rect(window, PORTRAIT_DISPLAY, Vec2::new(540.0, 1200.0), 0.5, true);
        assert!((placement.scale_factor - 1.0).abs() < 0.001);
        assert!((placement.rect.width - 960.0).abs() < 0.001);
        assert!((placement.rect.center().x - 540.0).abs() < 0.001);
    }

    #[test]
    fn test_on_screen_rect_orthogonal_shrink() {
        let window = Size::new(1920.0, 1080.0);
        let placement =
            compute_on_screen_rect(window, PORTRAIT_DISPLAY, Vec2::new(540.0, 1200.0), 0.5, false);
        assert!((placement.scale_factor - 1080.0 / 1920.0).abs() < 0.001);
        assert!((placement.rect.width - 540.0).abs() < 0.001);
        assert!((placement.rect.height - 303.75).abs() < 0.01);
    }

    #[test]
    fn test_on_screen_rect_matching_orientation_no_shrink() {
        let window = Size::new(1080.0, 1920.0);
        let placement =
            compute_on_screen_rect(window, PORTRAIT_DISPLAY, Vec2::new(540.0, 1200.0), 0.5, false);
        assert!((placement.scale_factor - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_center_from_left_top_gap() {
        let display = Rect::new(0.0, 0.0, 1080.0, 2400.0);
        let gap = BoundaryGap::new(BOUNDARY_GAP, BOUNDARY_GAP, 0.0, 0.0);
        let c = recompute_center_from_gap(
            Size::new(1080.0, 1920.0),
            display,
            &gap,
            0.5,
            Vec2::new(540.0, 1200.0),
            0.25,
        );
        assert!((c.x - (44.0 + 135.0)).abs() < 0.001);
        assert!((c.y - (44.0 + 240.0)).abs() < 0.001);
    }

    #[test]
    fn test_center_from_right_gap_uses_ratio() {
        let display = Rect::new(0.0, 0.0, 1080.0, 2400.0);
        let gap = BoundaryGap::new(0.0, 0.0, BOUNDARY_GAP, 0.0);
        let c = recompute_center_from_gap(
            Size::new(1080.0, 1920.0),
            display,
            &gap,
            0.4,
            Vec2::new(100.0, 100.0),
            0.25,
        );
        assert!((c.x - (1080.0 - 44.0 - 135.0)).abs() < 0.001);
        assert!((c.y - 960.0).abs() < 0.001);
    }

    #[test]
    fn test_center_from_empty_gap_keeps_x() {
        let display = Rect::new(0.0, 0.0, 1080.0, 2400.0);
        let c = recompute_center_from_gap(
            Size::new(1080.0, 1920.0),
            display,
            &BoundaryGap::EMPTY,
            0.5,
            Vec2::new(321.0, 0.0),
            0.75,
        );
        assert!((c.x - 321.0).abs() < 0.001);
        assert!((c.y - 1200.0).abs() < 0.001);
    }

    #[test]
    fn test_default_scales() {
        assert!((default_mini_scale(Orientation::Landscape, false) - 0.68).abs() < 0.001);
        assert!((default_mini_scale(Orientation::Landscape, true) - 0.9).abs() < 0.001);
        assert!((default_mini_scale(Orientation::Portrait, false) - 0.9).abs() < 0.001);
        assert!((default_mini_scale(Orientation::Portrait, true) - 0.75).abs() < 0.001);
        assert!((default_pinned_scale(Orientation::Landscape, false) - 0.517).abs() < 0.001);
        assert!((default_pinned_scale(Orientation::Portrait, false) - 0.43).abs() < 0.001);
        assert!((default_pinned_scale(Orientation::Portrait, true) - 0.28).abs() < 0.001);
    }

    #[test]
    fn test_small_pinned_detection() {
        assert_eq!(is_small_pinned_scale(Orientation::Portrait, 0.28), Some(true));
        assert_eq!(is_small_pinned_scale(Orientation::Portrait, 0.43), Some(false));
        assert_eq!(is_small_pinned_scale(Orientation::Portrait, 0.5), None);
    }

    #[test]
    fn test_drag_scale_portrait_display() {
        let window = Size::new(1080.0, 1920.0);
        let center = Vec2::new(540.0, 1200.0);
        // Pointer at the bottom edge of a full-size window
        let scale = drag_scale_from_pointer(window, PORTRAIT_DISPLAY, center, Vec2::new(540.0, 2160.0));
        assert!((scale - 1.0).abs() < 0.001);
        // Pointer above the center clamps to zero
        let scale = drag_scale_from_pointer(window, PORTRAIT_DISPLAY, center, Vec2::new(540.0, 100.0));
        assert!(scale.abs() < 0.001);
    }

    #[test]
    fn test_drag_scale_landscape_window_on_portrait_display() {
        let window = Size::new(1920.0, 1080.0);
        let center = Vec2::new(540.0, 1200.0);
        let reference = 1080.0 / DEFAULT_POPUP_RATIO;
        let pointer = Vec2::new(540.0, 1200.0 + reference / 2.0);
        let scale = drag_scale_from_pointer(window, PORTRAIT_DISPLAY, center, pointer);
        assert!((scale - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_drag_scale_square_window_on_landscape_display() {
        let display = Size::new(2400.0, 1080.0);
        let window = Size::new(1000.0, 1000.0);
        let center = Vec2::new(1200.0, 540.0);
        let reference = 1080.0 / DEFAULT_POPUP_RATIO;
        let pointer = Vec2::new(1200.0 + reference / 2.0, 540.0);
        let scale = drag_scale_from_pointer(window, display, center, pointer);
        assert!((scale - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_default_popup_bounds_centered() {
        let b = default_popup_bounds(Rect::new(100.0, 200.0, 900.0, 1000.0));
        assert!((b.width - 900.0).abs() < 0.001);
        assert!((b.height - 1600.0).abs() < 0.001);
        assert!((b.center().x - 550.0).abs() < 0.001);
        assert!((b.center().y - 700.0).abs() < 0.001);
    }

    #[test]
    fn test_drag_scale_limits() {
        let (min, max) = drag_scale_limits(1.0, false);
        assert!((min - 0.28).abs() < 0.001);
        assert!((max - 0.96).abs() < 0.001);
        let (min, max) = drag_scale_limits(0.5, true);
        assert!((min - 0.56).abs() < 0.001);
        assert!((max - 1.1).abs() < 0.001);
    }

    #[test]
    fn test_resize_zones() {
        assert_eq!(resize_zone(0.75, false), ResizeZone::None);
        assert_eq!(resize_zone(0.6, false), ResizeZone::ToPinned);
        assert_eq!(resize_zone(0.87, false), ResizeZone::ToFull);
        assert_eq!(resize_zone(0.86, false), ResizeZone::None);
        assert_eq!(resize_zone(0.65, true), ResizeZone::ToPinned);
        assert_eq!(resize_zone(0.95, true), ResizeZone::None);
        assert_eq!(resize_zone(1.01, true), ResizeZone::ToFull);
    }

    #[test]
    fn test_orientation_reversed() {
        assert!(is_orientation_reversed(Orientation::Landscape, false));
        assert!(is_orientation_reversed(Orientation::Portrait, true));
        assert!(!is_orientation_reversed(Orientation::Portrait, false));
        assert!(!is_orientation_reversed(Orientation::Landscape, true));
    }

    fn fling(release_x: f32, vx: f32, vy: f32, window: Rect) -> BoundaryGap {
        boundary_gap_after_fling(
            1080.0,
            Rect::new(0.0, 0.0, 1080.0, 2400.0),
            window,
            Vec2::new(release_x, 1200.0),
            Vec2::new(vx, vy),
        )
    }

    #[test]
    fn test_fling_slow_uses_position() {
        let window = Rect::new(300.0, 1000.0, 300.0, 500.0);
        let gap = fling(200.0, 0.0, 0.0, window);
        assert!(gap.left > 0.0 && gap.right == 0.0);
        let gap = fling(900.0, 0.0, 0.0, window);
        assert!(gap.right > 0.0 && gap.left == 0.0);
        assert!(gap.top == 0.0 && gap.bottom == 0.0);
    }

    #[test]
    fn test_fling_threshold_boundary() {
        let window = Rect::new(300.0, 1000.0, 300.0, 500.0);
        // Just above threshold: direction decides
        let gap = fling(200.0, 3000.01, 0.0, window);
        assert!(gap.right > 0.0);
        // Just below threshold: position decides
        let gap = fling(200.0, 2999.99, 0.0, window);
        assert!(gap.left > 0.0);
        let gap = fling(900.0, -3000.01, 0.0, window);
        assert!(gap.left > 0.0);
        let gap = fling(900.0, -2999.99, 0.0, window);
        assert!(gap.right > 0.0);
    }

    #[test]
    fn test_fling_vertical() {
        let window = Rect::new(300.0, 1000.0, 300.0, 500.0);
        let gap = fling(200.0, 0.0, -4000.0, window);
        assert!(gap.top > 0.0 && gap.bottom == 0.0);
        let gap = fling(200.0, 0.0, 4000.0, window);
        assert!(gap.bottom > 0.0 && gap.top == 0.0);
        // Slow release touching the top band
        let gap = fling(200.0, 0.0, 0.0, Rect::new(44.0, 20.0, 300.0, 500.0));
        assert!(gap.top > 0.0);
    }

    #[test]
    fn test_default_popup_bounds_portrait() {
        let b = default_popup_bounds(Rect::new(0.0, 0.0, 1080.0, 2400.0));
        assert!((b.width - 1080.0).abs() < 0.001);
        assert!((b.height - 1920.0).abs() < 0.001);
        assert!((b.center().y - 1200.0).abs() < 0.001);
    }

    #[test]
    fn test_default_popup_bounds_already_default() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert_eq!(default_popup_bounds(r), r);
    }

    #[test]
    fn test_correct_handle_pointer() {
        let p = correct_handle_pointer(
            Vec2::new(500.0, 1800.0),
            Vec2::new(520.0, 1790.0),
            Vec2::new(540.0, 1800.0),
            Size::new(120.0, 12.0),
            false,
        );
        assert!((p.x - 500.0).abs() < 0.001);
        assert!((p.y - (1800.0 - 6.0 + 10.0)).abs() < 0.001);
    }
}
