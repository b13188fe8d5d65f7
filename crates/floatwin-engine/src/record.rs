//! Per-window floating state
//!
//! A [`WindowStateRecord`] lives for as long as its window and is reused
//! across every mode change. Geometry is stored in logical form (center,
//! scale, snapped edges, vertical ratio) and mapped to an on-screen surface
//! through [`crate::geometry`].

use floatwin_hal::SurfaceGeometry;
use serde::Serialize;

use crate::animation::{AnimationEngine, SharedAnimation, SurfaceFrame};
use crate::config::EngineConfig;
use crate::geometry::{self, ScreenPlacement};
use crate::math::{BoundaryGap, Rect, Size, Vec2};
use crate::window::{ExitReason, FloatState, Orientation, WindowId, WindowMode};

/// Vertical position remembered per display orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct VerticalRatio {
    pub portrait: f32,
    pub landscape: f32,
}

/// Geometry captured when a mode change starts
///
/// Immutable once taken; the live record keeps changing underneath it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FreezeSnapshot {
    pub mode: WindowMode,
    pub center: Vec2,
    pub scale: f32,
    pub scale_factor: f32,
    pub corner_radius: f32,
    /// On-screen rectangle at freeze time
    pub rect: Rect,
    /// Unscaled container size at freeze time
    pub crop: Size,
}

impl FreezeSnapshot {
    /// Geometry handed to the host transition
    pub fn surface_geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            x: self.rect.x,
            y: self.rect.y,
            crop_width: self.crop.width,
            crop_height: self.crop.height,
            scale: self.scale * self.scale_factor,
            corner_radius: self.corner_radius,
        }
    }
}

/// Floating state of one window
#[derive(Clone, Debug)]
pub struct WindowStateRecord {
    pub id: WindowId,
    pub package: String,
    pub mode: WindowMode,
    /// Container bounds as last requested from the host
    pub bounds: Rect,
    pub center: Vec2,
    pub scale: f32,
    pub scale_factor: f32,
    pub boundary_gap: BoundaryGap,
    pub corner_radius: f32,
    pub vertical_ratio: VerticalRatio,
    pub muted: bool,
    /// Tier used the next time the window is pinned
    pub pinned_small: bool,
    /// Set while the window plays its exit or waits for the exit delay
    pub exiting: Option<ExitReason>,
    pub freeze: Option<FreezeSnapshot>,
    /// Last resting frame pushed to the compositor
    pub(crate) last_staged: Option<SurfaceFrame>,
    animation: SharedAnimation,
}

impl WindowStateRecord {
    /// Create a record for a window that just became eligible for floating
    pub fn new(id: WindowId, package: &str, bounds: Rect, config: &EngineConfig) -> Self {
        let orientation = Orientation::of(bounds.size());
        Self {
            id,
            package: package.to_string(),
            mode: WindowMode::Undefined,
            bounds,
            center: bounds.center(),
            scale: geometry::default_pinned_scale(orientation, true),
            scale_factor: 1.0,
            boundary_gap: BoundaryGap::ORIGIN,
            corner_radius: config.pinned_corner_radius,
            vertical_ratio: VerticalRatio::default(),
            muted: false,
            pinned_small: true,
            exiting: None,
            freeze: None,
            last_staged: None,
            animation: AnimationEngine::shared(id),
        }
    }

    /// Handle to this window's animation engine
    pub fn animation(&self) -> &SharedAnimation {
        &self.animation
    }

    /// Check if an animation is in flight
    pub fn is_animating(&self) -> bool {
        self.animation.lock().is_animating()
    }

    /// Observable lifecycle state
    pub fn state(&self) -> FloatState {
        if self.exiting.is_some() {
            return FloatState::Exiting;
        }
        match self.mode {
            WindowMode::Mini => FloatState::Mini,
            WindowMode::Pinned => FloatState::Pinned,
            WindowMode::Fullscreen | WindowMode::Undefined => FloatState::Fullscreen,
        }
    }

    /// Orientation of the container
    #[inline]
    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.bounds.size())
    }

    /// Scale including the shrink-to-fit factor
    #[inline]
    pub fn real_scale(&self) -> f32 {
        self.scale * self.scale_factor
    }

    /// Set the scale, tracking the pinned tier when it matches a preset
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        if let Some(small) = geometry::is_small_pinned_scale(self.orientation(), scale) {
            self.pinned_small = small;
        }
    }

    /// Set a transient scale while drag-resizing
    #[inline]
    pub fn set_drag_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    /// Mini windows keep their aspect; pinned windows shrink to fit
    #[inline]
    pub fn preserves_aspect(&self) -> bool {
        self.mode != WindowMode::Pinned
    }

    /// On-screen placement for the current state
    pub fn placement(&self, display: Size) -> ScreenPlacement {
        self.placement_with(display, self.center, self.scale)
    }

    /// On-screen placement for an alternative center and scale
    pub fn placement_with(&self, display: Size, center: Vec2, scale: f32) -> ScreenPlacement {
        geometry::compute_on_screen_rect(
            self.bounds.size(),
            display,
            center,
            scale,
            self.preserves_aspect(),
        )
    }

    /// Recompute the shrink-to-fit factor for the display
    pub fn refresh_scale_factor(&mut self, display: Size) -> ScreenPlacement {
        let placement = self.placement(display);
        self.scale_factor = placement.scale_factor;
        placement
    }

    /// Container size after the shrink-to-fit factor
    #[inline]
    pub fn fitted_size(&self) -> Size {
        self.bounds.size().scale(self.scale_factor)
    }

    /// Surface frame for an alternative center and scale
    pub fn frame_with(&self, display: Size, center: Vec2, scale: f32) -> SurfaceFrame {
        let placement = self.placement_with(display, center, scale);
        SurfaceFrame {
            position: placement.rect.position(),
            crop: self.bounds.size(),
            scale: placement.surface_scale(scale),
            corner_radius: self.corner_radius,
            alpha: 1.0,
        }
    }

    /// Resting surface frame
    pub fn resting_frame(&self, display: Size) -> SurfaceFrame {
        self.frame_with(display, self.center, self.scale)
    }

    /// Record the vertical position as a fraction of the display height
    ///
    /// While dragging, the ratio is stored for both orientations; otherwise
    /// only for the current one.
    pub fn set_vertical_ratio(&mut self, center: Vec2, display: Rect, is_drag: bool) {
        if display.height <= 0.0 {
            return;
        }
        let ratio = center.y / display.height;
        if is_drag {
            self.vertical_ratio.portrait = ratio;
            self.vertical_ratio.landscape = ratio;
        } else if display.height > display.width {
            self.vertical_ratio.portrait = ratio;
        } else {
            self.vertical_ratio.landscape = ratio;
        }
    }

    /// Vertical ratio for the display's orientation
    pub fn vertical_ratio_for(&self, display: Rect) -> f32 {
        if display.height > display.width {
            self.vertical_ratio.portrait
        } else {
            self.vertical_ratio.landscape
        }
    }

    /// Center that honours the snapped edges
    pub fn center_from_gap(&self, display: Rect) -> Vec2 {
        geometry::recompute_center_from_gap(
            self.fitted_size(),
            display,
            &self.boundary_gap,
            self.vertical_ratio_for(display),
            self.center,
            self.scale,
        )
    }

    /// Snapshot the current geometry
    pub fn snapshot(&self, display: Size) -> FreezeSnapshot {
        let placement = self.placement(display);
        FreezeSnapshot {
            mode: self.mode,
            center: self.center,
            scale: self.scale,
            scale_factor: placement.scale_factor,
            corner_radius: self.corner_radius,
            rect: placement.rect,
            crop: self.bounds.size(),
        }
    }

    /// Take the freeze snapshot at the start of a mode change
    pub fn freeze(&mut self, display: Size) -> FreezeSnapshot {
        let snapshot = self.snapshot(display);
        self.freeze = Some(snapshot);
        snapshot
    }

    /// Drop the freeze snapshot
    pub fn thaw(&mut self) -> Option<FreezeSnapshot> {
        self.freeze.take()
    }
}
