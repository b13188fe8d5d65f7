//! Host abstraction layer for the floating window engine
//!
//! This crate defines the [`Host`] trait that lets the engine drive any
//! window system: it reads display metrics, mutates window containers,
//! writes compositor transactions and triggers user feedback.
//!
//! # Host Implementations
//!
//! - **Window server**: task containers, surface transactions, vibrator and audio services
//! - **Mock**: in-memory recording host used by the engine's tests

#![no_std]

extern crate alloc;

use alloc::string::String;

/// Identifier of a window container and of the surface it owns
pub type SurfaceId = u64;

/// Host abstraction trait
///
/// Implementations provide platform-specific functionality for:
/// - Display metrics (bounds, insets, rotation)
/// - Window containers (bounds, stacking, always-on-top)
/// - Compositor transactions (per-surface staging and atomic apply)
/// - Mode-change transitions
/// - Feedback (haptics, per-app audio mute)
///
/// All methods are called while the engine holds its own locks, so
/// implementations must not call back into the engine synchronously.
pub trait Host: Send + Sync + 'static {
    // === Display ===

    /// Full bounds of the display hosting floating windows
    fn display_bounds(&self) -> Bounds;

    /// Insets occupied by system bars and cutouts
    fn system_insets(&self) -> EdgeInsets;

    /// Current display rotation
    fn rotation(&self) -> Rotation;

    /// Display bounds minus system insets
    ///
    /// Floating windows are kept inside this rectangle.
    fn stable_bounds(&self) -> Bounds {
        self.display_bounds().inset(&self.system_insets())
    }

    /// Largest fling velocity the platform reports, in pixels per second
    fn max_fling_velocity(&self) -> f32 {
        8000.0
    }

    // === Window Containers ===

    /// Get the requested bounds of a window container
    ///
    /// # Returns
    /// * `Ok(Bounds)` - Current container bounds (empty means "inherit")
    /// * `Err(HalError::ContainerNotFound)` - The container is gone
    fn window_bounds(&self, id: SurfaceId) -> Result<Bounds, HalError>;

    /// Package name of the application owning the container
    fn window_package(&self, id: SurfaceId) -> Result<String, HalError>;

    /// Set the requested bounds of a window container
    ///
    /// # Arguments
    /// * `id` - Container to update
    /// * `bounds` - New bounds, or `None` to inherit the display bounds
    fn set_window_bounds(&self, id: SurfaceId, bounds: Option<Bounds>) -> Result<(), HalError>;

    /// Keep a container above all regular windows
    fn set_always_on_top(&self, id: SurfaceId, on_top: bool) -> Result<(), HalError>;

    /// Move a container to the back of the window stack
    fn move_to_back(&self, id: SurfaceId) -> Result<(), HalError>;

    /// Ask the window system to recompute the focused window
    fn update_focused_window(&self);

    // === Compositor ===

    /// Check whether a surface can still receive writes
    fn is_surface_valid(&self, id: SurfaceId) -> bool;

    /// Stage a surface update in the pending transaction
    ///
    /// Staged updates become visible atomically on the next [`Host::apply`].
    fn stage(&self, id: SurfaceId, update: &SurfaceUpdate) -> Result<(), HalError>;

    /// Apply the pending transaction
    fn apply(&self);

    // === Transitions ===

    /// Run a mode-change transition between two surface geometries
    ///
    /// The host reports completion back to the engine once the transition
    /// has been committed.
    fn play_transition(
        &self,
        id: SurfaceId,
        from: &SurfaceGeometry,
        to: &SurfaceGeometry,
    ) -> Result<(), HalError>;

    // === Feedback ===

    /// Emit a short haptic tick
    fn vibrate(&self);

    /// Mute or unmute all audio of an application
    ///
    /// # Returns
    /// * `Ok(())` - The audio service accepted the request
    /// * `Err(HalError::Rejected)` - The audio service refused it
    fn set_app_muted(&self, package: &str, muted: bool) -> Result<(), HalError>;
}

/// Source of user settings
///
/// Values are read by key; a missing key means "use the default".
pub trait SettingsSource: Send + Sync + 'static {
    /// Read an integer setting
    fn get_int(&self, key: &str) -> Option<i32>;

    /// Read a string setting
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Integer rectangle in display coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// Empty bounds
    pub const EMPTY: Bounds = Bounds {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Create bounds from edges
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Check if the bounds enclose no area
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Shrink each edge by the matching inset
    #[inline]
    pub const fn inset(&self, insets: &EdgeInsets) -> Bounds {
        Bounds::new(
            self.left + insets.left,
            self.top + insets.top,
            self.right - insets.right,
            self.bottom - insets.bottom,
        )
    }
}

/// Per-edge insets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeInsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl EdgeInsets {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Display rotation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Rot0,
    Rot90,
    Rot180,
    Rot270,
}

impl Rotation {
    /// Check if the rotation turns the natural orientation sideways
    #[inline]
    pub const fn is_landscape(self) -> bool {
        matches!(self, Rotation::Rot90 | Rotation::Rot270)
    }
}

/// A set of surface properties to stage in one transaction
///
/// Unset fields leave the current value untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceUpdate {
    /// Top-left position in display pixels
    pub position: Option<(f32, f32)>,
    /// Crop size in unscaled surface pixels
    pub crop: Option<(f32, f32)>,
    /// Uniform scale applied to the cropped surface
    pub scale: Option<f32>,
    pub corner_radius: Option<f32>,
    pub alpha: Option<f32>,
    pub visible: Option<bool>,
}

impl SurfaceUpdate {
    /// Create an update that changes nothing
    #[inline]
    pub const fn new() -> Self {
        Self {
            position: None,
            crop: None,
            scale: None,
            corner_radius: None,
            alpha: None,
            visible: None,
        }
    }

    #[inline]
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    #[inline]
    pub fn crop(mut self, width: f32, height: f32) -> Self {
        self.crop = Some((width, height));
        self
    }

    #[inline]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    #[inline]
    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    #[inline]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    #[inline]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Overlay the fields set in `other` onto this update
    pub fn merge(&mut self, other: &SurfaceUpdate) {
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.crop.is_some() {
            self.crop = other.crop;
        }
        if other.scale.is_some() {
            self.scale = other.scale;
        }
        if other.corner_radius.is_some() {
            self.corner_radius = other.corner_radius;
        }
        if other.alpha.is_some() {
            self.alpha = other.alpha;
        }
        if other.visible.is_some() {
            self.visible = other.visible;
        }
    }
}

/// Complete on-screen geometry of a surface, used for transitions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceGeometry {
    pub x: f32,
    pub y: f32,
    pub crop_width: f32,
    pub crop_height: f32,
    pub scale: f32,
    pub corner_radius: f32,
}

/// Host operation errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalError {
    /// The window container no longer exists
    ContainerNotFound,
    /// The surface was destroyed or detached
    SurfaceInvalid,
    /// Operation not supported on this host
    NotSupported,
    /// The host service refused the request
    Rejected,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::ContainerNotFound => write!(f, "window container not found"),
            HalError::SurfaceInvalid => write!(f, "surface is no longer valid"),
            HalError::NotSupported => write!(f, "operation not supported"),
            HalError::Rejected => write!(f, "request rejected by host"),
        }
    }
}
