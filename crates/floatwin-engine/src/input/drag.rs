//! Drag session state

use crate::geometry::ResizeZone;
use crate::math::{Size, Vec2};
use crate::window::WindowId;

/// One press-move-release cycle on a floating window
#[derive(Clone, Debug, PartialEq)]
pub enum DragSession {
    /// Moving the window
    Translate {
        window: WindowId,
        /// Pointer position at start
        start_pointer: Vec2,
        /// Window center at start
        start_center: Vec2,
    },
    /// Resizing the window from its edge handle
    Resize {
        window: WindowId,
        start_pointer: Vec2,
        /// Center of the edge handle at start
        handle_center: Vec2,
        handle_size: Size,
        display_landscape: bool,
        /// Window and display orientations are orthogonal
        reversed: bool,
        /// Threshold zone of the last move, for haptics
        zone: ResizeZone,
    },
}

impl DragSession {
    /// Check if this is a move operation
    #[inline]
    pub fn is_translate(&self) -> bool {
        matches!(self, DragSession::Translate { .. })
    }

    /// Check if this is a resize operation
    #[inline]
    pub fn is_resize(&self) -> bool {
        matches!(self, DragSession::Resize { .. })
    }

    pub fn window(&self) -> WindowId {
        match self {
            DragSession::Translate { window, .. } | DragSession::Resize { window, .. } => *window,
        }
    }

    /// Threshold zone reached so far (always `None` when translating)
    pub fn zone(&self) -> ResizeZone {
        match self {
            DragSession::Resize { zone, .. } => *zone,
            DragSession::Translate { .. } => ResizeZone::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_session() {
        let session = DragSession::Translate {
            window: 42,
            start_pointer: Vec2::new(10.0, 20.0),
            start_center: Vec2::new(100.0, 200.0),
        };
        assert!(session.is_translate());
        assert!(!session.is_resize());
        assert_eq!(session.window(), 42);
        assert_eq!(session.zone(), ResizeZone::None);
    }

    #[test]
    fn test_resize_session() {
        let session = DragSession::Resize {
            window: 7,
            start_pointer: Vec2::new(540.0, 1900.0),
            handle_center: Vec2::new(540.0, 1906.0),
            handle_size: Size::new(120.0, 12.0),
            display_landscape: false,
            reversed: false,
            zone: ResizeZone::ToPinned,
        };
        assert!(session.is_resize());
        assert_eq!(session.window(), 7);
        assert_eq!(session.zone(), ResizeZone::ToPinned);
    }
}
