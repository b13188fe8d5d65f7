//! Overlay chrome around floating windows
//!
//! Overlays only read window geometry; every mode change they ask for is
//! returned as an action and carried out by the controller.

mod edge_bar;
mod dimmer;
mod pinned;

pub use edge_bar::EdgeBar;
pub use dimmer::{DimBackdrop, DimmerAction, DIM_FADE_DELAY_MS, DIM_FADE_DURATION_MS};
pub use pinned::{OverlayAction, OverlayResponse, PinnedOverlay};
