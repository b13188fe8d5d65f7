//! Mock host implementation for testing the floating window engine
//!
//! This provides an in-memory implementation of the [`Host`] and
//! [`SettingsSource`] traits. Every call is recorded in a log so tests can
//! assert on the exact sequence of container and compositor operations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use floatwin_hal::{
    Bounds, EdgeInsets, HalError, Host, Rotation, SettingsSource, SurfaceGeometry, SurfaceId,
    SurfaceUpdate,
};
use parking_lot::Mutex;

/// Simulated window container
#[derive(Clone, Debug, PartialEq)]
pub struct MockWindow {
    pub package: String,
    /// Requested bounds (`None` means inherit the display)
    pub bounds: Option<Bounds>,
    pub always_on_top: bool,
    pub surface_valid: bool,
    /// Number of times the container was moved to the back
    pub moved_to_back: u32,
    /// Latest surface state, merged from every applied update
    pub surface: SurfaceUpdate,
}

/// Simulated display
#[derive(Clone, Copy, Debug)]
struct MockDisplay {
    bounds: Bounds,
    insets: EdgeInsets,
    rotation: Rotation,
}

/// Mock host for unit testing
///
/// Provides simulated display metrics, window containers, a compositor with
/// pending/applied transactions, haptics and audio mute.
pub struct MockHost {
    display: Mutex<MockDisplay>,
    windows: Mutex<BTreeMap<SurfaceId, MockWindow>>,
    /// Updates staged since the last apply
    pending: Mutex<Vec<(SurfaceId, SurfaceUpdate)>>,
    /// Transitions requested by the engine
    transitions: Mutex<Vec<(SurfaceId, SurfaceGeometry, SurfaceGeometry)>>,
    /// Package -> muted
    muted: Mutex<BTreeMap<String, bool>>,
    reject_mute: Mutex<bool>,
    apply_count: AtomicU64,
    vibrations: AtomicU64,
    focus_updates: AtomicU64,
    debug_log: Mutex<Vec<String>>,
}

impl MockHost {
    /// Create a mock host with a portrait display of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            display: Mutex::new(MockDisplay {
                bounds: Bounds::new(0, 0, width, height),
                insets: EdgeInsets::default(),
                rotation: Rotation::Rot0,
            }),
            windows: Mutex::new(BTreeMap::new()),
            pending: Mutex::new(Vec::new()),
            transitions: Mutex::new(Vec::new()),
            muted: Mutex::new(BTreeMap::new()),
            reject_mute: Mutex::new(false),
            apply_count: AtomicU64::new(0),
            vibrations: AtomicU64::new(0),
            focus_updates: AtomicU64::new(0),
            debug_log: Mutex::new(Vec::new()),
        }
    }

    /// Add a fullscreen window container
    pub fn add_window(&self, id: SurfaceId, package: &str) {
        self.windows.lock().insert(
            id,
            MockWindow {
                package: package.to_string(),
                bounds: None,
                always_on_top: false,
                surface_valid: true,
                moved_to_back: 0,
                surface: SurfaceUpdate::new(),
            },
        );
        self.log(format!("add_window {} {}", id, package));
    }

    /// Remove a window container entirely
    pub fn remove_window(&self, id: SurfaceId) {
        self.windows.lock().remove(&id);
        self.log(format!("remove_window {}", id));
    }

    /// Get a copy of a window container
    pub fn window(&self, id: SurfaceId) -> Option<MockWindow> {
        self.windows.lock().get(&id).cloned()
    }

    /// Mark a surface as destroyed without removing its container
    pub fn invalidate_surface(&self, id: SurfaceId) {
        if let Some(window) = self.windows.lock().get_mut(&id) {
            window.surface_valid = false;
        }
    }

    /// Rotate the display, swapping its dimensions when the orientation flips
    pub fn set_rotation(&self, rotation: Rotation) {
        let mut display = self.display.lock();
        if display.rotation.is_landscape() != rotation.is_landscape() {
            let b = display.bounds;
            display.bounds = Bounds::new(b.left, b.top, b.left + b.height(), b.top + b.width());
        }
        display.rotation = rotation;
    }

    /// Set the system insets
    pub fn set_insets(&self, insets: EdgeInsets) {
        self.display.lock().insets = insets;
    }

    /// Make the audio service refuse mute requests
    pub fn set_reject_mute(&self, reject: bool) {
        *self.reject_mute.lock() = reject;
    }

    /// Check the mute state of a package
    pub fn is_muted(&self, package: &str) -> bool {
        self.muted.lock().get(package).copied().unwrap_or(false)
    }

    /// Number of applied transactions
    pub fn apply_count(&self) -> u64 {
        self.apply_count.load(Ordering::SeqCst)
    }

    /// Number of haptic ticks
    pub fn vibration_count(&self) -> u64 {
        self.vibrations.load(Ordering::SeqCst)
    }

    /// Number of focus recomputations requested
    pub fn focus_update_count(&self) -> u64 {
        self.focus_updates.load(Ordering::SeqCst)
    }

    /// Number of staged updates not yet applied
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Transitions requested so far
    pub fn transitions(&self) -> Vec<(SurfaceId, SurfaceGeometry, SurfaceGeometry)> {
        self.transitions.lock().clone()
    }

    /// Get all captured log lines
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.lock().clone()
    }

    /// Clear the log
    pub fn clear_debug_log(&self) {
        self.debug_log.lock().clear();
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log.lock().iter().any(|msg| msg.contains(substr))
    }

    /// Count log lines containing a substring
    pub fn count_log_containing(&self, substr: &str) -> usize {
        self.debug_log
            .lock()
            .iter()
            .filter(|msg| msg.contains(substr))
            .count()
    }

    fn log(&self, msg: String) {
        self.debug_log.lock().push(format!("[mock-host] {}", msg));
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(1080, 2400)
    }
}

impl Host for MockHost {
    fn display_bounds(&self) -> Bounds {
        self.display.lock().bounds
    }

    fn system_insets(&self) -> EdgeInsets {
        self.display.lock().insets
    }

    fn rotation(&self) -> Rotation {
        self.display.lock().rotation
    }

    fn window_bounds(&self, id: SurfaceId) -> Result<Bounds, HalError> {
        let display = self.display_bounds();
        self.windows
            .lock()
            .get(&id)
            .map(|w| w.bounds.unwrap_or(display))
            .ok_or(HalError::ContainerNotFound)
    }

    fn window_package(&self, id: SurfaceId) -> Result<String, HalError> {
        self.windows
            .lock()
            .get(&id)
            .map(|w| w.package.clone())
            .ok_or(HalError::ContainerNotFound)
    }

    fn set_window_bounds(&self, id: SurfaceId, bounds: Option<Bounds>) -> Result<(), HalError> {
        let mut windows = self.windows.lock();
        let window = windows.get_mut(&id).ok_or(HalError::ContainerNotFound)?;
        window.bounds = bounds;
        drop(windows);
        self.log(format!("set_window_bounds {} {:?}", id, bounds));
        Ok(())
    }

    fn set_always_on_top(&self, id: SurfaceId, on_top: bool) -> Result<(), HalError> {
        let mut windows = self.windows.lock();
        let window = windows.get_mut(&id).ok_or(HalError::ContainerNotFound)?;
        window.always_on_top = on_top;
        drop(windows);
        self.log(format!("set_always_on_top {} {}", id, on_top));
        Ok(())
    }

    fn move_to_back(&self, id: SurfaceId) -> Result<(), HalError> {
        let mut windows = self.windows.lock();
        let window = windows.get_mut(&id).ok_or(HalError::ContainerNotFound)?;
        window.moved_to_back += 1;
        drop(windows);
        self.log(format!("move_to_back {}", id));
        Ok(())
    }

    fn update_focused_window(&self) {
        self.focus_updates.fetch_add(1, Ordering::SeqCst);
    }

    fn is_surface_valid(&self, id: SurfaceId) -> bool {
        self.windows
            .lock()
            .get(&id)
            .map(|w| w.surface_valid)
            .unwrap_or(false)
    }

    fn stage(&self, id: SurfaceId, update: &SurfaceUpdate) -> Result<(), HalError> {
        if !self.is_surface_valid(id) {
            self.log(format!("stage rejected {}", id));
            return Err(HalError::SurfaceInvalid);
        }
        self.pending.lock().push((id, *update));
        Ok(())
    }

    fn apply(&self) {
        let pending: Vec<_> = self.pending.lock().drain(..).collect();
        let mut windows = self.windows.lock();
        for (id, update) in &pending {
            if let Some(window) = windows.get_mut(id) {
                window.surface.merge(update);
            }
        }
        drop(windows);
        self.apply_count.fetch_add(1, Ordering::SeqCst);
        self.log(format!("apply {} updates", pending.len()));
    }

    fn play_transition(
        &self,
        id: SurfaceId,
        from: &SurfaceGeometry,
        to: &SurfaceGeometry,
    ) -> Result<(), HalError> {
        if !self.windows.lock().contains_key(&id) {
            return Err(HalError::ContainerNotFound);
        }
        self.transitions.lock().push((id, *from, *to));
        self.log(format!("play_transition {}", id));
        Ok(())
    }

    fn vibrate(&self) {
        self.vibrations.fetch_add(1, Ordering::SeqCst);
    }

    fn set_app_muted(&self, package: &str, muted: bool) -> Result<(), HalError> {
        if *self.reject_mute.lock() {
            return Err(HalError::Rejected);
        }
        self.muted.lock().insert(package.to_string(), muted);
        self.log(format!("set_app_muted {} {}", package, muted));
        Ok(())
    }
}

/// In-memory settings store
#[derive(Default)]
pub struct MockSettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MockSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw setting value
    pub fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    /// Remove a setting, reverting it to its default
    pub fn remove(&self, key: &str) {
        self.values.lock().remove(key);
    }
}

impl SettingsSource for MockSettings {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.lock().get(key).and_then(|v| v.trim().parse().ok())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}
