//! Slot tracker implementation

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use crate::window::WindowId;
use super::observer::FocusObserver;

/// A window occupying a slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    pub window: WindowId,
    pub package: String,
}

impl SlotEntry {
    pub fn new(window: WindowId, package: &str) -> Self {
        Self {
            window,
            package: package.to_string(),
        }
    }
}

/// The collection a window sits in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    TopFullscreen,
    Mini,
    Pinned,
}

/// What to clear
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotClear {
    /// The newest mini window
    TopMini,
    /// The pinned window
    Pinned,
    /// A window wherever it sits
    Window(WindowId),
    /// Every slot
    All,
}

/// Slot contents
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SlotState {
    pub top_fullscreen: Option<SlotEntry>,
    pub top_pinned: Option<SlotEntry>,
    /// Oldest first; the last entry is the visible mini window
    pub mini_stack: Vec<SlotEntry>,
}

impl SlotState {
    /// Remove a window from every collection
    fn evict(&mut self, window: WindowId) {
        if self.top_fullscreen.as_ref().is_some_and(|e| e.window == window) {
            self.top_fullscreen = None;
        }
        if self.top_pinned.as_ref().is_some_and(|e| e.window == window) {
            self.top_pinned = None;
        }
        self.mini_stack.retain(|e| e.window != window);
    }

    /// Which collection holds a window
    pub fn slot_of(&self, window: WindowId) -> Option<SlotKind> {
        if self.top_pinned.as_ref().is_some_and(|e| e.window == window) {
            Some(SlotKind::Pinned)
        } else if self.mini_stack.iter().any(|e| e.window == window) {
            Some(SlotKind::Mini)
        } else if self.top_fullscreen.as_ref().is_some_and(|e| e.window == window) {
            Some(SlotKind::TopFullscreen)
        } else {
            None
        }
    }

    /// Count how many collections hold a window
    pub fn occurrences(&self, window: WindowId) -> usize {
        let fullscreen = self.top_fullscreen.iter().filter(|e| e.window == window).count();
        let pinned = self.top_pinned.iter().filter(|e| e.window == window).count();
        let mini = self.mini_stack.iter().filter(|e| e.window == window).count();
        fullscreen + pinned + mini
    }
}

struct Observer {
    observer: Arc<dyn FocusObserver>,
}

/// Thread-safe slot tracker
///
/// Guarded by its own lock so focus queries never wait on a mode change.
pub struct SlotTracker {
    state: RwLock<SlotState>,
    observers: Mutex<Vec<Observer>>,
}

impl Default for SlotTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTracker {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState::default()),
            observers: Mutex::new(Vec::new()),
        }
    }

    // === Mutations ===

    /// Record that a fullscreen window gained focus
    pub fn record_focus_changed(&self, entry: SlotEntry) {
        let previous = {
            let mut state = self.state.write();
            let previous = state.top_fullscreen.take();
            state.evict(entry.window);
            state.top_fullscreen = Some(entry.clone());
            previous
        };
        let package_changed = previous.as_ref().map(|p| p.package != entry.package).unwrap_or(true);
        let window_changed = previous.as_ref().map(|p| p.window != entry.window).unwrap_or(true);
        if package_changed || window_changed {
            self.notify(&entry, package_changed);
        }
    }

    /// Push a window on top of the mini stack
    pub fn push_mini(&self, entry: SlotEntry) {
        let mut state = self.state.write();
        state.evict(entry.window);
        debug!(window = entry.window, "mini slot taken");
        state.mini_stack.push(entry);
    }

    /// Remove one window from the mini stack
    pub fn remove_mini(&self, window: WindowId) -> bool {
        let mut state = self.state.write();
        let before = state.mini_stack.len();
        state.mini_stack.retain(|e| e.window != window);
        before != state.mini_stack.len()
    }

    /// Move a mini window into the pinned slot
    ///
    /// # Returns
    /// The previous pinned occupant, if it was a different window
    pub fn move_mini_to_pinned(&self, window: WindowId) -> Option<SlotEntry> {
        let mut state = self.state.write();
        let index = state.mini_stack.iter().position(|e| e.window == window)?;
        let entry = state.mini_stack.remove(index);
        let displaced = state.top_pinned.replace(entry);
        debug!(window, "mini moved to pinned slot");
        displaced.filter(|d| d.window != window)
    }

    /// Move the pinned window on top of the mini stack
    ///
    /// # Returns
    /// The moved window, or `None` if the pinned slot was empty
    pub fn move_pinned_to_mini(&self) -> Option<SlotEntry> {
        let mut state = self.state.write();
        let entry = state.top_pinned.take()?;
        state.evict(entry.window);
        state.mini_stack.push(entry.clone());
        debug!(window = entry.window, "pinned moved to mini slot");
        Some(entry)
    }

    /// Move the pinned window into the top-fullscreen slot
    pub fn move_pinned_to_full(&self) -> Option<SlotEntry> {
        let entry = {
            let mut state = self.state.write();
            let entry = state.top_pinned.take()?;
            state.evict(entry.window);
            state.top_fullscreen = Some(entry.clone());
            entry
        };
        self.notify(&entry, true);
        Some(entry)
    }

    /// Clear slots
    pub fn clear(&self, what: SlotClear) {
        let mut state = self.state.write();
        match what {
            SlotClear::TopMini => {
                state.mini_stack.pop();
            }
            SlotClear::Pinned => state.top_pinned = None,
            SlotClear::Window(window) => state.evict(window),
            SlotClear::All => *state = SlotState::default(),
        }
        debug!(?what, "slots cleared");
    }

    /// Clear the pinned slot only if a given window holds it
    pub fn clear_pinned_if(&self, window: WindowId) -> bool {
        let mut state = self.state.write();
        if state.top_pinned.as_ref().is_some_and(|e| e.window == window) {
            state.top_pinned = None;
            true
        } else {
            false
        }
    }

    // === Queries ===

    /// Check if a package has a mini or pinned window
    pub fn is_package_floating(&self, package: &str) -> bool {
        let state = self.state.read();
        state.top_pinned.as_ref().is_some_and(|e| e.package == package)
            || state.mini_stack.iter().any(|e| e.package == package)
    }

    pub fn top_fullscreen(&self) -> Option<SlotEntry> {
        self.state.read().top_fullscreen.clone()
    }

    pub fn top_fullscreen_id(&self) -> Option<WindowId> {
        self.state.read().top_fullscreen.as_ref().map(|e| e.window)
    }

    pub fn top_fullscreen_package(&self) -> Option<String> {
        self.state.read().top_fullscreen.as_ref().map(|e| e.package.clone())
    }

    /// The visible mini window
    pub fn top_mini(&self) -> Option<SlotEntry> {
        self.state.read().mini_stack.last().cloned()
    }

    pub fn top_pinned(&self) -> Option<SlotEntry> {
        self.state.read().top_pinned.clone()
    }

    pub fn has_mini_window(&self) -> bool {
        !self.state.read().mini_stack.is_empty()
    }

    pub fn has_pinned_window(&self) -> bool {
        self.state.read().top_pinned.is_some()
    }

    pub fn slot_of(&self, window: WindowId) -> Option<SlotKind> {
        self.state.read().slot_of(window)
    }

    /// Copy of the current slot contents
    pub fn snapshot(&self) -> SlotState {
        self.state.read().clone()
    }

    // === Observers ===

    /// Register a focus observer
    pub fn register_observer(&self, observer: Arc<dyn FocusObserver>) {
        self.observers.lock().push(Observer { observer });
    }

    /// Unregister a focus observer
    pub fn unregister_observer(&self, observer: &Arc<dyn FocusObserver>) {
        self.observers
            .lock()
            .retain(|o| !Arc::ptr_eq(&o.observer, observer));
    }

    fn notify(&self, entry: &SlotEntry, package_changed: bool) {
        let targets: Vec<Arc<dyn FocusObserver>> = self
            .observers
            .lock()
            .iter()
            .filter(|o| package_changed || o.observer.observe_windows())
            .map(|o| o.observer.clone())
            .collect();
        for observer in targets {
            observer.on_fullscreen_package_changed(entry.window, &entry.package);
        }
    }
}
