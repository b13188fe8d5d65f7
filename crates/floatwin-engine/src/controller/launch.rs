//! Launch routing for new activities

use floatwin_hal::Host;
use serde::Serialize;
use tracing::debug;

use crate::window::{ExitReason, WindowId, WindowMode};
use super::FloatingController;

/// An activity launch the host asks about
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LaunchRequest {
    /// Package being launched
    pub package: String,
    /// Windowing mode the launch asked for
    pub requested_mode: WindowMode,
    /// The launch comes from a notification jump
    pub from_notification: bool,
    /// Window the launch was started from
    pub caller: Option<WindowId>,
}

impl LaunchRequest {
    pub fn new(package: &str, requested_mode: WindowMode) -> Self {
        Self {
            package: package.to_string(),
            requested_mode,
            from_notification: false,
            caller: None,
        }
    }

    pub fn from_notification(mut self) -> Self {
        self.from_notification = true;
        self
    }

    pub fn with_caller(mut self, caller: WindowId) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// Windowing mode a launch ends up with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "mode", rename_all = "snake_case")]
pub enum LaunchDecision {
    AsRequested(WindowMode),
    Override(WindowMode),
}

impl LaunchDecision {
    #[inline]
    pub fn mode(self) -> WindowMode {
        match self {
            LaunchDecision::AsRequested(mode) | LaunchDecision::Override(mode) => mode,
        }
    }
}

impl<H: Host> FloatingController<H> {
    /// Decide the windowing mode of a launch
    pub fn route_launch(&self, request: &LaunchRequest) -> LaunchDecision {
        let package = request.package.as_str();
        let requested = request.requested_mode;

        if request.from_notification && requested == WindowMode::Mini {
            if self.slots.top_mini().is_some_and(|e| e.package == package) {
                return LaunchDecision::AsRequested(WindowMode::Mini);
            }
            let in_front = self.slots.top_fullscreen_package().as_deref() == Some(package)
                || self.slots.top_pinned().is_some_and(|e| e.package == package);
            if in_front {
                debug!(package, "notification target already visible, inheriting mode");
                return LaunchDecision::Override(WindowMode::Undefined);
            }
            if self.settings.in_notification_denylist(package) {
                debug!(package, "notification target denylisted");
                return LaunchDecision::Override(WindowMode::Fullscreen);
            }
            return LaunchDecision::AsRequested(WindowMode::Mini);
        }

        if let (Some(caller), Some(top)) = (request.caller, self.slots.top_mini()) {
            if top.window == caller && top.package != package && !requested.is_floating() {
                debug!(package, caller, "launch from mini window stays in mini");
                return LaunchDecision::Override(WindowMode::Mini);
            }
        }
        LaunchDecision::AsRequested(requested)
    }

    /// Adjust a window about to be relaunched
    ///
    /// A pinned window relaunched without a floating mode leaves the pinned
    /// slot.
    ///
    /// # Returns
    /// Whether the window was asked to exit
    pub fn prepare_launch(&mut self, id: WindowId, requested: WindowMode, now_ms: f64) -> bool {
        let pinned = self
            .records
            .get(&id)
            .is_some_and(|r| r.mode == WindowMode::Pinned && r.exiting.is_none());
        if !pinned || requested.is_floating() {
            return false;
        }
        self.exit(id, ExitReason::NonUser, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::tests::controller;
    use crate::settings::KEY_NOTIFICATION_DENYLIST;
    use crate::window::FloatState;
    use floatwin_hal_mock::MockSettings;

    fn notification(package: &str) -> LaunchRequest {
        LaunchRequest::new(package, WindowMode::Mini).from_notification()
    }

    #[test]
    fn test_notification_to_top_mini_keeps_mini() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        let decision = c.route_launch(&notification("com.example.video"));
        assert_eq!(decision, LaunchDecision::AsRequested(WindowMode::Mini));
    }

    #[test]
    fn test_notification_to_visible_app_inherits() {
        let (_, mut c, _) = controller();
        c.on_app_focus_changed(2);
        let decision = c.route_launch(&notification("com.example.chat"));
        assert_eq!(decision.mode(), WindowMode::Undefined);

        c.enter_mini(1, 0.0);
        c.enter_pinned(1, 10.0);
        let decision = c.route_launch(&notification("com.example.video"));
        assert_eq!(decision, LaunchDecision::Override(WindowMode::Undefined));
    }

    #[test]
    fn test_notification_denylist() {
        let (_, mut c, _) = controller();
        assert_eq!(
            c.route_launch(&notification("com.android.chrome")).mode(),
            WindowMode::Fullscreen
        );

        let settings = MockSettings::new();
        settings.set(KEY_NOTIFICATION_DENYLIST, "com.example.mail;com.example.bank");
        c.on_setting_changed(&settings, KEY_NOTIFICATION_DENYLIST);
        assert_eq!(
            c.route_launch(&notification("com.example.bank")).mode(),
            WindowMode::Fullscreen
        );
        assert_eq!(
            c.route_launch(&notification("com.example.maps")).mode(),
            WindowMode::Mini
        );
    }

    #[test]
    fn test_launch_from_mini_stays_mini() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        let request = LaunchRequest::new("com.example.browser", WindowMode::Undefined).with_caller(1);
        assert_eq!(c.route_launch(&request), LaunchDecision::Override(WindowMode::Mini));

        let same_package = LaunchRequest::new("com.example.video", WindowMode::Undefined).with_caller(1);
        assert_eq!(
            c.route_launch(&same_package),
            LaunchDecision::AsRequested(WindowMode::Undefined)
        );

        let other_caller = LaunchRequest::new("com.example.browser", WindowMode::Fullscreen).with_caller(2);
        assert_eq!(
            c.route_launch(&other_caller),
            LaunchDecision::AsRequested(WindowMode::Fullscreen)
        );
    }

    #[test]
    fn test_relaunching_pinned_window_exits_it() {
        let (_, mut c, _) = controller();
        c.enter_mini(1, 0.0);
        assert!(!c.prepare_launch(1, WindowMode::Undefined, 5.0));
        c.enter_pinned(1, 10.0);
        assert!(!c.prepare_launch(1, WindowMode::Mini, 20.0));
        assert!(c.prepare_launch(1, WindowMode::Undefined, 30.0));
        assert_eq!(c.state(1), FloatState::Exiting);
    }
}
