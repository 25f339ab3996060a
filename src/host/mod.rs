//! # Host Integration
//!
//! The glue between a host runtime and the resolver. The host owns the real
//! location, history and process-exit APIs; the resolver only decides.
//!
//! ```text
//! back pressed ──▶ BackButtonHandler ──sample──▶ Host::current_location()
//!                         │                      Host::history_depth()
//!                         ▼
//!                 NavigationResolver::resolve()
//!                         │
//!                         ▼
//!        Host::navigate() | Host::show_toast() | Host::exit()
//! ```
//!
//! Location is sampled when the press arrives, never earlier: the page can
//! change between registering the handler and the first press.

pub mod ready;
pub mod storage;

use log::{debug, info};
use std::sync::Arc;

use crate::core::action::Action;
use crate::core::config::{ResolvedConfig, build_resolver};
use crate::core::resolver::NavigationResolver;
use crate::core::sitemap::{ConfigurationError, normalize_path};

/// What the resolver needs from the host runtime, and what it asks of it.
pub trait Host {
    /// Current location as the host reports it (may include query/fragment).
    fn current_location(&self) -> String;

    /// Entries in the in-app history before the current one.
    fn history_depth(&self) -> usize;

    /// Full navigation to `path`.
    fn navigate(&mut self, path: &str);

    /// Terminate the application.
    fn exit(&mut self);

    /// Show a short, non-blocking message.
    fn show_toast(&mut self, message: &str);
}

pub struct BackButtonHandler {
    resolver: Arc<NavigationResolver>,
    exit_message: String,
}

impl BackButtonHandler {
    pub fn new(resolver: Arc<NavigationResolver>, exit_message: impl Into<String>) -> Self {
        Self {
            resolver,
            exit_message: exit_message.into(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigurationError> {
        let resolver = build_resolver(config)?;
        Ok(Self::new(Arc::new(resolver), config.exit_message.clone()))
    }

    pub fn resolver(&self) -> &NavigationResolver {
        &self.resolver
    }

    /// Handles one back press end to end and returns what was done.
    pub fn on_back_pressed<H: Host + ?Sized>(&self, host: &mut H) -> Action {
        let path = normalize_path(&host.current_location());
        let depth = host.history_depth();
        let action = self.resolver.resolve(&path, depth);

        match &action {
            Action::NavigateTo(target) => host.navigate(target),
            Action::RequestExitConfirmation => host.show_toast(&self.exit_message),
            Action::Exit => {
                info!("Back pressed on {path:?}, exiting");
                host.exit();
            }
        }
        action
    }

    /// The user moved to another page by some other route than back. A
    /// pending "press again to exit" does not carry over.
    pub fn on_page_opened(&self, path: &str) {
        debug!("Page opened: {path}");
        self.resolver.reset_press_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::{ExitPolicy, ResolverSettings};
    use crate::test_support::{HostCall, ManualClock, RecordingHost, hub_map, hub_rules};
    use std::time::Duration;

    fn handler(policy: ExitPolicy) -> BackButtonHandler {
        let settings = ResolverSettings {
            root_path: "/".into(),
            root_aliases: vec!["/".into()],
            exit_policy: policy,
        };
        let resolver = NavigationResolver::with_clock(
            hub_map(),
            hub_rules(),
            settings,
            Arc::new(ManualClock::new(0)),
        )
        .unwrap();
        BackButtonHandler::new(Arc::new(resolver), "Press back again to exit")
    }

    #[test]
    fn test_navigates_from_sampled_location() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = RecordingHost::at("https://localhost/hub/leaf7.html?attempt=2");
        let action = h.on_back_pressed(&mut host);
        assert_eq!(action, Action::NavigateTo("/hub.html".into()));
        assert_eq!(host.calls, vec![HostCall::Navigate("/hub.html".into())]);
        assert_eq!(host.location, "/hub.html");
    }

    #[test]
    fn test_walks_up_to_exit() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = RecordingHost::at("/hub/leaf1.html");
        h.on_back_pressed(&mut host);
        h.on_back_pressed(&mut host);
        h.on_back_pressed(&mut host);
        assert_eq!(
            host.calls,
            vec![
                HostCall::Navigate("/hub.html".into()),
                HostCall::Navigate("/".into()),
                HostCall::Exit,
            ]
        );
    }

    #[test]
    fn test_confirmation_shows_toast_then_exits() {
        let h = handler(ExitPolicy::Confirm { window: Duration::from_millis(2000) });
        let mut host = RecordingHost::at("/");
        assert_eq!(h.on_back_pressed(&mut host), Action::RequestExitConfirmation);
        assert_eq!(h.on_back_pressed(&mut host), Action::Exit);
        assert_eq!(
            host.calls,
            vec![HostCall::Toast("Press back again to exit".into()), HostCall::Exit]
        );
    }

    #[test]
    fn test_url_in_query_does_not_pick_the_route() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = RecordingHost::at("/hub/leaf1.html?next=https://cdn.example/x.html");
        assert_eq!(h.on_back_pressed(&mut host), Action::NavigateTo("/hub.html".into()));
    }

    #[test]
    fn test_opening_a_page_clears_pending_confirmation() {
        let h = handler(ExitPolicy::Confirm { window: Duration::from_millis(2000) });
        let mut host = RecordingHost::at("/");
        assert_eq!(h.on_back_pressed(&mut host), Action::RequestExitConfirmation);
        h.on_page_opened("/");
        assert_eq!(h.on_back_pressed(&mut host), Action::RequestExitConfirmation);
        assert_eq!(h.on_back_pressed(&mut host), Action::Exit);
    }

    #[test]
    fn test_location_is_read_at_press_time() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = RecordingHost::at("/");
        // Page changes after the handler exists but before the press.
        host.location = "/hub.html".into();
        assert_eq!(h.on_back_pressed(&mut host), Action::NavigateTo("/".into()));
    }
}
