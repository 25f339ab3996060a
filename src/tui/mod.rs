//! # Device Simulator
//!
//! The ratatui-specific layer. Plays the host runtime for the resolver: it
//! keeps a fake location and history, turns keys into back presses, and
//! executes the resulting actions (navigate, toast, exit).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Keys
//!
//! - `Backspace` / `Esc` / `b`: hardware back button
//! - `↑` / `↓`, `Enter`: pick and open a page
//! - `q` / `Ctrl+C`: quit without "exiting" the app

mod component;
mod components;
mod event;
mod ui;

use log::info;
use std::time::{Duration, Instant};

use crate::core::action::Action;
use crate::core::resolver::ExitPolicy;
use crate::host::{BackButtonHandler, Host};
use crate::tui::components::PageList;
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

/// Entries kept in both the simulated history and the event log.
pub const RETAINED_ENTRIES: usize = 50;

/// The simulated device: location, history, and whatever the last action did.
pub struct SimulatorHost {
    pub location: String,
    /// Oldest first, at most [`RETAINED_ENTRIES`].
    pub history: Vec<String>,
    /// Every navigation this session, including ones dropped from `history`.
    pub navigations: usize,
    pub toast: Option<(String, Instant)>,
    pub exited: bool,
    /// Most recent first.
    pub event_log: Vec<String>,
}

impl SimulatorHost {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            history: Vec::new(),
            navigations: 0,
            toast: None,
            exited: false,
            event_log: Vec::new(),
        }
    }

    /// User tapped a link: a normal forward navigation.
    pub fn open(&mut self, path: &str) {
        self.log(format!("open {path}"));
        self.go(path);
    }

    /// Toast text if it is still on screen at `now`.
    pub fn visible_toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|(_, shown)| now.duration_since(*shown) < TOAST_DURATION)
            .map(|(msg, _)| msg.as_str())
    }

    fn go(&mut self, path: &str) {
        let previous = std::mem::replace(&mut self.location, path.to_string());
        self.history.push(previous);
        if self.history.len() > RETAINED_ENTRIES {
            self.history.remove(0);
        }
        self.navigations += 1;
        self.toast = None;
    }

    fn log(&mut self, line: String) {
        self.event_log.insert(0, line);
        self.event_log.truncate(RETAINED_ENTRIES);
    }
}

impl Host for SimulatorHost {
    fn current_location(&self) -> String {
        self.location.clone()
    }

    fn history_depth(&self) -> usize {
        self.history.len()
    }

    fn navigate(&mut self, path: &str) {
        self.log(format!("back → {path}"));
        self.go(path);
    }

    fn exit(&mut self) {
        self.log("back → exit".to_string());
        self.exited = true;
    }

    fn show_toast(&mut self, message: &str) {
        self.log(format!("toast: {message}"));
        self.toast = Some((message.to_string(), Instant::now()));
    }
}

/// TUI-specific presentation state
pub struct TuiState {
    pub page_list: PageList,
    pub policy_label: &'static str,
}

impl TuiState {
    pub fn new(pages: Vec<String>, policy: ExitPolicy) -> Self {
        Self {
            page_list: PageList::new(pages),
            policy_label: match policy {
                ExitPolicy::Immediate => "immediate",
                ExitPolicy::Confirm { .. } => "confirm",
            },
        }
    }
}

/// Pages offered in the picker: the site map in path order, then `extra_pages`.
pub fn simulator_pages(handler: &BackButtonHandler, extra_pages: &[String]) -> Vec<String> {
    let mut pages: Vec<String> = handler
        .resolver()
        .map()
        .iter()
        .map(|(path, _)| path.to_string())
        .collect();
    for extra in extra_pages {
        if !pages.contains(extra) {
            pages.push(extra.clone());
        }
    }
    pages
}

/// Applies one event. Returns `true` when the simulator should stop.
pub fn handle_event(
    event: TuiEvent,
    handler: &BackButtonHandler,
    host: &mut SimulatorHost,
    tui: &mut TuiState,
) -> bool {
    match event {
        TuiEvent::Quit => return true,
        TuiEvent::Back => {
            let action = handler.on_back_pressed(host);
            if action == Action::Exit {
                info!("Simulated app exited from {}", host.location);
            }
        }
        TuiEvent::Open => {
            if let Some(page) = tui.page_list.selected().map(str::to_string) {
                host.open(&page);
                handler.on_page_opened(&page);
            }
        }
        TuiEvent::SelectUp => tui.page_list.select_previous(),
        TuiEvent::SelectDown => tui.page_list.select_next(),
        TuiEvent::Resize => {}
    }
    host.exited
}

pub fn run(handler: BackButtonHandler, extra_pages: &[String]) -> std::io::Result<()> {
    let settings = handler.resolver().settings();
    let mut host = SimulatorHost::new(settings.root_path.clone());
    let mut tui = TuiState::new(simulator_pages(&handler, extra_pages), settings.exit_policy);

    let mut terminal = ratatui::init();
    info!("Simulator started at {}", host.location);

    let result = (|| -> std::io::Result<()> {
        loop {
            tui.page_list.current = host.location.clone();
            terminal.draw(|f| ui::draw_ui(f, &host, &mut tui, Instant::now()))?;

            if let Some(event) = poll_event_timeout(Duration::from_millis(250))? {
                if handle_event(event, &handler, &mut host, &mut tui) {
                    break;
                }
            }
        }
        Ok(())
    })();

    ratatui::restore();
    if host.exited {
        println!("App exited from {} after {} navigations", host.location, host.navigations);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::{NavigationResolver, ResolverSettings};
    use crate::test_support::{ManualClock, hub_map, hub_rules};
    use std::sync::Arc;

    fn handler(policy: ExitPolicy) -> BackButtonHandler {
        let settings = ResolverSettings {
            root_path: "/".into(),
            root_aliases: vec!["/".into()],
            exit_policy: policy,
        };
        let resolver =
            NavigationResolver::with_clock(hub_map(), hub_rules(), settings, Arc::new(ManualClock::new(0)))
                .unwrap();
        BackButtonHandler::new(Arc::new(resolver), "Press back again to exit")
    }

    #[test]
    fn test_simulator_pages_include_extras_once() {
        let h = handler(ExitPolicy::Immediate);
        let pages = simulator_pages(&h, &["/hub/leaf9.html".into(), "/hub.html".into()]);
        assert_eq!(pages, vec!["/", "/hub.html", "/hub/leaf1.html", "/hub/leaf9.html"]);
    }

    #[test]
    fn test_open_then_back_walks_up() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = SimulatorHost::new("/");
        let mut tui = TuiState::new(simulator_pages(&h, &["/hub/leaf9.html".into()]), ExitPolicy::Immediate);

        tui.page_list.select_previous(); // wraps to the extra page
        assert!(!handle_event(TuiEvent::Open, &h, &mut host, &mut tui));
        assert_eq!(host.location, "/hub/leaf9.html");

        assert!(!handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert_eq!(host.location, "/hub.html");
        assert!(!handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert_eq!(host.location, "/");
        assert!(handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert!(host.exited);
        assert_eq!(host.event_log[0], "back → exit");
    }

    #[test]
    fn test_confirm_policy_shows_toast_first() {
        let policy = ExitPolicy::Confirm { window: Duration::from_millis(2000) };
        let h = handler(policy);
        let mut host = SimulatorHost::new("/");
        let mut tui = TuiState::new(vec![], policy);

        assert!(!handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert_eq!(host.visible_toast(Instant::now()), Some("Press back again to exit"));
        assert!(handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
    }

    #[test]
    fn test_opening_a_page_disarms_exit() {
        let policy = ExitPolicy::Confirm { window: Duration::from_millis(2000) };
        let h = handler(policy);
        let mut host = SimulatorHost::new("/");
        let mut tui = TuiState::new(vec!["/".into()], policy);

        assert!(!handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert!(!handle_event(TuiEvent::Open, &h, &mut host, &mut tui));
        // First press after opening a page asks again.
        assert!(!handle_event(TuiEvent::Back, &h, &mut host, &mut tui));
        assert!(!host.exited);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut host = SimulatorHost::new("/");
        for i in 0..RETAINED_ENTRIES + 20 {
            host.open(&format!("/page{i}.html"));
        }
        assert_eq!(host.history.len(), RETAINED_ENTRIES);
        assert_eq!(host.history_depth(), RETAINED_ENTRIES);
        assert_eq!(host.navigations, RETAINED_ENTRIES + 20);
        assert_eq!(host.history.last().map(String::as_str), Some("/page68.html"));
        assert_eq!(host.event_log.len(), RETAINED_ENTRIES);
    }

    #[test]
    fn test_toast_expires() {
        let mut host = SimulatorHost::new("/");
        host.show_toast("hi");
        let later = Instant::now() + TOAST_DURATION + Duration::from_millis(1);
        assert_eq!(host.visible_toast(later), None);
    }

    #[test]
    fn test_quit_does_not_exit_app() {
        let h = handler(ExitPolicy::Immediate);
        let mut host = SimulatorHost::new("/hub.html");
        let mut tui = TuiState::new(vec![], ExitPolicy::Immediate);
        assert!(handle_event(TuiEvent::Quit, &h, &mut host, &mut tui));
        assert!(!host.exited);
    }
}
