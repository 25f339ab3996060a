//! # TitleBar Component
//!
//! Top status bar of the simulated device: current page, exit policy, and
//! the transient toast while it is showing.
//!
//! Stateless: it renders whatever props it is given.
//!
//! 1. **Toast**: `"Waypoint Simulator (/index.html) | confirm | Press back again to exit"`
//! 2. **Default**: `"Waypoint Simulator (/index.html) | confirm"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    /// Page the simulated device is showing
    pub location: String,
    /// "immediate" or "confirm"
    pub policy: String,
    /// Toast text, if one is visible
    pub toast: Option<String>,
}

impl TitleBar {
    pub fn new(location: String, policy: String, toast: Option<String>) -> Self {
        Self {
            location,
            policy,
            toast,
        }
    }

    fn text(&self) -> String {
        match &self.toast {
            Some(toast) => format!(
                "Waypoint Simulator ({}) | {} | {}",
                self.location, self.policy, toast
            ),
            None => format!("Waypoint Simulator ({}) | {}", self.location, self.policy),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_toast() {
        let mut title_bar = TitleBar::new(
            "/index.html".to_string(),
            "confirm".to_string(),
            Some("Press back again to exit".to_string()),
        );
        let text = rendered(&mut title_bar);
        assert!(text.contains("Waypoint Simulator"));
        assert!(text.contains("/index.html"));
        assert!(text.contains("Press back again to exit"));
    }

    #[test]
    fn test_title_bar_without_toast() {
        let mut title_bar = TitleBar::new("/hub.html".to_string(), "immediate".to_string(), None);
        let text = rendered(&mut title_bar);
        assert!(text.contains("/hub.html"));
        assert!(text.contains("immediate"));
        assert!(!text.contains("again"));
    }
}
