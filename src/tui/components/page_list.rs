//! # PageList Component
//!
//! The pages the simulated user can open directly. Known pages come from the
//! site map; extra pages (e.g. numbered test pages only covered by a pattern
//! rule) can be added from the command line.
//!
//! The highlighted entry is local state; the entry matching the device's
//! current location is marked with `●`.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, ListItem, ListState};

pub struct PageList {
    pub pages: Vec<String>,
    /// Device location, for the `●` marker
    pub current: String,
    state: ListState,
}

impl PageList {
    pub fn new(pages: Vec<String>) -> Self {
        let mut state = ListState::default();
        if !pages.is_empty() {
            state.select(Some(0));
        }
        Self {
            pages,
            current: String::new(),
            state,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.pages.get(i))
            .map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let next = self
            .state
            .selected()
            .map_or(0, |i| (i + 1) % self.pages.len());
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.pages.is_empty() {
            return;
        }
        let len = self.pages.len();
        let prev = self.state.selected().map_or(0, |i| (i + len - 1) % len);
        self.state.select(Some(prev));
    }
}

impl Component for PageList {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .pages
            .iter()
            .map(|page| {
                let marker = if *page == self.current { "● " } else { "  " };
                ListItem::new(format!("{marker}{page}"))
            })
            .collect();

        let list = List::new(items)
            .block(Block::bordered().title("Pages (Enter to open)"))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}
