use std::time::Instant;

use crate::tui::component::Component;
use crate::tui::components::TitleBar;
use crate::tui::{SimulatorHost, TuiState};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

const HELP: &str = "Backspace/Esc/b: back   ↑/↓ Enter: open page   q: quit";

pub fn draw_ui(frame: &mut Frame, host: &SimulatorHost, tui: &mut TuiState, now: Instant) {
    use Constraint::{Length, Min, Percentage};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        host.location.clone(),
        tui.policy_label.to_string(),
        host.visible_toast(now).map(str::to_string),
    );
    title_bar.render(frame, title_area);

    let [pages_area, device_area] =
        Layout::horizontal([Percentage(55), Percentage(45)]).areas(main_area);
    tui.page_list.render(frame, pages_area);
    draw_device(frame, device_area, host);

    frame.render_widget(
        Span::styled(HELP, Style::default().add_modifier(Modifier::DIM)),
        help_area,
    );
}

fn draw_device(frame: &mut Frame, area: Rect, host: &SimulatorHost) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("location ", Style::default().fg(Color::DarkGray)),
            Span::styled(host.location.as_str(), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::styled("history  ", Style::default().fg(Color::DarkGray)),
            Span::raw(host.history.len().to_string()),
        ]),
        Line::raw(""),
    ];
    lines.extend(
        host.event_log
            .iter()
            .map(|entry| Line::styled(entry.as_str(), get_entry_style(entry))),
    );

    let device = Paragraph::new(lines)
        .block(Block::bordered().title("Device"))
        .wrap(Wrap { trim: true });
    frame.render_widget(device, area);
}

fn get_entry_style(entry: &str) -> Style {
    if entry.starts_with("back") {
        Style::default().fg(Color::Yellow)
    } else if entry.starts_with("toast") {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::ExitPolicy;
    use crate::host::Host;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(host: &SimulatorHost, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| draw_ui(f, host, tui, Instant::now()))
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
    fn test_draw_ui() {
        let mut host = SimulatorHost::new("/");
        host.open("/hub.html");
        let mut tui = TuiState::new(vec!["/".into(), "/hub.html".into()], ExitPolicy::Immediate);
        let text = screen(&host, &mut tui);
        assert!(text.contains("Waypoint Simulator (/hub.html)"));
        assert!(text.contains("Device"));
        assert!(text.contains("open /hub.html"));
    }

    #[test]
    fn test_toast_in_title() {
        let mut host = SimulatorHost::new("/");
        host.show_toast("Press back again to exit");
        let policy = ExitPolicy::Confirm { window: std::time::Duration::from_secs(2) };
        let mut tui = TuiState::new(vec!["/".into()], policy);
        let text = screen(&host, &mut tui);
        assert!(text.contains("confirm | Press back again to exit"));
    }

    #[test]
    fn test_entry_styles() {
        assert_eq!(get_entry_style("back → /"), Style::default().fg(Color::Yellow));
        assert_eq!(get_entry_style("open /x"), Style::default());
    }
}
