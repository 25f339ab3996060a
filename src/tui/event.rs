use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// Simulator input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Quit,
    /// The hardware back button.
    Back,
    /// Open the highlighted page.
    Open,
    SelectUp,
    SelectDown,
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
                (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
                // Backspace and Esc both stand in for the hardware back button
                (_, KeyCode::Backspace | KeyCode::Esc | KeyCode::Char('b')) => Some(TuiEvent::Back),
                (_, KeyCode::Enter) => Some(TuiEvent::Open),
                (_, KeyCode::Up | KeyCode::Char('k')) => Some(TuiEvent::SelectUp),
                (_, KeyCode::Down | KeyCode::Char('j')) => Some(TuiEvent::SelectDown),
                _ => None,
            }
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
