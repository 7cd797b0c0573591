//! Event handling for the counter board.
//!
//! Terminal input and a periodic tick are merged into a single stream of
//! [`Event`]s. The tick drives redraws so that deferred updates show up even
//! when no key is pressed.

pub mod handler;

pub use handler::EventHandler;

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Default tick interval.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(250);

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Terminal resize event
    Resize(u16, u16),
    /// Regular tick event for redraws
    Tick,
}

impl Event {
    /// Maps a crossterm event onto an application event. Key releases and
    /// repeats, mouse and focus events are dropped.
    pub fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn only_key_presses_are_forwarded() {
        let press = key(KeyEventKind::Press);
        assert_eq!(
            Event::from_terminal(CrosstermEvent::Key(press)),
            Some(Event::Key(press))
        );
        assert_eq!(
            Event::from_terminal(CrosstermEvent::Key(key(KeyEventKind::Release))),
            None
        );
        assert_eq!(
            Event::from_terminal(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        );
    }
}
