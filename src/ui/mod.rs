//! UI components for the counter board.
//!
//! The screen is split into the counter panels, the activity log and a
//! status line, with an optional help overlay on top.

pub mod board;
pub mod help;
pub mod log_view;
pub mod theme;

pub use board::BoardView;
pub use help::HelpView;
pub use log_view::LogView;
pub use theme::Theme;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::BoardState;

/// The result of updating the UI in response to user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Schedule one update on every counter
    ScheduleAll,
    /// Schedule one update on the selected counter
    ScheduleSelected,
    /// Schedule a burst of overlapping updates on every counter
    Burst,
    SelectNext,
    SelectPrev,
    /// Unmount and mount fresh counters
    Remount,
    /// Unmount every counter
    Unmount,
    ClearLog,
    /// Other update (no action needed)
    Other,
}

/// Main UI controller.
pub struct Ui {
    /// Whether to show help overlay
    show_help: bool,
    /// UI theme
    theme: Theme,
    /// Burst size, shown in the help overlay
    burst: usize,
}

impl Ui {
    /// Create a new UI controller.
    pub fn new(burst: usize) -> Self {
        Self {
            show_help: false,
            theme: Theme::default(),
            burst,
        }
    }

    /// Toggle help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Maps a key press onto an action.
    pub fn handle_key_event(&self, key: KeyEvent) -> UpdateKind {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return UpdateKind::Quit;
        }

        // While help is open, any key other than quit just closes it.
        if self.show_help {
            return match key.code {
                KeyCode::Char('q') => UpdateKind::Quit,
                _ => UpdateKind::ToggleHelp,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => UpdateKind::Quit,
            KeyCode::F(1) | KeyCode::Char('?') => UpdateKind::ToggleHelp,
            KeyCode::Char(' ') => UpdateKind::ScheduleAll,
            KeyCode::Enter => UpdateKind::ScheduleSelected,
            KeyCode::Char('b') => UpdateKind::Burst,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => UpdateKind::SelectNext,
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => UpdateKind::SelectPrev,
            KeyCode::Char('r') => UpdateKind::Remount,
            KeyCode::Char('u') => UpdateKind::Unmount,
            KeyCode::Char('c') => UpdateKind::ClearLog,
            _ => UpdateKind::Other,
        }
    }

    /// Render the UI.
    pub fn render(&self, frame: &mut Frame, board: &BoardState) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(13), // Counter panels
                Constraint::Min(3),     // Activity log
                Constraint::Length(1),  // Status line
            ])
            .split(area);

        BoardView::render(frame, chunks[0], board, &self.theme);
        LogView::render(frame, chunks[1], board, &self.theme);
        self.render_status_line(frame, chunks[2], board);

        if self.show_help {
            HelpView::render(frame, area, &self.theme, self.burst);
        }
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect, board: &BoardState) {
        let status_text = [
            format!("mount #{}", board.generation()),
            format!("delay {} ms", board.delay().as_millis()),
            format!("in flight {}", board.pending_total()),
            format!("selected {}", board.selected_variant()),
            "press ? for help".to_string(),
        ]
        .join(" | ");

        let status_widget = Paragraph::new(status_text).style(self.theme.status_style);

        frame.render_widget(status_widget, area);
    }
}
