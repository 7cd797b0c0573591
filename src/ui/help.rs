//! Help overlay showing keyboard shortcuts.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::Theme;

const SHORTCUTS: &[(&str, &str)] = &[
    ("space", "schedule one update on every counter"),
    ("b", "schedule a burst of overlapping updates"),
    ("tab / \u{2190} \u{2192}", "select a counter"),
    ("enter", "schedule one update on the selected counter"),
    ("r", "remount all counters"),
    ("u", "unmount all counters"),
    ("c", "clear the activity log"),
    ("?", "toggle this help screen"),
    ("q", "quit"),
];

/// Help overlay showing keyboard shortcuts and usage information.
pub struct HelpView;

impl HelpView {
    /// Render the help overlay
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, burst: usize) {
        let popup_area = Self::centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);

        let help_block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .style(theme.block_style);

        let mut help_text = vec![
            Line::from(vec![Span::styled(
                "Keys",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];
        help_text.extend(SHORTCUTS.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}"), theme.key_style),
                Span::raw(format!("  {action}")),
            ])
        }));
        help_text.push(Line::from(""));
        help_text.push(Line::from(format!(
            "A burst schedules {burst} updates per counter before any of them fires."
        )));
        help_text.push(Line::from(
            "The stale counter copies its value when an update is scheduled, so a burst only adds one.",
        ));

        let help_widget = Paragraph::new(help_text)
            .block(help_block)
            .style(theme.normal_text)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });

        frame.render_widget(help_widget, popup_area);
    }

    /// Helper function to create a centered rect using percentages
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_width = r.width * percent_x / 100;
        let popup_height = r.height * percent_y / 100;

        let popup_x = (r.width - popup_width) / 2;
        let popup_y = (r.height - popup_height) / 2;

        Rect {
            x: r.x + popup_x,
            y: r.y + popup_y,
            width: popup_width,
            height: popup_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = HelpView::centered_rect(60, 70, outer);

        assert_eq!(inner, Rect::new(20, 6, 60, 28));
    }
}
