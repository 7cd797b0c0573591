//! Log view component for displaying counter activity.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::state::{ActivityKind, BoardState};
use crate::ui::Theme;

/// View for displaying what deferred updates did, newest at the bottom.
pub struct LogView;

impl LogView {
    /// Render the log view
    pub fn render(frame: &mut Frame, area: Rect, board: &BoardState, theme: &Theme) {
        let block = Block::default()
            .title("Activity")
            .borders(Borders::ALL)
            .style(theme.block_style);

        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = board
            .activity()
            .recent(visible)
            .into_iter()
            .map(|entry| {
                let detail_style = match entry.kind {
                    ActivityKind::Rejected => theme.lost_style,
                    ActivityKind::Scheduled => theme.pending_style,
                    ActivityKind::Unmounted => theme.unmounted_style,
                    _ => theme.normal_text,
                };
                Line::from(vec![
                    Span::styled(entry.at.format("%H:%M:%S%.3f ").to_string(), theme.label_style),
                    Span::styled(format!("{:<11}", entry.variant.to_string()), theme.accent(entry.variant)),
                    Span::styled(entry.describe(), detail_style),
                ])
            })
            .collect();

        let logs_widget = Paragraph::new(lines)
            .block(block)
            .style(theme.normal_text);

        frame.render_widget(logs_widget, area);
    }
}
