//! Board view: one panel per counter variant.
//!
//! Each panel shows the displayed count, what the count should be, how many
//! updates are still in flight, how many writes the display accepted, and,
//! for the external counter, the accumulator it mirrors.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::counter::CounterSnapshot;
use crate::state::BoardState;
use crate::ui::Theme;

/// Side-by-side counter panels.
pub struct BoardView;

impl BoardView {
    pub fn render(frame: &mut Frame, area: Rect, board: &BoardState, theme: &Theme) {
        let snapshots = board.snapshots();
        let share = 100 / snapshots.len().max(1) as u16;
        let constraints: Vec<Constraint> = snapshots
            .iter()
            .map(|_| Constraint::Percentage(share))
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (idx, snapshot) in snapshots.iter().enumerate() {
            let selected = idx == board.selected();
            Self::render_panel(frame, chunks[idx], snapshot, selected, theme);
        }
    }

    fn render_panel(
        frame: &mut Frame,
        area: Rect,
        snapshot: &CounterSnapshot,
        selected: bool,
        theme: &Theme,
    ) {
        let variant = snapshot.variant;
        let border_style = if selected {
            theme.selected_block
        } else {
            theme.block_style
        };
        let block = Block::default()
            .title(Span::styled(variant.label(), theme.accent(variant)))
            .borders(Borders::ALL)
            .border_style(border_style);

        let paragraph = Paragraph::new(Self::panel_lines(snapshot, theme))
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
    }

    fn panel_lines<'a>(snapshot: &CounterSnapshot, theme: &Theme) -> Vec<Line<'a>> {
        let mut lines = vec![
            Line::from(Span::styled(snapshot.variant.strategy(), theme.label_style)),
            Line::from(""),
            Line::from(Span::styled(
                format!("Count: {}", snapshot.count),
                theme.count_style,
            )),
            Line::from(""),
            Self::field("expected", snapshot.expected.to_string(), theme.value_style, theme),
            Self::field(
                "pending",
                snapshot.pending.to_string(),
                if snapshot.pending > 0 {
                    theme.pending_style
                } else {
                    theme.value_style
                },
                theme,
            ),
            Self::field("writes", snapshot.writes.to_string(), theme.value_style, theme),
        ];

        if let Some(acc) = snapshot.accumulator {
            let style = if acc == snapshot.count {
                theme.value_style
            } else {
                theme.lost_style
            };
            lines.push(Self::field("accumulator", acc.to_string(), style, theme));
        }

        lines.push(Line::from(""));
        lines.push(Self::verdict(snapshot, theme));
        lines
    }

    fn field<'a>(
        label: &'static str,
        value: String,
        style: ratatui::style::Style,
        theme: &Theme,
    ) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("{label}: "), theme.label_style),
            Span::styled(value, style),
        ])
    }

    fn verdict<'a>(snapshot: &CounterSnapshot, theme: &Theme) -> Line<'a> {
        if !snapshot.mounted {
            return Line::from(Span::styled("unmounted", theme.unmounted_style));
        }
        if snapshot.pending > 0 {
            return Line::from(Span::styled("waiting...", theme.pending_style));
        }
        match snapshot.dropped() {
            0 => Line::from(Span::styled("no updates lost", theme.ok_style)),
            lost => Line::from(Span::styled(
                format!("{lost} update(s) lost"),
                theme.lost_style,
            )),
        }
    }
}
