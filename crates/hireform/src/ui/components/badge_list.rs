//! Removable badge list for the resume selection.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::selection::Badges;
use crate::domain::errors::FieldError;

/// Renders the projection produced by [`crate::app::selection::render`].
#[derive(Debug, Default)]
pub struct BadgeList;

/// Text and focus state shown around the badges.
#[derive(Debug, Clone, Copy)]
pub struct BadgeListView<'a> {
    pub label: &'a str,
    pub hint: &'a str,
    pub cursor: Option<usize>,
    pub focused: bool,
    pub error: Option<FieldError>,
}

impl BadgeList {
    /// Rows needed for `count` badges including border, hint and message line.
    pub fn height(count: usize) -> u16 {
        let rows = count.max(1).min(8) as u16;
        rows + 4
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        view: BadgeListView<'_>,
        badges: Badges<'_>,
    ) {
        let border = match (view.error, view.focused) {
            (Some(_), _) => Style::default().fg(Color::Red),
            (None, true) => Style::default().fg(Color::Indexed(61)),
            (None, false) => Style::default().fg(Color::DarkGray),
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .title(view.label)
            .borders(Borders::ALL)
            .border_style(border);
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);

        let mut lines = vec![Line::styled(
            view.hint.to_string(),
            Style::default().fg(Color::DarkGray),
        )];
        if badges.len() == 0 {
            lines.push(Line::styled(
                "No files selected · press : then add <path>",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        for (index, badge) in badges.enumerate() {
            let selected = view.focused && view.cursor == Some(index);
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Gray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(Color::DarkGray)
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" ▤ {} ", badge.display_name), style),
                Span::styled("✕", Style::default().fg(Color::Red)),
            ]));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

        if let Some(error) = view.error {
            let message = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
            frame.render_widget(message, layout[1]);
        }
    }
}
