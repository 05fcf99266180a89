//! Form field widgets: labelled inputs, the skill selector, the consent box and submit button.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::domain::errors::FieldError;
use crate::domain::model::SkillLevel;

/// Rows taken by a bordered field plus its message line.
pub const FIELD_HEIGHT: u16 = 4;

/// Shared chrome for one form field.
#[derive(Debug, Clone, Copy)]
pub struct FieldFrame<'a> {
    pub label: &'a str,
    pub focused: bool,
    pub error: Option<FieldError>,
}

impl FieldFrame<'_> {
    fn border_style(&self) -> Style {
        match (self.error, self.focused) {
            (Some(_), _) => Style::default().fg(Color::Red),
            (None, true) => Style::default().fg(Color::Indexed(61)),
            (None, false) => Style::default().fg(Color::DarkGray),
        }
    }

    /// Draw the border and message line, then `content` inside the border.
    fn render(&self, frame: &mut Frame<'_>, area: Rect, content: Line<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(self.border_style());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);
        frame.render_widget(Paragraph::new(content), inner);

        if let Some(error) = self.error {
            let message = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
            frame.render_widget(message, layout[1]);
        }
    }
}

/// Single-line text input with a placeholder.
#[derive(Debug, Default)]
pub struct TextInput;

impl TextInput {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        chrome: FieldFrame<'_>,
        value: &str,
        placeholder: &str,
    ) {
        let mut spans = Vec::new();
        if value.is_empty() {
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        } else {
            spans.push(Span::raw(value.to_string()));
        }
        if chrome.focused {
            spans.push(Span::styled("▏", Style::default().fg(Color::Indexed(61))));
        }
        chrome.render(frame, area, Line::from(spans));
    }
}

/// Cycling selector over [`SkillLevel`].
#[derive(Debug, Default)]
pub struct SkillSelect;

impl SkillSelect {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        chrome: FieldFrame<'_>,
        value: Option<SkillLevel>,
    ) {
        let mut spans = vec![Span::styled("‹ ", Style::default().fg(Color::DarkGray))];
        for (index, level) in SkillLevel::ALL.iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if Some(*level) == value {
                Style::default()
                    .fg(Color::Indexed(61))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(level.label(), style));
        }
        spans.push(Span::styled(" ›", Style::default().fg(Color::DarkGray)));
        chrome.render(frame, area, Line::from(spans));
    }
}

/// Consent checkbox.
#[derive(Debug, Default)]
pub struct AgreementBox;

impl AgreementBox {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, chrome: FieldFrame<'_>, checked: bool) {
        let mark = if checked { "[x] " } else { "[ ] " };
        let line = Line::from(vec![
            Span::styled(mark, Style::default().fg(Color::Indexed(61))),
            Span::raw("I’m agree with every data you collect"),
        ]);
        chrome.render(frame, area, line);
    }
}

/// Submit button.
#[derive(Debug, Default)]
pub struct SubmitButton;

impl SubmitButton {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
        let style = if focused {
            Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(61))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Indexed(61))
        };
        let button = Paragraph::new(Line::from(Span::styled("  Submit  ", style)))
            .block(Block::default().borders(Borders::ALL).border_style(style));
        frame.render_widget(button, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn text(buffer: &Buffer) -> String {
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn text_input_shows_placeholder_and_error() {
        let mut terminal = Terminal::new(TestBackend::new(40, FIELD_HEIGHT)).unwrap();
        terminal
            .draw(|frame| {
                let chrome = FieldFrame {
                    label: "Email",
                    focused: false,
                    error: Some(FieldError::InvalidEmail),
                };
                TextInput.render(frame, frame.size(), chrome, "", "Email");
            })
            .unwrap();

        let rendered = text(terminal.backend().buffer());
        assert!(rendered.contains("Email"));
        assert!(rendered.contains("Please enter a valid email"));
    }

    #[test]
    fn skill_select_lists_every_level() {
        let mut terminal = Terminal::new(TestBackend::new(60, FIELD_HEIGHT)).unwrap();
        terminal
            .draw(|frame| {
                let chrome = FieldFrame {
                    label: "Your Skill",
                    focused: true,
                    error: None,
                };
                SkillSelect.render(frame, frame.size(), chrome, Some(SkillLevel::Senior));
            })
            .unwrap();

        let rendered = text(terminal.backend().buffer());
        for level in SkillLevel::ALL {
            assert!(rendered.contains(level.label()));
        }
    }

    #[test]
    fn agreement_box_reflects_state() {
        let mut terminal = Terminal::new(TestBackend::new(50, FIELD_HEIGHT)).unwrap();
        terminal
            .draw(|frame| {
                let chrome = FieldFrame {
                    label: "Consent",
                    focused: false,
                    error: None,
                };
                AgreementBox.render(frame, frame.size(), chrome, true);
            })
            .unwrap();
        assert!(text(terminal.backend().buffer()).contains("[x]"));
    }
}
