//! Command palette for attaching files and form-wide actions.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Commands understood by the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    /// Attach files, directories or glob patterns.
    Add(Vec<String>),
    /// Remove the badge at a 1-based position.
    Remove(usize),
    Reset,
    Submit,
    Help,
    Quit,
}

impl PaletteCommand {
    /// Parse the palette input. Empty input yields `Ok(None)`.
    pub fn parse(input: &str) -> Result<Option<Self>, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();
        let command = match verb {
            "add" | "attach" => {
                let paths = split_args(rest);
                if paths.is_empty() {
                    return Err("add requires at least one path".into());
                }
                PaletteCommand::Add(paths)
            }
            "remove" | "rm" => {
                let position = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|position| *position > 0)
                    .ok_or_else(|| format!("remove expects a file number, got '{rest}'"))?;
                PaletteCommand::Remove(position)
            }
            "reset" => PaletteCommand::Reset,
            "submit" => PaletteCommand::Submit,
            "help" => PaletteCommand::Help,
            "quit" | "q" => PaletteCommand::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        Ok(Some(command))
    }
}

/// Whitespace separated arguments; double quotes group paths containing spaces.
fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            ch if ch.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Interactive state backing the command palette overlay.
#[derive(Debug, Default, Clone)]
pub struct CommandPaletteState {
    visible: bool,
    input: String,
    message: Option<PaletteMessage>,
}

impl CommandPaletteState {
    /// Reveal the palette with an empty input buffer.
    pub fn open(&mut self) {
        self.open_with("");
    }

    /// Reveal the palette with an initial command prefilled.
    pub fn open_with<S: Into<String>>(&mut self, content: S) {
        self.visible = true;
        self.input = content.into();
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Consume the current input, leaving the buffer empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn set_message<S: Into<String>>(&mut self, level: PaletteMessageLevel, message: S) {
        self.message = Some(PaletteMessage::new(level, message.into()));
    }

    /// Retain only messages that have not expired.
    pub fn purge_expired_messages(&mut self) {
        if let Some(message) = &self.message
            && message.is_expired()
        {
            self.message = None;
        }
    }
}

/// Visual component that renders the command palette overlay.
#[derive(Debug, Default)]
pub struct CommandPalette;

impl CommandPalette {
    /// Draw the palette if it is visible.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &CommandPaletteState) {
        if !state.is_open() {
            return;
        }

        let width = area.width.saturating_sub(10).min(80);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(6),
            width,
            height: 5.min(area.height),
        };

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title("Command · add <path…> · remove <n> · reset · submit")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Indexed(61)));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let prompt = Paragraph::new(Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Indexed(61))),
            Span::raw(state.input().to_string()),
        ]));
        frame.render_widget(prompt, layout[0]);

        if let Some(message) = &state.message {
            let style = match message.level {
                PaletteMessageLevel::Info => Style::default().fg(Color::Gray),
                PaletteMessageLevel::Error => {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                }
            };
            let paragraph = Paragraph::new(Line::from(message.text.clone()))
                .wrap(Wrap { trim: true })
                .style(style);
            frame.render_widget(paragraph, layout[1]);
        }
    }
}

/// Command palette message severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
struct PaletteMessage {
    level: PaletteMessageLevel,
    text: String,
    expires_at: Instant,
}

impl PaletteMessage {
    fn new(level: PaletteMessageLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + MESSAGE_TTL,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
