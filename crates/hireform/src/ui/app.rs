//! Application loop for the TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use time::OffsetDateTime;

use crate::app::form::FormState;
use crate::app::receipt::Application;
use crate::app::selection::{FileSelectionManager, ResumeField, render};
use crate::app::surface::SelectionSurface;
use crate::app::validation::FormRules;
use crate::domain::model::{Field, SkillLevel};
use crate::infra::config::Config;
use crate::ui::components::badge_list::{BadgeList, BadgeListView};
use crate::ui::components::command_palette::{
    CommandPalette, CommandPaletteState, PaletteCommand, PaletteMessageLevel,
};
use crate::ui::components::fields::{
    AgreementBox, FIELD_HEIGHT, FieldFrame, SkillSelect, SubmitButton, TextInput,
};
use crate::ui::keys::KeyMap;

const TICK_RATE: Duration = Duration::from_millis(120);

/// Interactive hiring form.
pub struct UiApp {
    config: Config,
    keys: KeyMap,
    form: FormState,
    manager: FileSelectionManager,
    surface: SelectionSurface,
    badge_cursor: usize,
    focus: FocusTarget,
    palette_state: CommandPaletteState,
    palette_component: CommandPalette,
    submitted: Option<Application>,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(config: Config) -> Result<Self> {
        let keys = KeyMap::from_config(&config.keybindings).context("invalid key bindings")?;
        let rules = FormRules::from_config(&config);
        Ok(Self {
            keys,
            form: FormState::new(rules.clone(), config.form.validation()),
            manager: FileSelectionManager::new(),
            surface: SelectionSurface::new(rules),
            badge_cursor: 0,
            focus: FocusTarget::Field(Field::Name),
            palette_state: CommandPaletteState::default(),
            palette_component: CommandPalette,
            submitted: None,
            status: None,
            should_quit: false,
            config,
        })
    }

    /// Launch the terminal UI. Returns the last successfully submitted application, if any.
    pub fn run(mut self) -> Result<Option<Application>> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result.map(|()| self.submitted)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev);
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let resume_len = self.form.current_resume().map(|set| set.len()).unwrap_or(0);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(BadgeList::height(resume_len)),
                Constraint::Length(FIELD_HEIGHT),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(size);

        self.render_header(frame, layout[0]);

        let contact = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(layout[2]);

        self.render_text_field(frame, layout[1], Field::Name, "Name");
        self.render_text_field(frame, contact[0], Field::Phone, "Phone");
        self.render_text_field(frame, contact[1], Field::Email, "Email");

        SkillSelect.render(
            frame,
            layout[3],
            self.chrome(Field::Skill, "Your Skill"),
            self.form.values().skill,
        );

        let view = BadgeListView {
            label: &self.config.form.upload_label,
            hint: &self.config.form.upload_hint,
            cursor: Some(self.badge_cursor),
            focused: self.focus == FocusTarget::Field(Field::Resume),
            error: self.form.error(Field::Resume),
        };
        BadgeList.render(frame, layout[4], view, render(self.form.current_resume()));

        AgreementBox.render(
            frame,
            layout[5],
            self.chrome(Field::Agreement, "Consent"),
            self.form.values().agreement,
        );

        let button = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(layout[6]);
        SubmitButton.render(frame, button[0], self.focus == FocusTarget::Submit);

        self.render_status(frame, layout[8]);
        self.palette_component
            .render(frame, size, &self.palette_state);
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let header = Paragraph::new(vec![
            Line::styled(
                self.config.form.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                self.config.form.description.clone(),
                Style::default().fg(Color::Gray),
            ),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(header, area);
    }

    fn render_text_field(&self, frame: &mut Frame<'_>, area: Rect, field: Field, label: &str) {
        let value = self.form.text(field).unwrap_or_default();
        TextInput.render(frame, area, self.chrome(field, label), value, label);
    }

    fn chrome<'a>(&self, field: Field, label: &'a str) -> FieldFrame<'a> {
        FieldFrame {
            label,
            focused: self.focus == FocusTarget::Field(field),
            error: self.form.error(field),
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Success => Style::default().fg(Color::Green),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = message.unwrap_or_else(|| {
            Line::from(vec![
                Span::styled("tab", Style::default().fg(Color::Indexed(61))),
                Span::raw(" next · "),
                Span::styled("ctrl+p", Style::default().fg(Color::Indexed(61))),
                Span::raw(" commands · "),
                Span::styled("ctrl+s", Style::default().fg(Color::Indexed(61))),
                Span::raw(" submit · "),
                Span::styled("esc", Style::default().fg(Color::Indexed(61))),
                Span::raw(" quit"),
            ])
        });
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
        self.palette_state.purge_expired_messages();
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(key),
            Event::Paste(text) => {
                if let FocusTarget::Field(field) = self.focus {
                    self.append_text(field, &text);
                }
            }
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.palette_state.is_open() {
            return self.handle_palette_key(key);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('p') => {
                    self.palette_state.open();
                    return;
                }
                _ => {}
            }
        }

        if self.keys.submit.matches(&key) {
            return self.submit();
        }
        if self.keys.reset.matches(&key) {
            return self.reset();
        }
        if self.keys.next_field.matches(&key) {
            self.focus = self.focus.next();
            return;
        }
        if self.keys.prev_field.matches(&key) {
            self.focus = self.focus.previous();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Down => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::Up => {
                self.focus = self.focus.previous();
                return;
            }
            _ => {}
        }

        match self.focus {
            FocusTarget::Field(field @ (Field::Name | Field::Phone | Field::Email)) => {
                self.handle_text_key(field, key)
            }
            FocusTarget::Field(Field::Skill) => self.handle_skill_key(key),
            FocusTarget::Field(Field::Resume) => self.handle_resume_key(key),
            FocusTarget::Field(Field::Agreement) => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    let agreed = !self.form.values().agreement;
                    self.form.set_agreement(agreed);
                } else if key.code == KeyCode::Char(':') {
                    self.palette_state.open();
                }
            }
            FocusTarget::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.submit(),
                KeyCode::Char(':') => self.palette_state.open(),
                _ => {}
            },
        }
    }

    fn handle_text_key(&mut self, field: Field, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.append_text(field, &ch.to_string());
            }
            KeyCode::Backspace => {
                let mut value = self.form.text(field).unwrap_or_default().to_string();
                if value.pop().is_some() {
                    self.form.set_text(field, value);
                }
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            _ => {}
        }
    }

    fn append_text(&mut self, field: Field, text: &str) {
        let Some(current) = self.form.text(field) else {
            return;
        };
        let value = format!("{current}{}", text.replace(['\r', '\n'], ""));
        self.form.set_text(field, value);
    }

    fn handle_skill_key(&mut self, key: KeyEvent) {
        let current = self.form.values().skill;
        let next = match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                current.map_or(SkillLevel::Junior, SkillLevel::next)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                current.map_or(SkillLevel::Cto, SkillLevel::previous)
            }
            KeyCode::Enter => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::Char(':') => {
                self.palette_state.open();
                return;
            }
            _ => return,
        };
        self.form.set_skill(Some(next));
    }

    fn handle_resume_key(&mut self, key: KeyEvent) {
        if self.keys.remove_file.matches(&key) {
            return self.remove_badge(self.badge_cursor);
        }
        let count = self.badge_count();
        match key.code {
            KeyCode::Left | KeyCode::Char('k') => {
                self.badge_cursor = self.badge_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('j') => {
                if self.badge_cursor + 1 < count {
                    self.badge_cursor += 1;
                }
            }
            KeyCode::Char('x') | KeyCode::Backspace => self.remove_badge(self.badge_cursor),
            KeyCode::Char('a') | KeyCode::Enter => self.palette_state.open_with("add "),
            KeyCode::Char(':') => self.palette_state.open(),
            _ => {}
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.palette_state.close();
            }
            KeyCode::Enter => {
                let input = self.palette_state.take_input();
                match PaletteCommand::parse(&input) {
                    Ok(Some(command)) => {
                        self.palette_state.close();
                        self.execute_command(command);
                    }
                    Ok(None) => self.palette_state.close(),
                    Err(message) => {
                        self.palette_state.open_with(input);
                        self.palette_state
                            .set_message(PaletteMessageLevel::Error, message);
                    }
                }
            }
            KeyCode::Backspace => {
                self.palette_state.pop_char();
            }
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.palette_state.push_char(ch);
                }
            }
            _ => {}
        }
    }

    fn execute_command(&mut self, command: PaletteCommand) {
        match command {
            PaletteCommand::Add(paths) => self.attach(&paths),
            PaletteCommand::Remove(position) => self.remove_badge(position - 1),
            PaletteCommand::Reset => self.reset(),
            PaletteCommand::Submit => self.submit(),
            PaletteCommand::Help => {
                self.palette_state.open();
                self.palette_state.set_message(
                    PaletteMessageLevel::Info,
                    "add <file|dir|glob>… · remove <n> · reset · submit · quit",
                );
            }
            PaletteCommand::Quit => self.should_quit = true,
        }
    }

    fn attach(&mut self, paths: &[String]) {
        let batch = match self.surface.pick(paths) {
            Ok(batch) => batch,
            Err(err) => {
                self.set_status(StatusLevel::Error, err.to_string());
                return;
            }
        };
        if batch.is_empty() {
            self.set_status(StatusLevel::Info, "No matching files to attach");
            return;
        }
        let added = self.manager.add_files(&mut self.form, batch);
        self.badge_cursor = self.badge_count().saturating_sub(1);
        self.focus = FocusTarget::Field(Field::Resume);
        self.set_status(
            StatusLevel::Success,
            format!("Attached {} file(s)", added.len()),
        );
    }

    fn remove_badge(&mut self, index: usize) {
        let identity = render(self.form.current_resume())
            .nth(index)
            .map(|badge| (badge.identity.clone(), badge.display_name.to_string()));
        let Some((identity, name)) = identity else {
            self.set_status(StatusLevel::Info, "No file at that position");
            return;
        };
        if self.manager.remove_file(&mut self.form, &identity) {
            self.set_status(StatusLevel::Info, format!("Removed {name}"));
        }
        self.badge_cursor = self.badge_cursor.min(self.badge_count().saturating_sub(1));
    }

    fn badge_count(&self) -> usize {
        render(self.form.current_resume()).len()
    }

    fn submit(&mut self) {
        match self.form.submit(OffsetDateTime::now_utc()) {
            Ok(application) => {
                self.set_status(
                    StatusLevel::Success,
                    format!(
                        "Application submitted for {} with {} file(s)",
                        application.name,
                        application.resume.len()
                    ),
                );
                self.submitted = Some(application);
            }
            Err(errors) => {
                if let Some((field, _)) = errors.iter().next() {
                    self.focus = FocusTarget::Field(field);
                }
                self.set_status(
                    StatusLevel::Error,
                    format!("{} field(s) need attention", errors.len()),
                );
            }
        }
    }

    fn reset(&mut self) {
        self.form.reset();
        self.badge_cursor = 0;
        self.focus = FocusTarget::Field(Field::Name);
        self.set_status(StatusLevel::Info, "Form reset");
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusTarget {
    Field(Field),
    Submit,
}

impl FocusTarget {
    const ORDER: [FocusTarget; 7] = [
        FocusTarget::Field(Field::Name),
        FocusTarget::Field(Field::Phone),
        FocusTarget::Field(Field::Email),
        FocusTarget::Field(Field::Skill),
        FocusTarget::Field(Field::Resume),
        FocusTarget::Field(Field::Agreement),
        FocusTarget::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|target| *target == self)
            .unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
    Error,
}
