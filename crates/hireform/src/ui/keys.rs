//! Parsing configured key bindings such as `ctrl+s` or `backtab`.

use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::infra::config::Keybindings;

/// A single key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn parse(binding: &str) -> Result<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut code = None;
        for part in binding.split('+').map(str::trim) {
            let lower = part.to_ascii_lowercase();
            match lower.as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ if code.is_some() => {
                    return Err(anyhow!("key binding '{binding}' names two keys"));
                }
                _ => {
                    let parsed = parse_code(&lower)
                        .ok_or_else(|| anyhow!("unknown key '{part}' in '{binding}'"))?;
                    code = Some(parsed);
                }
            }
        }
        let code = code.ok_or_else(|| anyhow!("key binding '{binding}' has no key"))?;
        Ok(Self { code, modifiers })
    }

    /// Whether `event` triggers this chord. Shift is ignored for keys that imply it.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        let wanted = if matches!(self.code, KeyCode::BackTab | KeyCode::Char(_)) {
            self.modifiers & relevant
        } else {
            self.modifiers
        };
        let got = if matches!(self.code, KeyCode::BackTab | KeyCode::Char(_)) {
            event.modifiers & relevant
        } else {
            event.modifiers
        };
        codes_match(self.code, event.code) && wanted == got
    }
}

fn codes_match(bound: KeyCode, pressed: KeyCode) -> bool {
    match (bound, pressed) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    }
}

fn parse_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "delete" | "del" => KeyCode::Delete,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Resolved form key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    pub next_field: KeyChord,
    pub prev_field: KeyChord,
    pub submit: KeyChord,
    pub reset: KeyChord,
    pub remove_file: KeyChord,
}

impl KeyMap {
    pub fn from_config(bindings: &Keybindings) -> Result<Self> {
        Ok(Self {
            next_field: KeyChord::parse(&bindings.next_field)?,
            prev_field: KeyChord::parse(&bindings.prev_field)?,
            submit: KeyChord::parse(&bindings.submit)?,
            reset: KeyChord::parse(&bindings.reset)?,
            remove_file: KeyChord::parse(&bindings.remove_file)?,
        })
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            next_field: KeyChord {
                code: KeyCode::Tab,
                modifiers: KeyModifiers::NONE,
            },
            prev_field: KeyChord {
                code: KeyCode::BackTab,
                modifiers: KeyModifiers::NONE,
            },
            submit: KeyChord {
                code: KeyCode::Char('s'),
                modifiers: KeyModifiers::CONTROL,
            },
            reset: KeyChord {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL,
            },
            remove_file: KeyChord {
                code: KeyCode::Delete,
                modifiers: KeyModifiers::NONE,
            },
        }
    }
}
