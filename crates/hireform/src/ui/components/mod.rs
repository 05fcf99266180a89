//! Collection of reusable TUI components.

pub mod badge_list;
pub mod command_palette;
pub mod fields;
