//! Domain models for the application form and its resume selection.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Opaque identity attached to one user file selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw file payload as reported by a selection surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub handle: PathBuf,
}

/// A payload the user picked, tagged with its selection identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub identity: FileId,
    pub payload: FilePayload,
}

impl SelectedFile {
    pub fn display_name(&self) -> &str {
        &self.payload.name
    }

    pub fn mime_type(&self) -> &str {
        &self.payload.mime_type
    }
}

/// Ordered collection of selected files held by the resume field.
///
/// Entries keep insertion order and never share an identity. New sets are
/// only produced by [`crate::app::selection::FileSelectionManager`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelectionSet {
    entries: Vec<SelectedFile>,
}

impl FileSelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<SelectedFile>) -> Self {
        debug_assert!(
            {
                let mut seen = std::collections::HashSet::new();
                entries.iter().all(|entry| seen.insert(&entry.identity))
            },
            "selection identities must be unique"
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SelectedFile] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectedFile> {
        self.entries.iter()
    }

    /// Position of the first entry carrying `identity`.
    pub fn position(&self, identity: &FileId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.identity == identity)
    }

    pub fn get(&self, identity: &FileId) -> Option<&SelectedFile> {
        self.position(identity).map(|index| &self.entries[index])
    }

    pub fn contains(&self, identity: &FileId) -> bool {
        self.position(identity).is_some()
    }
}

impl<'a> IntoIterator for &'a FileSelectionSet {
    type Item = &'a SelectedFile;
    type IntoIter = std::slice::Iter<'a, SelectedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Seniority options offered by the skill selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[value(rename_all = "lowercase")]
pub enum SkillLevel {
    Junior,
    Middle,
    Senior,
    Lead,
    #[serde(rename = "CTO")]
    Cto,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 5] = [
        SkillLevel::Junior,
        SkillLevel::Middle,
        SkillLevel::Senior,
        SkillLevel::Lead,
        SkillLevel::Cto,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Junior => "Junior",
            SkillLevel::Middle => "Middle",
            SkillLevel::Senior => "Senior",
            SkillLevel::Lead => "Lead",
            SkillLevel::Cto => "CTO",
        }
    }

    /// Next option, wrapping at the end of the list.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|level| *level == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Previous option, wrapping at the start of the list.
    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|level| *level == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SkillLevel {
    type Err = UnknownSkill;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.label().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownSkill(value.to_string()))
    }
}

/// Error returned when a skill label does not name a [`SkillLevel`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("unknown skill level '{0}'")]
pub struct UnknownSkill(pub String);

/// Fields of the application form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Phone,
    Email,
    Skill,
    Resume,
    Agreement,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Phone,
        Field::Email,
        Field::Skill,
        Field::Resume,
        Field::Agreement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Skill => "skill",
            Field::Resume => "resume",
            Field::Agreement => "agreement",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
