//! Submitted applications and their receipts.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::app::form::FormValues;
use crate::domain::model::{FileId, SkillLevel};

/// Validated snapshot of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub skill: SkillLevel,
    pub resume: Vec<ResumeEntry>,
    pub agreement: bool,
    pub submitted_at: String,
}

/// One resume file as it appears in a submitted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeEntry {
    pub id: FileId,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl Application {
    pub(crate) fn new(values: &FormValues, skill: SkillLevel, now: OffsetDateTime) -> Self {
        let resume = values
            .resume
            .iter()
            .flatten()
            .map(|file| ResumeEntry {
                id: file.identity.clone(),
                name: file.payload.name.clone(),
                mime_type: file.payload.mime_type.clone(),
                size: file.payload.size,
            })
            .collect();
        let submitted_at = now
            .format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string());

        Self {
            name: values.name.clone(),
            phone: values.phone.clone(),
            email: values.email.clone(),
            skill,
            resume,
            agreement: values.agreement,
            submitted_at,
        }
    }

    pub fn total_size(&self) -> u64 {
        self.resume.iter().map(|entry| entry.size).sum()
    }
}

/// Supported receipt formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReceiptFormat {
    /// Pretty-printed JSON document.
    #[default]
    Json,
    /// Human readable confirmation.
    Text,
}

impl ReceiptFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptFormat::Json => "json",
            ReceiptFormat::Text => "text",
        }
    }
}

impl FromStr for ReceiptFormat {
    type Err = ReceiptFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReceiptFormat::Json),
            "text" | "txt" | "plain" => Ok(ReceiptFormat::Text),
            other => Err(ReceiptFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`ReceiptFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ReceiptFormatParseError {
    #[error("unknown receipt format '{0}'")]
    UnknownFormat(String),
}

/// Renders applications as JSON or through the text template.
pub struct ReceiptRenderer {
    env: Environment<'static>,
}

impl ReceiptRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template("receipt", TEXT_TEMPLATE)
            .map_err(|err| anyhow!("failed to register receipt template: {err}"))?;
        Ok(Self { env })
    }

    pub fn render(&self, application: &Application, format: ReceiptFormat) -> Result<String> {
        match format {
            ReceiptFormat::Json => serde_json::to_string_pretty(application)
                .context("failed to serialize application"),
            ReceiptFormat::Text => {
                let context = TemplateContext {
                    application,
                    total_size: human_size(application.total_size()),
                    files: application
                        .resume
                        .iter()
                        .map(|entry| TemplateFile {
                            name: &entry.name,
                            mime_type: &entry.mime_type,
                            size: human_size(entry.size),
                        })
                        .collect(),
                };
                self.env
                    .get_template("receipt")
                    .and_then(|template| template.render(&context))
                    .map_err(|err| anyhow!("failed to render receipt: {err}"))
            }
        }
    }
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    application: &'a Application,
    total_size: String,
    files: Vec<TemplateFile<'a>>,
}

#[derive(Serialize)]
struct TemplateFile<'a> {
    name: &'a str,
    mime_type: &'a str,
    size: String,
}

fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

const TEXT_TEMPLATE: &str = r#"Application received {{ application.submitted_at }}
Name: {{ application.name }}
Phone: {{ application.phone }}
Email: {{ application.email }}
Skill: {{ application.skill }}
Resume ({{ files|length }} files, {{ total_size }}):
{% for file in files %}
  {{ loop.index }}. {{ file.name }} [{{ file.mime_type }}] {{ file.size }}
{% endfor %}
"#;
