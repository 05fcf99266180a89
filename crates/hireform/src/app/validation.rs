//! Field rules for the application form.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::FieldError;
use crate::domain::model::{FileSelectionSet, SkillLevel};
use crate::infra::config::Config;

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PNG: &str = "image/png";

/// MIME types accepted for resume uploads unless configuration says otherwise.
pub const DEFAULT_ACCEPTED_TYPES: [&str; 3] = [PDF, DOCX, PNG];

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern compiles")
});

static PHONE_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-./()]").expect("separator pattern compiles"));

/// Validation rules that depend on configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    accepted_types: Vec<String>,
}

impl Default for FormRules {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTED_TYPES.iter().map(|ty| ty.to_string()))
    }
}

impl FormRules {
    pub fn new<I, S>(accepted_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted_types: accepted_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.form.accepted_types.iter().cloned())
    }

    pub fn accepted_types(&self) -> &[String] {
        &self.accepted_types
    }

    pub fn accepts(&self, mime_type: &str) -> bool {
        self.accepted_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime_type))
    }

    pub fn name(&self, value: &str) -> Result<(), FieldError> {
        if value.is_empty() {
            Err(FieldError::MissingName)
        } else {
            Ok(())
        }
    }

    pub fn phone(&self, value: &str) -> Result<(), FieldError> {
        if is_valid_phone(value) {
            Ok(())
        } else {
            Err(FieldError::InvalidPhone)
        }
    }

    pub fn email(&self, value: &str) -> Result<(), FieldError> {
        if is_valid_email(value) {
            Ok(())
        } else {
            Err(FieldError::InvalidEmail)
        }
    }

    pub fn skill(&self, value: Option<SkillLevel>) -> Result<SkillLevel, FieldError> {
        value.ok_or(FieldError::MissingSkill)
    }

    /// The resume must hold at least one file and every file must have an accepted type.
    pub fn resume(&self, value: Option<&FileSelectionSet>) -> Result<(), FieldError> {
        let files = match value {
            Some(files) if !files.is_empty() => files,
            _ => return Err(FieldError::NoFiles),
        };
        if files.iter().all(|file| self.accepts(file.mime_type())) {
            Ok(())
        } else {
            Err(FieldError::UnsupportedFormat)
        }
    }

    pub fn agreement(&self, value: bool) -> Result<(), FieldError> {
        if value {
            Ok(())
        } else {
            Err(FieldError::AgreementRequired)
        }
    }
}

/// International numbers only: `+`, a non-zero country code digit, 8 to 15 digits overall.
pub fn is_valid_phone(value: &str) -> bool {
    let compact = PHONE_SEPARATORS.replace_all(value.trim(), "");
    let Some(digits) = compact.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&digits.len())
        && digits.bytes().all(|byte| byte.is_ascii_digit())
        && !digits.starts_with('0')
}

pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}
