//! Domain-specific errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::domain::model::Field;

/// Field-level validation failure, worded the way the form displays it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please enter your name")]
    MissingName,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Please select your skill")]
    MissingSkill,
    #[error("Please select your files")]
    NoFiles,
    #[error("Unsupported file format")]
    UnsupportedFormat,
    #[error("Please agree to our data collection")]
    AgreementRequired,
}

/// Every field that failed validation during a submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl FormErrors {
    pub(crate) fn from_map(errors: BTreeMap<Field, FieldError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, *error))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}
