//! Form state holder: field values, per-field errors and submission.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::app::receipt::Application;
use crate::app::selection::ResumeField;
use crate::app::validation::FormRules;
use crate::domain::errors::{FieldError, FormErrors};
use crate::domain::model::{Field, FileSelectionSet, SkillLevel};

/// When field values are re-validated after a change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Every change re-validates the changed field.
    #[default]
    OnChange,
    /// Changes are only re-validated once a submit has been attempted.
    OnSubmit,
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on-change" | "onchange" | "change" => Ok(ValidationMode::OnChange),
            "on-submit" | "onsubmit" | "submit" => Ok(ValidationMode::OnSubmit),
            other => Err(format!("unknown validation mode '{other}'")),
        }
    }
}

/// Raw values of every field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub skill: Option<SkillLevel>,
    pub resume: Option<FileSelectionSet>,
    pub agreement: bool,
}

/// Holds the application form and the errors currently shown for each field.
#[derive(Debug, Clone)]
pub struct FormState {
    values: FormValues,
    errors: BTreeMap<Field, FieldError>,
    rules: FormRules,
    mode: ValidationMode,
    submit_attempted: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(FormRules::default(), ValidationMode::default())
    }
}

impl FormState {
    pub fn new(rules: FormRules, mode: ValidationMode) -> Self {
        Self {
            values: FormValues::default(),
            errors: BTreeMap::new(),
            rules,
            mode,
            submit_attempted: false,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    /// Error currently attached to `field`, if any.
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.values.name = name.into();
        self.changed(Field::Name);
    }

    pub fn set_phone<S: Into<String>>(&mut self, phone: S) {
        self.values.phone = phone.into();
        self.changed(Field::Phone);
    }

    pub fn set_email<S: Into<String>>(&mut self, email: S) {
        self.values.email = email.into();
        self.changed(Field::Email);
    }

    pub fn set_skill(&mut self, skill: Option<SkillLevel>) {
        self.values.skill = skill;
        self.changed(Field::Skill);
    }

    pub fn set_agreement(&mut self, agreement: bool) {
        self.values.agreement = agreement;
        self.changed(Field::Agreement);
    }

    /// Text of an editable text field.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.values.name),
            Field::Phone => Some(&self.values.phone),
            Field::Email => Some(&self.values.email),
            _ => None,
        }
    }

    /// Replace the text of an editable text field. Other fields are ignored.
    pub fn set_text<S: Into<String>>(&mut self, field: Field, value: S) {
        match field {
            Field::Name => self.set_name(value),
            Field::Phone => self.set_phone(value),
            Field::Email => self.set_email(value),
            _ => {}
        }
    }

    /// Restore every field to its default and forget previous submit attempts.
    pub fn reset(&mut self) {
        self.values = FormValues::default();
        self.errors.clear();
        self.submit_attempted = false;
        tracing::debug!("form reset");
    }

    /// Validate every field. On success returns the application stamped with `now`.
    pub fn submit(&mut self, now: OffsetDateTime) -> Result<Application, FormErrors> {
        self.submit_attempted = true;
        for field in Field::ALL {
            self.validate(field);
        }
        let skill = match self.values.skill {
            Some(skill) if self.errors.is_empty() => skill,
            _ => {
                tracing::debug!(errors = self.errors.len(), "submission rejected");
                return Err(FormErrors::from_map(self.errors.clone()));
            }
        };

        let application = Application::new(&self.values, skill, now);
        tracing::info!(
            applicant = %application.name,
            skill = %application.skill,
            files = application.resume.len(),
            "application submitted"
        );
        Ok(application)
    }

    fn changed(&mut self, field: Field) {
        if self.mode == ValidationMode::OnChange || self.submit_attempted {
            self.validate(field);
        }
    }

    fn validate(&mut self, field: Field) {
        let values = &self.values;
        let result = match field {
            Field::Name => self.rules.name(&values.name),
            Field::Phone => self.rules.phone(&values.phone),
            Field::Email => self.rules.email(&values.email),
            Field::Skill => self.rules.skill(values.skill).map(|_| ()),
            Field::Resume => self.rules.resume(values.resume.as_ref()),
            Field::Agreement => self.rules.agreement(values.agreement),
        };
        match result {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(error) => {
                self.errors.insert(field, error);
            }
        }
    }
}

impl ResumeField for FormState {
    fn current_resume(&self) -> Option<&FileSelectionSet> {
        self.values.resume.as_ref()
    }

    fn publish_resume(&mut self, set: FileSelectionSet) {
        self.values.resume = Some(set);
        self.changed(Field::Resume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use time::macros::datetime;

    use crate::app::selection::{FileSelectionManager, SequentialIdentities};
    use crate::app::validation::{PDF, PNG};
    use crate::domain::model::FilePayload;

    fn payload(name: &str, mime_type: &str) -> FilePayload {
        FilePayload {
            name: name.into(),
            mime_type: mime_type.into(),
            size: 1_024,
            handle: PathBuf::from(name),
        }
    }

    fn filled() -> (FormState, FileSelectionManager<SequentialIdentities>) {
        let mut form = FormState::default();
        let mut manager = FileSelectionManager::with_identities(SequentialIdentities::default());
        form.set_name("Ada Lovelace");
        form.set_phone("+44 20 7183 8750");
        form.set_email("ada@example.org");
        form.set_skill(Some(SkillLevel::Lead));
        form.set_agreement(true);
        manager.add_files(&mut form, [payload("cv.pdf", PDF)]);
        (form, manager)
    }

    #[test]
    fn publishing_resume_triggers_validation() {
        let mut form = FormState::default();
        let mut manager = FileSelectionManager::new();

        manager.add_files(&mut form, [payload("photo.jpg", "image/jpeg")]);
        assert_eq!(form.error(Field::Resume), Some(FieldError::UnsupportedFormat));

        let id = form.current_resume().unwrap().entries()[0].identity.clone();
        manager.remove_file(&mut form, &id);
        assert_eq!(form.error(Field::Resume), Some(FieldError::NoFiles));

        manager.add_files(&mut form, [payload("scan.png", PNG)]);
        assert_eq!(form.error(Field::Resume), None);
    }

    #[test]
    fn on_submit_mode_defers_errors_until_first_attempt() {
        let mut form = FormState::new(FormRules::default(), ValidationMode::OnSubmit);
        form.set_email("not-an-email");
        assert_eq!(form.error(Field::Email), None);

        let errors = form.submit(datetime!(2024-05-01 09:30 UTC)).unwrap_err();
        assert_eq!(errors.len(), Field::ALL.len());
        assert_eq!(errors.get(Field::Email), Some(FieldError::InvalidEmail));

        form.set_email("jane@example.com");
        assert_eq!(form.error(Field::Email), None);
    }

    #[test]
    fn submit_returns_application_when_valid() {
        let (mut form, _) = filled();
        let application = form.submit(datetime!(2024-05-01 09:30 UTC)).unwrap();

        assert_eq!(application.name, "Ada Lovelace");
        assert_eq!(application.skill, SkillLevel::Lead);
        assert_eq!(application.resume.len(), 1);
        assert_eq!(application.resume[0].id.as_str(), "file-1");
        assert_eq!(application.submitted_at, "2024-05-01T09:30:00Z");
        assert!(!form.has_errors());
    }

    #[test]
    fn submit_reports_every_invalid_field() {
        let (mut form, _) = filled();
        form.set_agreement(false);
        form.set_phone("12345");

        let errors = form.submit(datetime!(2024-05-01 09:30 UTC)).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Phone), Some(FieldError::InvalidPhone));
        assert_eq!(errors.get(Field::Agreement), Some(FieldError::AgreementRequired));
    }

    #[test]
    fn reset_clears_values_and_stale_removals_stay_noops() {
        let (mut form, manager) = filled();
        let id = form.current_resume().unwrap().entries()[0].identity.clone();

        form.reset();
        assert_eq!(form.values(), &FormValues::default());
        assert!(!form.has_errors());
        assert!(!manager.remove_file(&mut form, &id));
        assert!(form.current_resume().is_none());
    }

    #[test]
    fn text_accessors_only_cover_text_fields() {
        let mut form = FormState::default();
        form.set_text(Field::Phone, "+49 30 1234567");
        assert_eq!(form.text(Field::Phone), Some("+49 30 1234567"));
        form.set_text(Field::Skill, "ignored");
        assert_eq!(form.text(Field::Skill), None);
        assert_eq!(form.values().skill, None);
    }

    #[test]
    fn validation_mode_parses_config_spellings() {
        assert_eq!("on-submit".parse(), Ok(ValidationMode::OnSubmit));
        assert_eq!("OnChange".parse(), Ok(ValidationMode::OnChange));
        assert!("eventually".parse::<ValidationMode>().is_err());
    }
}
