//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::form::ValidationMode;
use crate::app::validation::DEFAULT_ACCEPTED_TYPES;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".hireform/config.toml";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub keybindings: Keybindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default = "FormSettings::default_title")]
    pub title: String,
    #[serde(default = "FormSettings::default_description")]
    pub description: String,
    #[serde(default = "FormSettings::default_upload_label")]
    pub upload_label: String,
    #[serde(default = "FormSettings::default_upload_hint")]
    pub upload_hint: String,
    #[serde(default = "FormSettings::default_accepted_types")]
    pub accepted_types: Vec<String>,
    #[serde(default)]
    validation: Option<ValidationMode>,
}

impl FormSettings {
    fn default_title() -> String {
        "Drop us a line".into()
    }

    fn default_description() -> String {
        "Our documentary campaigns feature leading figures, organisations and leaders, in open \
         and candid discussions."
            .into()
    }

    fn default_upload_label() -> String {
        "Dokument hochladen".into()
    }

    fn default_upload_hint() -> String {
        "Klicken Sie auf die Schaltfläche oder ziehen Sie ein Dokument im PDF-, DOCX-, PNG.".into()
    }

    fn default_accepted_types() -> Vec<String> {
        DEFAULT_ACCEPTED_TYPES.iter().map(|ty| ty.to_string()).collect()
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation.unwrap_or_default()
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            description: Self::default_description(),
            upload_label: Self::default_upload_label(),
            upload_hint: Self::default_upload_hint(),
            accepted_types: Self::default_accepted_types(),
            validation: Some(ValidationMode::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybindings {
    #[serde(default = "Keybindings::default_next_field")]
    pub next_field: String,
    #[serde(default = "Keybindings::default_prev_field")]
    pub prev_field: String,
    #[serde(default = "Keybindings::default_submit")]
    pub submit: String,
    #[serde(default = "Keybindings::default_reset")]
    pub reset: String,
    #[serde(default = "Keybindings::default_remove_file")]
    pub remove_file: String,
}

impl Keybindings {
    fn default_next_field() -> String {
        "tab".into()
    }

    fn default_prev_field() -> String {
        "backtab".into()
    }

    fn default_submit() -> String {
        "ctrl+s".into()
    }

    fn default_reset() -> String {
        "ctrl+r".into()
    }

    fn default_remove_file() -> String {
        "delete".into()
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            next_field: Self::default_next_field(),
            prev_field: Self::default_prev_field(),
            submit: Self::default_submit(),
            reset: Self::default_reset(),
            remove_file: Self::default_remove_file(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    validation: Option<String>,
    accepted_types: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            validation: env::var("HIREFORM_VALIDATION").ok(),
            accepted_types: env::var("HIREFORM_ACCEPTED_TYPES").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(validation: &str, accepted_types: &str) -> Self {
        Self {
            validation: Some(validation.to_owned()),
            accepted_types: Some(accepted_types.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, an optional
    /// explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        if let Some(path) = explicit
            && !path.exists()
        {
            anyhow::bail!("config file not found: {}", path.display());
        }
        Self::load_with_layers(global, workspace, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        for path in [global, workspace, explicit].into_iter().flatten() {
            if path.exists() {
                layers.push(Self::from_file(&path)?);
            }
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data).with_context(|| format!("in config file {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            form: merge_form(self.form, other.form),
            keybindings: merge_keybindings(self.keybindings, other.keybindings),
        }
    }
}

fn merge_form(base: FormSettings, overlay: FormSettings) -> FormSettings {
    FormSettings {
        title: choose(base.title, overlay.title, FormSettings::default_title),
        description: choose(
            base.description,
            overlay.description,
            FormSettings::default_description,
        ),
        upload_label: choose(
            base.upload_label,
            overlay.upload_label,
            FormSettings::default_upload_label,
        ),
        upload_hint: choose(
            base.upload_hint,
            overlay.upload_hint,
            FormSettings::default_upload_hint,
        ),
        accepted_types: choose(
            base.accepted_types,
            overlay.accepted_types,
            FormSettings::default_accepted_types,
        ),
        validation: overlay.validation.or(base.validation),
    }
}

fn merge_keybindings(base: Keybindings, overlay: Keybindings) -> Keybindings {
    Keybindings {
        next_field: choose(
            base.next_field,
            overlay.next_field,
            Keybindings::default_next_field,
        ),
        prev_field: choose(
            base.prev_field,
            overlay.prev_field,
            Keybindings::default_prev_field,
        ),
        submit: choose(base.submit, overlay.submit, Keybindings::default_submit),
        reset: choose(base.reset, overlay.reset, Keybindings::default_reset),
        remove_file: choose(
            base.remove_file,
            overlay.remove_file,
            Keybindings::default_remove_file,
        ),
    }
}

/// Overlay values only win when they differ from the built-in default.
fn choose<T: PartialEq>(base: T, overlay: T, default_fn: fn() -> T) -> T {
    if overlay != default_fn() { overlay } else { base }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("hireform/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(validation) = env.validation {
        let mode = validation
            .parse::<ValidationMode>()
            .map_err(anyhow::Error::msg)
            .context("invalid HIREFORM_VALIDATION")?;
        config.form.validation = Some(mode);
    }
    if let Some(types) = env.accepted_types {
        config.form.accepted_types = types
            .split(',')
            .map(str::trim)
            .filter(|ty| !ty.is_empty())
            .map(str::to_owned)
            .collect();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.form.title, "Drop us a line");
        assert_eq!(config.form.accepted_types.len(), 3);
        assert_eq!(config.form.validation(), ValidationMode::OnChange);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn merge_global_workspace_and_explicit() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[form]
title = "Join the crew"
[keybindings]
submit = "ctrl+enter"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".hireform"))?;
        fs::write(
            workspace_dir.join(".hireform/config.toml"),
            r#"
[form]
accepted_types = ["application/pdf"]
validation = "on-submit"
"#,
        )?;

        let explicit = temp.path().join("explicit.toml");
        fs::write(
            &explicit,
            r#"
[keybindings]
remove_file = "x"
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".hireform/config.toml")),
            Some(explicit),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.form.title, "Join the crew");
        assert_eq!(config.form.accepted_types, ["application/pdf"]);
        assert_eq!(config.form.validation(), ValidationMode::OnSubmit);
        assert_eq!(config.keybindings.submit, "ctrl+enter");
        assert_eq!(config.keybindings.remove_file, "x");
        assert_eq!(config.keybindings.next_field, "tab");

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("on-submit", "application/pdf, image/jpeg");
        let config = Config::load_with_layers(None, None, None, overrides)?;
        assert_eq!(config.form.validation(), ValidationMode::OnSubmit);
        assert_eq!(config.form.accepted_types, ["application/pdf", "image/jpeg"]);
        Ok(())
    }

    #[test]
    fn invalid_env_validation_is_an_error() {
        let overrides = EnvOverrides::for_tests("sometimes", "application/pdf");
        assert!(Config::load_with_layers(None, None, None, overrides).is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
