//! Command line entry points.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use time::OffsetDateTime;

use crate::app::form::FormState;
use crate::app::receipt::{ReceiptFormat, ReceiptRenderer};
use crate::app::selection::FileSelectionManager;
use crate::app::surface::SelectionSurface;
use crate::app::validation::FormRules;
use crate::domain::model::SkillLevel;
use crate::infra::config::Config;
use crate::ui::app::UiApp;

#[derive(Debug, Parser)]
#[command(name = "hireform", author, version, about = "Apply for a position from the terminal")]
pub struct Cli {
    /// Additional config file layered on top of the global and workspace files.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in and submit the application without the interactive form.
    Submit(SubmitArgs),
    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, clap::Args)]
pub struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, value_enum)]
    pub skill: Option<SkillLevel>,
    /// Resume files, directories or glob patterns. Repeatable.
    #[arg(long = "resume", value_name = "PATH")]
    pub resume: Vec<PathBuf>,
    /// Agree to the data collection terms.
    #[arg(long)]
    pub agree: bool,
    #[arg(long, value_enum, default_value_t)]
    pub format: ReceiptFormat,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        None => {
            let config = Config::load(cli.config.as_deref())?;
            let submitted = UiApp::new(config)?.run()?;
            if let Some(application) = submitted {
                let receipt = ReceiptRenderer::new()?.render(&application, ReceiptFormat::Json)?;
                println!("{receipt}");
            }
            Ok(())
        }
        Some(Command::Submit(args)) => {
            let config = Config::load(cli.config.as_deref())?;
            let receipt = submit(&config, args)?;
            println!("{receipt}");
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "hireform", &mut io::stdout());
            Ok(())
        }
    }
}

/// Fill a fresh form from `args`, submit it and render the receipt.
pub fn submit(config: &Config, args: SubmitArgs) -> Result<String> {
    let rules = FormRules::from_config(config);
    let surface = SelectionSurface::new(rules.clone());
    let mut form = FormState::new(rules, config.form.validation());
    let mut manager = FileSelectionManager::new();

    form.set_name(args.name);
    form.set_phone(args.phone);
    form.set_email(args.email);
    form.set_skill(args.skill);
    form.set_agreement(args.agree);
    if !args.resume.is_empty() {
        let batch = surface
            .pick(&args.resume)
            .context("failed to collect resume files")?;
        manager.add_files(&mut form, batch);
    }

    match form.submit(OffsetDateTime::now_utc()) {
        Ok(application) => ReceiptRenderer::new()?.render(&application, args.format),
        Err(errors) => {
            for (field, error) in errors.iter() {
                eprintln!("{field}: {error}");
            }
            anyhow::bail!("application rejected: {} field(s) invalid", errors.len())
        }
    }
}
