use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "Workspace automation for hireform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite through cargo nextest
    Test {
        #[arg(long)]
        profile: Option<String>,
        /// Only run tests whose name contains this filter
        filter: Option<String>,
    },
    /// Formatting, lints and tests, in the order CI runs them
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Test { profile, filter } => run_tests(profile, filter),
        Commands::Ci => {
            cargo(&["fmt", "--all", "--", "--check"])?;
            cargo(&[
                "clippy",
                "--workspace",
                "--all-targets",
                "--",
                "-D",
                "warnings",
            ])?;
            run_tests(None, None)
        }
    }
}

fn run_tests(profile: Option<String>, filter: Option<String>) -> Result<()> {
    let mut args = vec!["nextest".to_string(), "run".into(), "--workspace".into()];
    if let Some(profile) = profile {
        args.extend(["--profile".into(), profile]);
    }
    args.extend(filter);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
