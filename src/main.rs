//! Command-line entry point.
//!
//! Resolves which repository to browse, connects to the `gh` CLI and hands
//! over to the terminal runtime.
//!
//! # Startup
//!
//! 1. Load the config file and initialize tracing
//! 2. Ask `gh` for the logged-in user
//! 3. Resolve the repository from the argument or the git remotes
//! 4. Follow fork parents until a repository with an issue tracker is found
//! 5. Build the controller state and run the key loop
//!
//! # Exit Codes
//!
//! - `1`: Not inside a git repository
//! - `2`: No usable GitHub remote
//! - `3`: No `upstream` or `origin` remote
//! - `4`: No issue tracker
//! - `5`: Any other fatal error

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use issuedeck::app::ExternalEditor;
use issuedeck::infrastructure::{discover_repository, parse_repository_argument, paths, DiscoveryError};
use issuedeck::remote::{GhCliClient, ProcessCommandRunner, RemoteService, Repository};
use issuedeck::{initialize, observability, runtime, Config, IssueDeckError};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Browse and triage a repository's issues and pull requests.
#[derive(Debug, Parser)]
#[command(name = "issuedeck", version, about, disable_version_flag = true)]
struct Cli {
    /// Repository to show: `owner/name`, or `name` for one of your own.
    /// Defaults to the `upstream` or `origin` remote of the current checkout.
    #[arg(value_name = "OWNER/REPOSITORY")]
    repository: Option<String>,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("No issue tracker found for {0}")]
    NoIssueTracker(String),

    #[error(transparent)]
    Fatal(#[from] IssueDeckError),
}

impl StartupError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Discovery(e) => e.exit_code(),
            Self::NoIssueTracker(_) => 4,
            Self::Fatal(_) => 5,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load(&paths::config_file());
    observability::init_tracing(&config);

    match start(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.exit_code(), "exiting");
            eprintln!("issuedeck: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn start(cli: &Cli, config: &Config) -> Result<(), StartupError> {
    let runner = ProcessCommandRunner::with_timeout(Duration::from_secs(config.remote_timeout_secs));
    let mut client = GhCliClient::new(runner, config.gh_binary.as_deref(), String::new())?;
    let user = client.current_user()?;

    let (owner, name) = match cli.repository.as_deref() {
        Some(argument) => parse_repository_argument(argument, &user).ok_or_else(|| {
            IssueDeckError::Configuration(format!("Expected `owner/repository`, got `{argument}`"))
        })?,
        None => discover_repository(&std::env::current_dir().map_err(IssueDeckError::from)?)?,
    };

    client.retarget(format!("{owner}/{name}"));
    let repository = find_issue_tracker(&mut client)?;
    tracing::info!(repository = %repository.full_name(), %user, "loading");

    let remote: Arc<dyn RemoteService> = Arc::new(client);
    let mut state = initialize(config, remote, repository, &user)?;
    let mut editor = ExternalEditor::new(config.editor.as_deref());
    runtime::run(&mut state, &mut editor)?;
    Ok(())
}

/// Walks up the fork chain until a repository has issues enabled.
fn find_issue_tracker(client: &mut GhCliClient<ProcessCommandRunner>) -> Result<Repository, StartupError> {
    let mut repository = client.repository()?;
    while !repository.has_issues {
        let Some(parent) = repository.parent.clone() else {
            return Err(StartupError::NoIssueTracker(repository.full_name()));
        };
        tracing::debug!(fork = %repository.full_name(), %parent, "issues disabled, trying fork parent");
        client.retarget(parent);
        repository = client.repository()?;
    }
    Ok(repository)
}
