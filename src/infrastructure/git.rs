//! Repository discovery from the local git checkout.
//!
//! When no repository is given on the command line, the GitHub remotes of
//! the working directory are listed with `git remote -v` and the `upstream`
//! remote is preferred over `origin`.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches `git://`, `http(s)://`, `ssh://` and scp-style remote URLs.
static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"^(?:(?:git|https?|ssh)://(?:[^@/]+@)?[^/]+/|[^@\s]+@[^:\s]+:)(?P<owner>[^/\s]+)/(?P<repo>[^/\s]+?)(?:\.git)?/?$",
    ) {
        Ok(regex) => regex,
        Err(_) => unreachable!("remote url pattern is valid"),
    }
});

/// Why no repository could be derived from the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("Not inside a git repository")]
    NotInRepository,

    #[error("No GitHub remote found")]
    NoGithubRemote,

    #[error("No `upstream` or `origin` remote found")]
    NoOriginRemote,

    #[error("Unrecognized remote URL: {0}")]
    UnrecognizedUrl(String),
}

impl DiscoveryError {
    /// Process exit code reported for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotInRepository => 1,
            Self::NoGithubRemote | Self::UnrecognizedUrl(_) => 2,
            Self::NoOriginRemote => 3,
        }
    }
}

/// GitHub remotes of the checkout at `cwd`, by remote name.
///
/// # Returns
///
/// `None` when `git remote -v` fails, i.e. `cwd` is not inside a checkout.
#[must_use]
pub fn get_remotes(cwd: &Path) -> Option<BTreeMap<String, String>> {
    let output = Command::new("git")
        .args(["remote", "-v"])
        .current_dir(cwd)
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!(status = %output.status, "git remote -v failed");
        return None;
    }
    Some(parse_remotes(&String::from_utf8_lossy(&output.stdout)))
}

/// Parses `git remote -v` output, keeping lines that mention GitHub.
///
/// # Example
///
/// ```rust
/// use issuedeck::infrastructure::git::parse_remotes;
///
/// let remotes = parse_remotes(
///     "origin\tgit@github.com:acme/widgets.git (fetch)\n\
///      mirror\thttps://gitlab.com/acme/widgets.git (fetch)\n",
/// );
/// assert_eq!(remotes.len(), 1);
/// assert_eq!(remotes["origin"], "git@github.com:acme/widgets.git");
/// ```
#[must_use]
pub fn parse_remotes(output: &str) -> BTreeMap<String, String> {
    output
        .lines()
        .filter(|line| line.to_lowercase().contains("github"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let url = fields.next()?;
            Some((name.to_string(), url.to_string()))
        })
        .collect()
}

/// Splits a remote URL into `(owner, repository)`.
///
/// A trailing `.git` is dropped.
///
/// # Example
///
/// ```rust
/// use issuedeck::infrastructure::git::extract_owner_and_repo;
///
/// assert_eq!(
///     extract_owner_and_repo("https://github.com/acme/widgets.git"),
///     Some(("acme".to_string(), "widgets".to_string()))
/// );
/// ```
#[must_use]
pub fn extract_owner_and_repo(url: &str) -> Option<(String, String)> {
    let captures = REMOTE_URL.captures(url.trim())?;
    Some((captures["owner"].to_string(), captures["repo"].to_string()))
}

/// Splits a command-line repository argument into `(owner, name)`.
///
/// A bare `name` refers to a repository of `user`. Blank or malformed
/// arguments give `None`.
///
/// # Example
///
/// ```rust
/// use issuedeck::infrastructure::git::parse_repository_argument;
///
/// let own = parse_repository_argument("dotfiles", "alice");
/// assert_eq!(own, Some(("alice".to_string(), "dotfiles".to_string())));
/// assert_eq!(parse_repository_argument("acme/", "alice"), None);
/// ```
#[must_use]
pub fn parse_repository_argument(argument: &str, user: &str) -> Option<(String, String)> {
    let argument = argument.trim();
    if argument.is_empty() {
        return None;
    }
    match argument.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Some((owner.to_string(), name.to_string()))
        }
        Some(_) => None,
        None => Some((user.to_string(), argument.to_string())),
    }
}

/// Resolves `owner/name` from the remotes of the checkout at `cwd`.
///
/// # Errors
///
/// Returns the [`DiscoveryError`] matching the first missing piece.
pub fn discover_repository(cwd: &Path) -> Result<(String, String), DiscoveryError> {
    let remotes = get_remotes(cwd).ok_or(DiscoveryError::NotInRepository)?;
    select_remote(&remotes)
}

fn select_remote(remotes: &BTreeMap<String, String>) -> Result<(String, String), DiscoveryError> {
    if remotes.is_empty() {
        return Err(DiscoveryError::NoGithubRemote);
    }
    let url = remotes
        .get("upstream")
        .or_else(|| remotes.get("origin"))
        .ok_or(DiscoveryError::NoOriginRemote)?;
    tracing::debug!(%url, "using git remote");
    extract_owner_and_repo(url).ok_or_else(|| DiscoveryError::UnrecognizedUrl(url.clone()))
}
