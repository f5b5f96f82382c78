//! Opening web pages in the platform's default browser.

use crate::domain::error::{IssueDeckError, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Program and leading arguments that open a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOpenCommand {
    pub program: PathBuf,
    pub prefix_args: Vec<OsString>,
}

impl UrlOpenCommand {
    /// Opener for the platform named by `target_os` (`std::env::consts::OS`).
    ///
    /// # Errors
    ///
    /// Returns a configuration error on platforms without a known opener.
    pub fn for_os(target_os: &str) -> Result<Self> {
        match target_os {
            "macos" => Ok(Self {
                program: PathBuf::from("open"),
                prefix_args: Vec::new(),
            }),
            "linux" | "freebsd" | "openbsd" | "netbsd" => Ok(Self {
                program: PathBuf::from("xdg-open"),
                prefix_args: Vec::new(),
            }),
            "windows" => Ok(Self {
                program: PathBuf::from("cmd"),
                prefix_args: vec![OsString::from("/C"), OsString::from("start"), OsString::from("")],
            }),
            _ => Err(IssueDeckError::Configuration(format!(
                "Opening URLs is unsupported on `{target_os}`"
            ))),
        }
    }

    fn args_for(&self, url: &str) -> Vec<OsString> {
        let mut args = self.prefix_args.clone();
        args.push(OsString::from(url));
        args
    }
}

/// Opens `url` in the default browser without waiting for it.
///
/// # Errors
///
/// Returns a configuration error for an empty URL or unsupported platform,
/// and an I/O error if the opener cannot be spawned.
pub fn open_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(IssueDeckError::Configuration("URL must be a non-empty string".to_string()));
    }

    let command = UrlOpenCommand::for_os(std::env::consts::OS)?;
    tracing::debug!(%url, program = %command.program.display(), "opening url");
    Command::new(&command.program)
        .args(command.args_for(url))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
