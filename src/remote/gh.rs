//! [`RemoteService`] backed by the GitHub CLI.
//!
//! Every operation shells out to `gh api`, so authentication, hosts and
//! proxies are whatever `gh auth` has been configured with. Responses are
//! decoded into [`models`](super::models) records and converted to domain
//! snapshots.

use super::backend::{RemoteService, Repository};
use super::models::{
    CommentRecord, IssueRecord, LabelRecord, PullRequestRecord, RepositoryRecord,
};
use crate::domain::error::{IssueDeckError, Result};
use crate::domain::{Comment, Issue, IssueState, Label, PullRequest};
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Environment variable overriding the `gh` binary.
pub const ENV_GH_BIN: &str = "ISSUEDECK_GH_BIN";

const PAGE_SIZE: &str = "per_page=100";
const DIFF_MEDIA_TYPE: &str = "Accept: application/vnd.github.v3.diff";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs an external program and collects its output.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or does not finish
    /// in time.
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<Output>;
}

/// [`CommandRunner`] that spawns real processes, optionally with a deadline.
#[derive(Debug, Default, Clone)]
pub struct ProcessCommandRunner {
    timeout: Option<Duration>,
}

impl ProcessCommandRunner {
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<Output> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let Some(timeout) = self.timeout else {
            return command.output();
        };

        let mut child = command.spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = std::thread::spawn(move || drain(stdout));
        let stderr_reader = std::thread::spawn(move || drain(stderr));

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("`{program}` did not finish within {}s", timeout.as_secs()),
                ));
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        Ok(Output {
            status,
            stdout: stdout_reader.join().unwrap_or_default(),
            stderr: stderr_reader.join().unwrap_or_default(),
        })
    }
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buffer);
    }
    buffer
}

/// GitHub client that drives `gh api` for one repository.
pub struct GhCliClient<R: CommandRunner> {
    runner: R,
    binary: PathBuf,
    repository: String,
}

impl<R: CommandRunner> GhCliClient<R> {
    /// Creates a client for `repository` (`owner/name`).
    ///
    /// The binary is taken from [`ENV_GH_BIN`], then `binary`, then `gh`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the resolved binary path is empty.
    pub fn new(runner: R, binary: Option<&str>, repository: impl Into<String>) -> Result<Self> {
        let binary = std::env::var_os(ENV_GH_BIN)
            .map(PathBuf::from)
            .or_else(|| binary.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("gh"));
        if binary.as_os_str().is_empty() {
            return Err(IssueDeckError::Configuration(format!(
                "{ENV_GH_BIN} is set but empty. Provide a valid gh binary path or unset it."
            )));
        }

        Ok(Self {
            runner,
            binary,
            repository: repository.into(),
        })
    }

    /// `owner/name` of the repository this client targets.
    #[must_use]
    pub fn repository_name(&self) -> &str {
        &self.repository
    }

    /// Points the client at another repository, e.g. a fork's parent.
    pub fn retarget(&mut self, repository: impl Into<String>) {
        self.repository = repository.into();
    }

    fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            format!("repos/{}", self.repository)
        } else {
            format!("repos/{}/{path}", self.repository)
        }
    }

    fn get_args(endpoint: String) -> Vec<OsString> {
        vec![OsString::from("api"), OsString::from(endpoint)]
    }

    fn paginated_args(endpoint: &str) -> Vec<OsString> {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        vec![
            OsString::from("api"),
            OsString::from("--paginate"),
            OsString::from(format!("{endpoint}{separator}{PAGE_SIZE}")),
        ]
    }

    fn write_args(method: &str, endpoint: String, fields: &[(&str, &str)]) -> Vec<OsString> {
        let mut args = vec![
            OsString::from("api"),
            OsString::from("-X"),
            OsString::from(method),
            OsString::from(endpoint),
        ];
        for (key, value) in fields {
            args.push(OsString::from("-f"));
            args.push(OsString::from(format!("{key}={value}")));
        }
        args
    }

    fn run_gh_raw(&self, args: &[OsString]) -> Result<Output> {
        let program = self
            .binary
            .to_str()
            .ok_or_else(|| IssueDeckError::Configuration("Invalid gh binary path".to_owned()))?;

        let _span = tracing::debug_span!("gh", args = %Self::render_args(args)).entered();
        self.runner
            .run(program, args)
            .map_err(|error| match error.kind() {
                io::ErrorKind::NotFound => IssueDeckError::Remote(format!(
                    "GitHub CLI `{}` was not found. Install gh and authenticate with `gh auth login`.",
                    self.binary.display()
                )),
                io::ErrorKind::TimedOut => IssueDeckError::Remote(format!(
                    "GitHub CLI command timed out (`{} {}`): {error}",
                    self.binary.display(),
                    Self::render_args(args)
                )),
                _ => IssueDeckError::Remote(format!(
                    "Failed to execute GitHub CLI `{}`: {error}",
                    self.binary.display()
                )),
            })
    }

    fn run_gh(&self, args: &[OsString]) -> Result<Output> {
        let output = self.run_gh_raw(args)?;
        if output.status.success() {
            return Ok(output);
        }

        tracing::debug!(status = %output.status, "gh command failed");
        Err(self.command_failed(args, &output))
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[OsString]) -> Result<T> {
        let output = self.run_gh(args)?;
        serde_json::from_slice(&output.stdout).map_err(|error| {
            IssueDeckError::Remote(format!(
                "Unexpected response from `{}`: {error}: {}",
                Self::render_args(args),
                Self::truncate_for_error(&String::from_utf8_lossy(&output.stdout))
            ))
        })
    }

    /// Runs a paginated listing. `gh --paginate` prints one JSON array per
    /// page back to back, so the stream is decoded page by page.
    fn run_pages<T: DeserializeOwned>(&self, args: &[OsString]) -> Result<Vec<T>> {
        let output = self.run_gh(args)?;
        let mut items = Vec::new();
        for page in serde_json::Deserializer::from_slice(&output.stdout).into_iter::<Vec<T>>() {
            let page = page.map_err(|error| {
                IssueDeckError::Remote(format!(
                    "Unexpected response from `{}`: {error}",
                    Self::render_args(args)
                ))
            })?;
            items.extend(page);
        }
        Ok(items)
    }

    fn command_failed(&self, args: &[OsString], output: &Output) -> IssueDeckError {
        IssueDeckError::Remote(format!(
            "GitHub CLI command failed (`{} {}`): {}",
            self.binary.display(),
            Self::render_args(args),
            Self::truncate_for_error(&Self::command_output_detail(output))
        ))
    }

    fn render_args(args: &[OsString]) -> String {
        args.iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command_output_detail(output: &Output) -> String {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        if !stderr.is_empty() {
            return stderr;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if !stdout.is_empty() {
            return stdout;
        }

        format!("exit status {}", output.status)
    }

    fn truncate_for_error(body: &str) -> String {
        const MAX_LEN: usize = 200;
        if body.chars().count() <= MAX_LEN {
            body.to_owned()
        } else {
            format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
        }
    }

    fn set_state(&self, issue: &Issue, state: IssueState) -> Result<Issue> {
        let args = Self::write_args(
            "PATCH",
            self.endpoint(&format!("issues/{}", issue.number)),
            &[("state", state.as_str())],
        );
        self.run_json::<IssueRecord>(&args).map(Issue::from)
    }
}

impl<R: CommandRunner> RemoteService for GhCliClient<R> {
    fn repository(&self) -> Result<Repository> {
        self.run_json::<RepositoryRecord>(&Self::get_args(self.endpoint("")))
            .map(Repository::from)
    }

    fn current_user(&self) -> Result<String> {
        let args = vec![
            OsString::from("api"),
            OsString::from("user"),
            OsString::from("--jq"),
            OsString::from(".login"),
        ];
        let output = self.run_gh(&args)?;
        let login = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        if login.is_empty() {
            return Err(IssueDeckError::Remote(
                "gh did not report a logged-in user; run `gh auth login`".to_owned(),
            ));
        }
        Ok(login)
    }

    fn list_issues(&self, state: IssueState) -> Result<Vec<Issue>> {
        let endpoint = self.endpoint(&format!("issues?state={}", state.as_str()));
        let records: Vec<IssueRecord> = self.run_pages(&Self::paginated_args(&endpoint))?;
        Ok(records
            .into_iter()
            .filter(|record| !record.is_pull_request())
            .map(Issue::from)
            .collect())
    }

    fn list_pulls(&self) -> Result<Vec<PullRequest>> {
        let endpoint = self.endpoint("pulls?state=open");
        let records: Vec<PullRequestRecord> = self.run_pages(&Self::paginated_args(&endpoint))?;
        Ok(records.into_iter().map(PullRequest::from).collect())
    }

    fn get_issue(&self, number: u64) -> Result<Issue> {
        let args = Self::get_args(self.endpoint(&format!("issues/{number}")));
        self.run_json::<IssueRecord>(&args).map(Issue::from)
    }

    fn get_pull(&self, number: u64) -> Result<PullRequest> {
        let args = Self::get_args(self.endpoint(&format!("pulls/{number}")));
        self.run_json::<PullRequestRecord>(&args).map(PullRequest::from)
    }

    fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        let args = Self::write_args(
            "POST",
            self.endpoint("issues"),
            &[("title", title), ("body", body)],
        );
        self.run_json::<IssueRecord>(&args).map(Issue::from)
    }

    fn close(&self, issue: &Issue) -> Result<Issue> {
        self.set_state(issue, IssueState::Closed)
    }

    fn reopen(&self, issue: &Issue) -> Result<Issue> {
        self.set_state(issue, IssueState::Open)
    }

    fn create_comment(&self, issue: &Issue, text: &str) -> Result<Comment> {
        let args = Self::write_args(
            "POST",
            self.endpoint(&format!("issues/{}/comments", issue.number)),
            &[("body", text)],
        );
        self.run_json::<CommentRecord>(&args)
            .map(|record| record.into_comment(issue.number))
    }

    fn edit_issue(&self, issue: &Issue, title: &str, body: &str) -> Result<Issue> {
        let args = Self::write_args(
            "PATCH",
            self.endpoint(&format!("issues/{}", issue.number)),
            &[("title", title), ("body", body)],
        );
        self.run_json::<IssueRecord>(&args).map(Issue::from)
    }

    fn edit_comment(&self, comment: &Comment, text: &str) -> Result<Comment> {
        let args = Self::write_args(
            "PATCH",
            self.endpoint(&format!("issues/comments/{}", comment.id)),
            &[("body", text)],
        );
        self.run_json::<CommentRecord>(&args)
            .map(|record| record.into_comment(comment.issue_number))
    }

    fn list_labels(&self) -> Result<Vec<Label>> {
        let records: Vec<LabelRecord> =
            self.run_pages(&Self::paginated_args(&self.endpoint("labels")))?;
        Ok(records.into_iter().map(Label::from).collect())
    }

    fn diff(&self, pr: &PullRequest) -> Result<String> {
        let args = vec![
            OsString::from("api"),
            OsString::from("-H"),
            OsString::from(DIFF_MEDIA_TYPE),
            OsString::from(self.endpoint(&format!("pulls/{}", pr.number))),
        ];
        let output = self.run_gh(&args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_comments(&self, issue: &Issue) -> Result<Vec<Comment>> {
        let endpoint = self.endpoint(&format!("issues/{}/comments", issue.number));
        let records: Vec<CommentRecord> = self.run_pages(&Self::paginated_args(&endpoint))?;
        Ok(records
            .into_iter()
            .map(|record| record.into_comment(issue.number))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct StubRunner {
        calls: Mutex<Vec<(String, Vec<OsString>)>>,
        results: Mutex<VecDeque<io::Result<Output>>>,
    }

    impl StubRunner {
        fn with_results(results: Vec<io::Result<Output>>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                results: Mutex::new(VecDeque::from(results)),
            }
        }
    }

    impl CommandRunner for StubRunner {
        fn run(&self, program: &str, args: &[OsString]) -> io::Result<Output> {
            self.calls
                .lock()
                .expect("lock")
                .push((program.to_owned(), args.to_vec()));

            self.results
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "missing stubbed command output",
                    ))
                })
        }
    }

    fn output(status_code: i32, stdout: &str, stderr: &str) -> Output {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            Output {
                status: std::process::ExitStatus::from_raw(status_code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            }
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::ExitStatusExt;
            Output {
                status: std::process::ExitStatus::from_raw(status_code as u32),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            }
        }
    }

    fn client(results: Vec<io::Result<Output>>) -> GhCliClient<StubRunner> {
        GhCliClient::new(StubRunner::with_results(results), Some("gh"), "acme/widgets")
            .expect("init")
    }

    fn args_of(client: &GhCliClient<StubRunner>, index: usize) -> Vec<String> {
        client.runner.calls.lock().expect("lock")[index]
            .1
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect()
    }

    const ISSUE_JSON: &str = r#"{"number": 3, "title": "Bug", "body": "Broken", "state": "open",
        "user": {"login": "alice"}, "created_at": "2024-03-01T10:00:00Z",
        "html_url": "https://github.com/acme/widgets/issues/3"}"#;

    #[test]
    fn list_issues_paginates_and_skips_pull_requests() {
        let pages = format!(
            r#"[{ISSUE_JSON}][{{"number": 4, "title": "PR", "state": "open",
            "user": {{"login": "bob"}}, "created_at": "2024-03-01T10:00:00Z",
            "html_url": "https://github.com/acme/widgets/pull/4", "pull_request": {{}}}}]"#
        );
        let client = client(vec![Ok(output(0, &pages, ""))]);

        let issues = client.list_issues(IssueState::Open).expect("list");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 3);
        assert_eq!(
            args_of(&client, 0),
            vec![
                "api",
                "--paginate",
                "repos/acme/widgets/issues?state=open&per_page=100"
            ]
        );
    }

    #[test]
    fn close_patches_state_field() {
        let closed = ISSUE_JSON.replace(r#""state": "open""#, r#""state": "closed""#);
        let client = client(vec![Ok(output(0, &closed, ""))]);
        let issue = Issue::from(serde_json::from_str::<IssueRecord>(ISSUE_JSON).expect("parse"));

        let updated = client.close(&issue).expect("close");

        assert!(updated.is_closed());
        assert_eq!(
            args_of(&client, 0),
            vec!["api", "-X", "PATCH", "repos/acme/widgets/issues/3", "-f", "state=closed"]
        );
    }

    #[test]
    fn failed_command_surfaces_stderr_as_remote_error() {
        let client = client(vec![Ok(output(1, "", "HTTP 401: Bad credentials"))]);

        let error = client.get_issue(3).expect_err("should fail");

        assert!(error.is_remote());
        assert!(error.to_string().contains("Bad credentials"));
    }

    #[test]
    fn missing_binary_reports_install_hint() {
        let client = client(vec![Err(io::Error::new(io::ErrorKind::NotFound, "nope"))]);

        let error = client.list_labels().expect_err("should fail");

        assert!(error.to_string().contains("gh auth login"));
    }

    #[test]
    fn timeout_is_reported_as_remote_error() {
        let client = client(vec![Err(io::Error::new(io::ErrorKind::TimedOut, "slow"))]);

        let error = client.current_user().expect_err("should fail");

        assert!(error.is_remote());
        assert!(error.to_string().contains("timed out"));
    }

    #[test]
    fn diff_requests_diff_media_type() {
        let client = client(vec![Ok(output(0, "diff --git a/x b/x\n", ""))]);
        let pr = PullRequest::new(12, "Change", "alice");

        let diff = client.diff(&pr).expect("diff");

        assert!(diff.starts_with("diff --git"));
        assert_eq!(
            args_of(&client, 0),
            vec![
                "api",
                "-H",
                "Accept: application/vnd.github.v3.diff",
                "repos/acme/widgets/pulls/12"
            ]
        );
    }

    #[test]
    fn get_pull_reads_merge_and_size_fields() {
        let json = r#"{"number": 12, "title": "Change", "state": "open",
            "user": {"login": "alice"}, "created_at": "2024-03-01T10:00:00Z",
            "html_url": "https://github.com/acme/widgets/pull/12",
            "head": {"ref": "feature"}, "base": {"ref": "main"},
            "mergeable": false, "merged": false,
            "commits": 2, "additions": 15, "deletions": 4}"#;
        let client = client(vec![Ok(output(0, json, ""))]);

        let pr = client.get_pull(12).expect("pull");

        assert_eq!(pr.mergeable, Some(false));
        assert_eq!((pr.commits, pr.additions, pr.deletions), (Some(2), Some(15), Some(4)));
        assert_eq!(args_of(&client, 0), vec!["api", "repos/acme/widgets/pulls/12"]);
    }

    #[test]
    fn current_user_trims_jq_output() {
        let client = client(vec![Ok(output(0, "alice\n", ""))]);
        assert_eq!(client.current_user().expect("user"), "alice");
    }
}
