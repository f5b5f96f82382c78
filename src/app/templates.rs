//! Editor buffer templates and parsing of what comes back.

use crate::domain::{time_since_now, Comment, Issue};
use regex::Regex;
use std::sync::LazyLock;

/// Seed text for a new issue.
pub const NEW_ISSUE_TEMPLATE: &str = "\n<!---\nThe first line will be used as the issue title. The rest will be the body of\nthe issue.\n-->\n";

const INDENTATION: &str = "    ";

// Non-greedy so two blocks don't swallow the text between them.
static COMMENT_BLOCK: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"(?s)<!--.*?-->") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

/// Removes every `<!-- ... -->` block, multi-line included, and trims the
/// surrounding whitespace.
///
/// # Example
///
/// ```rust
/// use issuedeck::app::templates::strip_comments;
///
/// assert_eq!(strip_comments("<!-- hidden --> Visible line"), "Visible line");
/// assert_eq!(strip_comments("a <!--\nb\n--> c"), "a  c");
/// ```
#[must_use]
pub fn strip_comments(text: &str) -> String {
    COMMENT_BLOCK.replace_all(text.trim(), "").trim().to_string()
}

/// Splits editor output into a title (first line) and a body (the rest).
///
/// Both parts are trimmed. The title may come back empty, which callers treat
/// as an aborted edit.
///
/// # Example
///
/// ```rust
/// use issuedeck::app::templates::parse_title_and_body;
///
/// let (title, body) = parse_title_and_body("Fix bug\n\nSteps to reproduce");
/// assert_eq!(title, "Fix bug");
/// assert_eq!(body, "Steps to reproduce");
/// ```
#[must_use]
pub fn parse_title_and_body(text: &str) -> (String, String) {
    let (title, body) = text.split_once('\n').unwrap_or((text, ""));
    (title.trim().to_string(), body.trim().to_string())
}

/// Seed text for editing an issue: title on the first line, body below.
#[must_use]
pub fn format_issue_for_edit(issue: &Issue) -> String {
    format!("{}\n{}", issue.title, issue.body)
}

/// Renders an issue and its comments as one HTML comment block.
///
/// Used to seed the editor when commenting, so the thread is visible while
/// writing but stripped from what gets submitted.
#[must_use]
pub fn format_issue_thread(issue: &Issue, comments: &[Comment]) -> String {
    let mut thread = Vec::with_capacity(comments.len() + 3);
    thread.push("<!---\n".to_string());
    thread.push(format!("{}\n\n{}\n\n", issue.title, issue.body));
    thread.extend(comments.iter().map(format_comment));
    thread.push("-->".to_string());
    thread.join("\n")
}

fn format_comment(comment: &Comment) -> String {
    let body = comment
        .body
        .lines()
        .map(|line| format!("{INDENTATION}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{} commented {}\n\n{body}\n",
        comment.author,
        time_since_now(comment.created_at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_issue_template_strips_to_nothing() {
        assert_eq!(strip_comments(NEW_ISSUE_TEMPLATE), "");
    }

    #[test]
    fn title_only_input_has_empty_body() {
        assert_eq!(parse_title_and_body("Just a title"), ("Just a title".into(), String::new()));
        assert_eq!(parse_title_and_body(""), (String::new(), String::new()));
    }

    #[test]
    fn thread_is_a_single_comment_block() {
        let issue = Issue::new(3, "Crash", "bob").with_body("It crashes");
        let comment = Comment {
            id: 1,
            author: "carol".into(),
            body: "Same here\nOn Linux".into(),
            created_at: Utc::now(),
            html_url: String::new(),
            issue_number: 3,
        };

        let thread = format_issue_thread(&issue, &[comment]);

        assert!(thread.starts_with("<!---\n"));
        assert!(thread.ends_with("-->"));
        assert!(thread.contains("carol commented"));
        assert!(thread.contains("    Same here\n    On Linux"));
        assert_eq!(strip_comments(&thread), "");
    }

    #[test]
    fn text_typed_around_the_thread_survives() {
        let issue = Issue::new(3, "Crash", "bob");
        let seeded = format!("Looks fixed now\n{}", format_issue_thread(&issue, &[]));
        assert_eq!(strip_comments(&seeded), "Looks fixed now");
    }
}
