//! Shared rendering utilities and helpers.
//!
//! Low-level helpers used across UI components: cursor positioning, width-safe
//! truncation and fuzzy match highlighting with proper ANSI reset handling.
//! Text handling operates on character indices, not byte indices.

use crate::ui::theme::Theme;

/// Positions the cursor at a specific row and column.
///
/// Uses ANSI escape sequence `\u{1b}[{row};{col}H`. Coordinates are 1-indexed.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Truncates `text` to at most `width` characters, ending in `...` when cut.
///
/// # Example
///
/// ```rust
/// use issuedeck::ui::helpers::truncate;
///
/// assert_eq!(truncate("short", 10), "short");
/// assert_eq!(truncate("a rather long title", 10), "a rathe...");
/// ```
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(&".".repeat(width.min(3)));
    truncated
}

/// Number of characters in `text`, for padding calculations.
#[must_use]
pub fn visual_len(text: &str) -> usize {
    text.chars().count()
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// # Parameters
///
/// * `text` - The text to render
/// * `ranges` - Character index ranges to highlight `(start, end)` (inclusive start, exclusive end)
/// * `theme` - Active color theme for highlight colors
/// * `is_selected` - Whether the row is selected (disables match highlighting)
///
/// # Selection Behavior
///
/// When `is_selected` is `true`, match highlighting is disabled to avoid
/// conflicting with selection background colors.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() || is_selected {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start.max(current_pos)..end.max(current_pos)].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        print!("{}", Theme::fg(&theme.colors.text_normal));

        current_pos = end.max(current_pos);
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
