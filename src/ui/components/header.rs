//! Header bar: the view title centered, the repository at the left edge.

use crate::ui::helpers::{position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header bar at `row` and returns the next row.
///
/// The title is centered over the full width. The repository name is drawn
/// dimmed in the left margin only if it fits there without touching the
/// title; narrow terminals show the title alone, truncated if needed.
///
/// ```text
/// acme/widgets          Open Issues (12) · created by you
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title = truncate(&header.title, cols);
    let title_len = visual_len(&title);
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    let repository = format!(" {}", header.repository);
    let repository_len = visual_len(&repository);
    if !header.repository.is_empty() && repository_len < padding {
        print!("{}{repository}{}", Theme::dim(), Theme::reset());
        print!("{}", Theme::fg(&theme.colors.header_fg));
        if let Some(bg) = &theme.colors.header_bg {
            print!("{}", Theme::bg(bg));
        }
        print!("{}", " ".repeat(padding - repository_len));
    } else {
        print!("{}", " ".repeat(padding));
    }

    print!("{}{title}", Theme::bold());
    print!("{}", " ".repeat(cols.saturating_sub(padding + title_len)));
    print!("{}", Theme::reset());
    row + 1
}
