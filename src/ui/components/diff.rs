//! Diff view renderer.

use crate::ui::helpers::{position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DiffLine, DiffLineKind};

/// Renders unified diff lines from `row` on, colored by kind.
///
/// # Returns
///
/// The next available row position.
pub fn render_diff_lines(row: usize, lines: &[DiffLine], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for line in lines {
        let color = match line.kind {
            DiffLineKind::Hunk => &theme.colors.diff_hunk,
            DiffLineKind::Added => &theme.colors.diff_add,
            DiffLineKind::Removed => &theme.colors.diff_remove,
            DiffLineKind::Plain => &theme.colors.text_normal,
        };

        let text = truncate(&line.text.replace('\t', "    "), cols);
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(color));
        print!("{text}");
        print!("{}", " ".repeat(cols.saturating_sub(visual_len(&text))));
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}
