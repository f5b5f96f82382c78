//! Detail view renderer: an issue or pull request followed by its comments.

use crate::ui::helpers::{position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DetailLine, DetailLineKind};

/// Renders detail lines from `row` on, one terminal row each.
///
/// Lines of the focused entry get a `▌` gutter marker in the selection color.
///
/// # Returns
///
/// The next available row position.
pub fn render_detail_lines(row: usize, lines: &[DetailLine], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for line in lines {
        current_row = render_detail_line(current_row, line, theme, cols);
    }
    current_row
}

fn render_detail_line(row: usize, line: &DetailLine, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    if line.is_focused {
        print!("{}▌ ", Theme::fg(&theme.colors.selection_bg));
    } else {
        print!("  ");
    }

    let style = match line.kind {
        DetailLineKind::Title => format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg)),
        DetailLineKind::Meta => Theme::fg(&theme.colors.text_dim),
        DetailLineKind::Labels => Theme::fg(&theme.colors.label_fg),
        DetailLineKind::CommentHeader => format!("{}{}", Theme::bold(), Theme::fg(&theme.colors.text_normal)),
        DetailLineKind::Body | DetailLineKind::CommentBody | DetailLineKind::Blank => {
            Theme::fg(&theme.colors.text_normal)
        }
    };
    print!("{}", Theme::reset());
    print!("{style}");

    let text = truncate(&line.text, cols.saturating_sub(2));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(2 + visual_len(&text))));
    print!("{}", Theme::reset());
    row + 1
}
