//! Table component renderer.
//!
//! This module renders the issue/pull request list as a table with NUMBER,
//! STATE, TITLE, AUTHOR and LABELS columns. It supports selection
//! highlighting and fuzzy match highlighting of titles.

use crate::ui::helpers::{self, position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DisplayItem;

/// Width of the `#123` column.
pub const NUMBER_WIDTH: usize = 8;
/// Width of the `Open`/`Closed` column.
pub const STATE_WIDTH: usize = 8;
/// Width of the author column.
pub const AUTHOR_WIDTH: usize = 16;
/// Width of the labels column.
pub const LABELS_WIDTH: usize = 24;

/// Width left for titles on a terminal `cols` wide.
///
/// # Example
///
/// ```rust
/// use issuedeck::ui::components::title_width;
///
/// assert_eq!(title_width(100), 44);
/// assert_eq!(title_width(20), 10);
/// ```
#[must_use]
pub fn title_width(cols: usize) -> usize {
    cols.saturating_sub(NUMBER_WIDTH + STATE_WIDTH + AUTHOR_WIDTH + LABELS_WIDTH)
        .max(10)
}

/// Renders the table column headers at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(row: usize, theme: &Theme, cols: usize) -> usize {
    let title_width = title_width(cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!(
        "{:<NUMBER_WIDTH$}{:<STATE_WIDTH$}{:<title_width$}{:<AUTHOR_WIDTH$}{}",
        "NUMBER", "STATE", "TITLE", "AUTHOR", "LABELS"
    );
    print!("{}", Theme::reset());
    row + 1
}

/// Renders all table rows starting at the specified row.
///
/// # Returns
///
/// The next available row position (row + number of items)
pub fn render_table_rows(row: usize, items: &[DisplayItem], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in items {
        current_row = render_table_row(current_row, item, theme, cols);
    }
    current_row
}

/// Renders a single table row at the specified row position.
///
/// # Styling Precedence
///
/// 1. Selection background (if `is_selected`)
/// 2. State and label colors, fuzzy match highlights (unless selected)
/// 3. Normal text color
///
/// The row is padded to fill the entire terminal width to ensure consistent
/// selection background rendering.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let title_width = title_width(cols);
    let base = if item.is_selected {
        format!(
            "{}{}",
            Theme::fg(&theme.colors.selection_fg),
            Theme::bg(&theme.colors.selection_bg)
        )
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    position_cursor(row, 1);
    print!("{base}");
    print!("{:<NUMBER_WIDTH$}", item.number);

    if !item.is_selected {
        let state_color = if item.is_open {
            &theme.colors.open_fg
        } else {
            &theme.colors.closed_fg
        };
        print!("{}", Theme::fg(state_color));
    }
    print!("{:<STATE_WIDTH$}", item.state);
    print!("{base}");

    helpers::render_highlighted_text(&item.title, &item.highlight_ranges, theme, item.is_selected);
    print!("{}", " ".repeat(title_width.saturating_sub(visual_len(&item.title))));

    print!("{:<AUTHOR_WIDTH$}", truncate(&item.author, AUTHOR_WIDTH - 1));

    let labels = truncate(&item.labels, cols.saturating_sub(NUMBER_WIDTH + STATE_WIDTH + title_width + AUTHOR_WIDTH));
    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.label_fg));
    }
    print!("{labels}");
    print!("{base}");

    let line_len = NUMBER_WIDTH + STATE_WIDTH + title_width + AUTHOR_WIDTH + visual_len(&labels);
    print!("{}", " ".repeat(cols.saturating_sub(line_len)));

    print!("{}", Theme::reset());
    row + 1
}
