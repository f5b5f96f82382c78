//! Composable UI component renderers.
//!
//! Each component renders one part of the interface at a given row and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Centered title bar
//! - [`footer`]: Keybinding hints
//! - [`search`]: Title search box
//! - [`table`]: Issue/pull request list with NUMBER, STATE, TITLE, AUTHOR, LABELS
//! - [`empty`]: Message for an empty list
//! - [`labels`]: Label picker checklist
//! - [`detail`]: Issue or pull request with comments
//! - [`diff`]: Colored unified diff
//! - [`notice`]: Error line
//!
//! # Layouts
//!
//! - [`render_list_mode`]: Header + (`SearchBar`) + Table or picker + Footer
//! - [`render_detail_mode`]: Header + detail lines + Footer
//! - [`render_diff_mode`]: Header + diff lines + Footer

mod detail;
mod diff;
mod empty;
mod footer;
mod header;
mod labels;
mod notice;
mod search;
mod table;

pub use table::{title_width, AUTHOR_WIDTH, LABELS_WIDTH, NUMBER_WIDTH, STATE_WIDTH};

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DetailViewModel, DiffViewModel, FooterInfo, NoticeInfo, UIViewModel};

use detail::render_detail_lines;
use diff::render_diff_lines;
use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use labels::render_label_picker;
use notice::render_notice;
use search::render_search_bar;
use table::{render_table_headers, render_table_rows};

/// Rows taken by list chrome: blank, header, border, column headers, notice,
/// border, footer and the blank last row.
pub const LIST_CHROME_ROWS: usize = 8;
/// List chrome plus the 3-line search box.
pub const SEARCH_CHROME_ROWS: usize = LIST_CHROME_ROWS + 3;
/// Rows taken by detail and diff chrome: blank, header, border, notice,
/// border, footer and the blank last row.
pub const PAGE_CHROME_ROWS: usize = 7;

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the bottom chrome shared by every layout.
///
/// ```text
/// [Notice]
/// [Border]
/// [Footer]
/// ```
fn render_bottom(footer: &FooterInfo, notice: Option<&NoticeInfo>, theme: &Theme, cols: usize, rows: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    if let Some(notice) = notice {
        render_notice(border_row.saturating_sub(1), notice, theme, cols);
    }
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, footer, theme, cols);
}

/// Renders the list layout.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Search Bar - 3 lines, search mode only]
/// [Table Headers]
/// [Table Rows | Label Picker | Empty State]
/// [Notice]
/// [Border]
/// [Footer]
/// ```
pub fn render_list_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    if let Some(picker) = &vm.label_picker {
        render_label_picker(current_row + 1, picker, theme, cols);
    } else if let Some(empty) = &vm.empty_state {
        render_empty_state(current_row + 2, empty, theme, cols);
    } else {
        current_row = render_table_headers(current_row, theme, cols);
        render_table_rows(current_row, &vm.display_items, theme, cols);
    }

    render_bottom(&vm.footer, vm.notice.as_ref(), theme, cols, rows);
}

/// Renders the issue/pull request detail layout.
pub fn render_detail_mode(vm: &DetailViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    render_detail_lines(current_row, &vm.lines, theme, cols);

    render_bottom(&vm.footer, vm.notice.as_ref(), theme, cols, rows);
}

/// Renders the pull request diff layout.
pub fn render_diff_mode(vm: &DiffViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    render_diff_lines(current_row, &vm.lines, theme, cols);

    render_bottom(&vm.footer, vm.notice.as_ref(), theme, cols, rows);
}
