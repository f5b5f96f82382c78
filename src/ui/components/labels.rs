//! Label picker renderer.

use crate::ui::helpers::{position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::LabelPickerInfo;

/// Renders the label picker as a checklist starting at `row`.
///
/// ```text
/// [x] bug
/// [ ] docs
/// ```
///
/// # Returns
///
/// The next available row position.
pub fn render_label_picker(row: usize, picker: &LabelPickerInfo, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    if picker.entries.is_empty() {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("  This repository has no labels");
        print!("{}", Theme::reset());
        return current_row + 1;
    }

    for entry in &picker.entries {
        position_cursor(current_row, 1);
        if entry.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.label_fg));
        }

        let mark = if entry.is_checked { 'x' } else { ' ' };
        let text = truncate(&format!("  [{mark}] {}", entry.name), cols);
        print!("{text}");
        print!("{}", " ".repeat(cols.saturating_sub(visual_len(&text))));
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}
