use crate::ui::helpers::{position_cursor, truncate, visual_len};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::NoticeInfo;

/// Renders an error notice on a single row.
pub fn render_notice(row: usize, notice: &NoticeInfo, theme: &Theme, cols: usize) -> usize {
    let text = truncate(&format!(" {}", notice.message), cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.notice_fg));
    print!("{text}");
    print!("{}", " ".repeat(cols.saturating_sub(visual_len(&text))));
    print!("{}", Theme::reset());
    row + 1
}
