//! Output pane rendering

use crate::snapshot::OutputBuffer;
use crate::ui::panes::utils::{pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the text printed so far
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &OutputBuffer,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);
    let lines = output.get_output();

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let items: Vec<ListItem> = lines
        .into_iter()
        .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    let visible = visible_window(items, area.height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}
