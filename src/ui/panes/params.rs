//! Parameter stack pane rendering

use crate::memory::stack::ParamStack;
use crate::ui::panes::utils::{format_value_styled, pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the parameter stack, top of stack first
pub fn render_params_pane(
    frame: &mut Frame,
    area: Rect,
    params: &ParamStack,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Params ({}) ", params.depth());
    let block = pane_block(&title, is_focused);

    if params.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = params
        .values()
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, value)| {
            let label = if depth == 0 {
                Span::styled(
                    " top ",
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    format!("{:>4} ", depth),
                    Style::default().fg(DEFAULT_THEME.comment),
                )
            };
            ListItem::new(Line::from(vec![label, format_value_styled(value)]))
        })
        .collect();

    let visible = visible_window(items, area.height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}
