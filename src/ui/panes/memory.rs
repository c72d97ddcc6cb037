//! Memory pane rendering
//!
//! Shows every initialized cell, grouped by scope sector and then by data type,
//! with addresses in ascending order. Empty groups are omitted.

use crate::memory::store::MemoryStore;
use crate::memory::{DataType, ScopeSector};
use crate::ui::panes::utils::{format_value_styled, pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn memory_items(memory: &MemoryStore) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();

    for sector in ScopeSector::ALL {
        let groups: Vec<(DataType, Vec<_>)> = DataType::ALL
            .into_iter()
            .map(|data_type| {
                let mut cells: Vec<_> = memory.bucket(sector, data_type).iter().collect();
                cells.sort_unstable_by_key(|(address, _)| **address);
                (data_type, cells)
            })
            .filter(|(_, cells)| !cells.is_empty())
            .collect();

        if groups.is_empty() {
            continue;
        }

        items.push(ListItem::new(Line::from(Span::styled(
            sector.name().to_uppercase(),
            Style::default()
                .fg(DEFAULT_THEME.type_name)
                .add_modifier(Modifier::BOLD),
        ))));

        for (data_type, cells) in groups {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("  {}", data_type),
                Style::default().fg(DEFAULT_THEME.type_name),
            ))));
            for (address, value) in cells {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("    {:>6}", address),
                        Style::default().fg(DEFAULT_THEME.address),
                    ),
                    Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                    format_value_styled(value),
                ])));
            }
        }
    }

    items
}

/// Render the memory pane
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    memory: &MemoryStore,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Memory ({} cells) ", memory.cell_count());
    let block = pane_block(&title, is_focused);

    let items = memory_items(memory);
    if items.is_empty() {
        let paragraph = Paragraph::new("(no initialized cells)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_window(items, area.height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}
