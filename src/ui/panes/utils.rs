use crate::memory::value::Value;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, ListItem},
};

/// Bordered block whose border reflects focus
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Format a value with a style picked from its kind
pub(crate) fn format_value_styled(value: &Value) -> Span<'static> {
    match value {
        Value::Int(_) | Value::Real(_) => {
            Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.number))
        }
        Value::Bool(_) => Span::styled(
            value.to_string(),
            Style::default().fg(DEFAULT_THEME.keyword),
        ),
        Value::Str(s) => Span::styled(
            format!("{:?}", s),
            Style::default().fg(DEFAULT_THEME.string),
        ),
    }
}

/// Clamp `offset` and slice out the rows that fit in a bordered pane of `height`
pub(crate) fn visible_window(
    items: Vec<ListItem<'static>>,
    height: u16,
    offset: &mut usize,
) -> Vec<ListItem<'static>> {
    let visible_height = height.saturating_sub(2).max(1) as usize;
    if items.len() > visible_height {
        *offset = (*offset).min(items.len() - visible_height);
    } else {
        *offset = 0;
    }

    items
        .into_iter()
        .skip(*offset)
        .take(visible_height)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<ListItem<'static>> {
        (0..n).map(|i| ListItem::new(i.to_string())).collect()
    }

    #[test]
    fn test_visible_window_clamps_offset() {
        let mut offset = usize::MAX;
        let shown = visible_window(rows(10), 6, &mut offset);
        assert_eq!(offset, 6);
        assert_eq!(shown.len(), 4);
    }

    #[test]
    fn test_visible_window_resets_when_everything_fits() {
        let mut offset = 3;
        let shown = visible_window(rows(2), 10, &mut offset);
        assert_eq!(offset, 0);
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn test_strings_are_quoted() {
        let span = format_value_styled(&Value::Str("hi".to_string()));
        assert_eq!(span.content, "\"hi\"");
        let span = format_value_styled(&Value::Real(2.0));
        assert_eq!(span.content, "2.0");
    }
}
