//! Program pane rendering
//!
//! Lists the decoded quadruples with their instruction index. The row at the
//! program counter gets an arrow and a highlighted background, and the view
//! follows it while stepping.

use crate::parser::ast::{Instruction, Program};
use crate::ui::panes::utils::{pane_block, visible_window};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn instruction_line(index: usize, instruction: &Instruction, is_current: bool) -> Line<'static> {
    let marker = if is_current { "→ " } else { "  " };
    let mut spans = vec![
        Span::styled(
            marker,
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:>4} ", index),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ];

    let text = instruction.to_string();
    if text.is_empty() {
        spans.push(Span::styled(
            "(halt)",
            Style::default()
                .fg(DEFAULT_THEME.comment)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        let mut words = text.split(' ');
        if let Some(opcode) = words.next() {
            spans.push(Span::styled(
                format!("{:<8}", opcode),
                Style::default()
                    .fg(DEFAULT_THEME.keyword)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        for word in words {
            spans.push(Span::styled(
                format!(" {:>6}", word),
                Style::default().fg(DEFAULT_THEME.address),
            ));
        }
    }

    let line = Line::from(spans);
    if is_current {
        line.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
    } else {
        line
    }
}

/// Keep `pc` inside the visible window of `height` rows
fn follow_pc(pc: usize, height: u16, offset: &mut usize) {
    let visible_height = height.saturating_sub(2).max(1) as usize;
    if pc < *offset {
        *offset = pc;
    } else if pc >= *offset + visible_height {
        *offset = pc + 1 - visible_height;
    }
}

/// Render the program pane
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    program: &Program,
    pc: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Program ({} quads) ", program.len());
    let block = pane_block(&title, is_focused);

    if program.is_empty() {
        let paragraph = Paragraph::new("(empty program)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    // Past-the-end pc shows an end marker row
    let mut items: Vec<ListItem> = program
        .instructions
        .iter()
        .enumerate()
        .map(|(i, instr)| ListItem::new(instruction_line(i, instr, i == pc)))
        .collect();
    if pc >= program.len() {
        items.push(ListItem::new(Line::from(Span::styled(
            "→      (end)",
            Style::default()
                .fg(DEFAULT_THEME.success)
                .add_modifier(Modifier::BOLD),
        ))));
    }

    if !is_focused {
        follow_pc(pc.min(items.len() - 1), area.height, scroll_offset);
    }
    let visible = visible_window(items, area.height, scroll_offset);
    frame.render_widget(List::new(visible).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_pc_scrolls_down_and_up() {
        let mut offset = 0;
        // 5 visible rows
        follow_pc(9, 7, &mut offset);
        assert_eq!(offset, 5);
        follow_pc(2, 7, &mut offset);
        assert_eq!(offset, 2);
        follow_pc(4, 7, &mut offset);
        assert_eq!(offset, 2);
    }

    #[test]
    fn test_halt_row_is_labelled() {
        let line = instruction_line(3, &Instruction::Halt, false);
        assert!(line.spans.iter().any(|s| s.content == "(halt)"));
    }
}
