//! Input box rendering

use super::utils::layout_input;
use crate::input::InputLine;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the input box and place the terminal cursor inside it.
///
/// While a reply is in flight the box is dimmed; typing still works, sending
/// is refused until the reply has finished.
pub fn render_input_pane(frame: &mut Frame, area: Rect, input: &InputLine, waiting: bool) {
    let (title, border_style) = if waiting {
        (
            " Message (waiting for reply) ",
            Style::default().fg(DEFAULT_THEME.border_normal),
        )
    } else {
        (
            " Message ",
            Style::default()
                .fg(DEFAULT_THEME.border_focused)
                .add_modifier(Modifier::BOLD),
        )
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2).max(1) as usize;
    let (rows, (col, row)) = layout_input(input.text(), input.cursor(), inner_width);

    // Keep the cursor row in view
    let first_row = (row + 1).saturating_sub(inner_height);
    let lines: Vec<Line> = rows
        .into_iter()
        .skip(first_row)
        .take(inner_height)
        .map(Line::from)
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(DEFAULT_THEME.fg));
    frame.render_widget(paragraph, area);

    frame.set_cursor_position(Position::new(
        area.x + 1 + col as u16,
        area.y + 1 + (row - first_row) as u16,
    ));
}
