//! Conversation pane rendering

use super::utils::wrap_text;
use crate::message_log::{Message, MessageLog, Sender};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Width of the sender label column, including the gap after it
const LABEL_WIDTH: usize = 5;

const TYPING_CURSOR: &str = "▌";

/// Render the message log, scrolled according to `log.scroll`
pub fn render_conversation_pane(frame: &mut Frame, area: Rect, log: &mut MessageLog) {
    let block = Block::default()
        .title(" Chat ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if log.is_empty() && !log.indicator_visible() {
        let paragraph = Paragraph::new("(say something)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 1, 0, 0));
    // Borders and horizontal padding
    let text_width = (area.width as usize).saturating_sub(4 + LABEL_WIDTH).max(1);

    let mut all_lines: Vec<Line> = Vec::new();
    for (i, message) in log.messages().iter().enumerate() {
        if i > 0 {
            all_lines.push(Line::default());
        }
        all_lines.extend(message_lines(message, text_width));
    }
    if log.indicator_visible() {
        if !log.is_empty() {
            all_lines.push(Line::default());
        }
        all_lines.push(Line::from(vec![
            label_span(Sender::Bot),
            Span::styled(
                "typing…",
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    // Calculate visible range for scrolling
    let total_rows = all_lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset; reaching the bottom resumes following
    log.clamp_scroll(total_rows.saturating_sub(visible_height));

    let visible_items: Vec<ListItem> = all_lines
        .into_iter()
        .skip(log.scroll)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}

fn label_span(sender: Sender) -> Span<'static> {
    let color = match sender {
        Sender::User => DEFAULT_THEME.user_label,
        Sender::Bot => DEFAULT_THEME.bot_label,
    };
    Span::styled(
        format!("{:<width$}", sender.label(), width = LABEL_WIDTH),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Label on the first row, continuation rows indented under the text
fn message_lines(message: &Message, width: usize) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(DEFAULT_THEME.fg);
    let rows = wrap_text(&message.text, width);
    let last = rows.len() - 1;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = if i == 0 {
                vec![label_span(message.sender)]
            } else {
                vec![Span::raw(" ".repeat(LABEL_WIDTH))]
            };
            spans.push(Span::styled(row, text_style));
            if i == last && !message.complete && message.sender == Sender::Bot {
                spans.push(Span::styled(
                    TYPING_CURSOR,
                    Style::default().fg(DEFAULT_THEME.cursor),
                ));
            }
            Line::from(spans)
        })
        .collect()
}
