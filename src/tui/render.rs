//! Drawing the widget with ratatui

use super::View;
use crate::widget::{Message, Sender, Visibility};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};

pub const TITLE: &str = "Test Centre Assistant";
pub const PLACEHOLDER: &str = "Ask about the Test Centre...";
pub const TYPING: &str = "Typing...";
const LAUNCHER: &str = "Press Enter to chat with the Test Centre Assistant (q to quit)";
const SEND_HINT: &str = "Press Enter to send · Shift+Enter for a new line · PgUp/PgDn to scroll";
const MAX_INPUT_ROWS: u16 = 4;

pub fn render(frame: &mut Frame, view: &View) {
    let area = frame.area();
    match view.state.visibility {
        Visibility::Closed => render_launcher(frame, area),
        Visibility::Minimized => {
            let [header, _] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            render_header(frame, header, true);
        }
        Visibility::Open => render_window(frame, area, view),
    }
}

fn render_launcher(frame: &mut Frame, area: Rect) {
    let [_, line, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);
    let launcher = Paragraph::new(Line::from(LAUNCHER).bold().fg(Color::Cyan)).right_aligned();
    frame.render_widget(launcher, line);
}

fn render_header(frame: &mut Frame, area: Rect, minimized: bool) {
    let hints = if minimized {
        "  [Ctrl+T] restore  [Esc] close"
    } else {
        "  [Ctrl+T] minimize  [Esc] close"
    };
    let header = Line::from(vec![
        Span::styled(TITLE, Style::new().add_modifier(Modifier::BOLD)),
        Span::styled(hints, Style::new().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(header).style(Style::new().bg(Color::Blue).fg(Color::White)),
        area,
    );
}

fn render_window(frame: &mut Frame, area: Rect, view: &View) {
    let draft_rows = u16::try_from(view.state.draft.lines().count().max(1))
        .unwrap_or(MAX_INPUT_ROWS)
        .min(MAX_INPUT_ROWS);

    let [header, messages, input, hint] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(draft_rows + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, false);
    render_messages(frame, messages, view);
    render_input(frame, input, view);

    let hint_line = match &view.notice {
        Some(notice) => Line::from(notice.as_str()).fg(Color::Red),
        None => Line::from(SEND_HINT).fg(Color::DarkGray),
    };
    frame.render_widget(Paragraph::new(hint_line), hint);
}

fn render_messages(frame: &mut Frame, area: Rect, view: &View) {
    let mut lines: Vec<Line> = Vec::new();
    for message in &view.state.messages {
        lines.extend(message_lines(message));
        lines.push(Line::default());
    }
    if view.state.is_awaiting_reply() {
        lines.push(Line::from(TYPING).italic().fg(Color::DarkGray));
    }

    // Offset is kept from the bottom so new messages stay in view
    let total = wrapped_rows(&lines, area.width);
    let max_offset = total.saturating_sub(area.height);
    let top = max_offset.saturating_sub(view.scroll);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((top, 0));
    frame.render_widget(paragraph, area);
}

fn message_lines(message: &Message) -> Vec<Line<'_>> {
    let (label, style) = match message.sender {
        Sender::User => ("You: ", Style::new().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Sender::Bot => ("Assistant: ", Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    };

    message
        .text
        .split('\n')
        .enumerate()
        .map(|(i, text)| {
            if i == 0 {
                Line::from(vec![Span::styled(label, style), Span::raw(text)])
            } else {
                Line::from(Span::raw(text))
            }
        })
        .collect()
}

fn render_input(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::bordered().title(" Message ");
    let inner = block.inner(area);

    let draft = &view.state.draft;
    let paragraph = if draft.is_empty() {
        Paragraph::new(Line::from(PLACEHOLDER).fg(Color::DarkGray))
    } else {
        let lines: Vec<Line> = draft.split('\n').map(Line::from).collect();
        let visible = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        Paragraph::new(lines).scroll((visible.saturating_sub(inner.height), 0))
    };
    frame.render_widget(paragraph.block(block), area);

    // Cursor at the end of the draft's last line
    let last_line = draft.rsplit('\n').next().unwrap_or_default();
    let col = u16::try_from(Line::from(last_line).width()).unwrap_or(u16::MAX);
    let row = u16::try_from(draft.split('\n').count().saturating_sub(1)).unwrap_or(u16::MAX);
    if inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((
            inner.x + col.min(inner.width - 1),
            inner.y + row.min(inner.height - 1),
        ));
    }
}

/// Rows `lines` occupy once wrapped to `width` columns
fn wrapped_rows(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
