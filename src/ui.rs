use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::state::{ConversationView, EntryKind, Focus};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

/// Lines for the whole conversation. Line count per entry must stay in step
/// with `App::total_chat_lines`.
pub fn chat_lines(view: &ConversationView, animation_frame: u8) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in view.entries() {
        match entry.kind {
            EntryKind::User => {
                lines.push(Line::from(Span::styled(
                    "Vous:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in entry.text.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            EntryKind::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Claude:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in entry.text.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
            EntryKind::Error => {
                // "Erreur:" prefix in bold red, rest plain red
                let (label, rest) = entry
                    .text
                    .split_once(':')
                    .map(|(l, r)| (format!("{}:", l), r.to_string()))
                    .unwrap_or_else(|| (String::new(), entry.text.clone()));
                lines.push(Line::from(vec![
                    Span::styled(label, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Span::styled(rest, Style::default().fg(Color::Red)),
                ]));
            }
            EntryKind::Info => {
                lines.push(Line::from(Span::styled(
                    entry.text.clone(),
                    Style::default().fg(Color::Magenta),
                )));
            }
            EntryKind::Thinking => {
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    format!("{}{}", entry.text, dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
        }
        lines.push(Line::default());
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Destinations ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.client.endpoint().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let focused = app.chat.focus == Focus::Conversation;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    let text = if app.chat.view.is_empty() {
        Text::from(Span::styled(
            "Posez une question sur vos prochaines destinations...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(chat_lines(&app.chat.view, app.animation_frame))
    };

    let chat = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let pending = app.chat.is_pending();
    let focused = app.chat.focus == Focus::Input;

    let border_color = if pending {
        Color::DarkGray
    } else if focused {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if pending { " En attente… " } else { " Question " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Keep the cursor visible with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.chat.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .chat
        .input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_color = if pending { Color::DarkGray } else { Color::Cyan };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(block);

    frame.render_widget(input, area);

    if focused && !pending {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = match app.chat.focus {
        Focus::Input => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" envoyer ", label_style),
            Span::styled(" ↑/↓ ", key_style),
            Span::styled(" défiler ", label_style),
        ],
        Focus::Conversation => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" défiler ", label_style),
            Span::styled(" g/G ", key_style),
            Span::styled(" début/fin ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quitter ", label_style),
        ],
    };
    hints.extend(vec![
        Span::styled(" Tab ", key_style),
        Span::styled(" focus ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quitter ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
