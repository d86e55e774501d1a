use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::state::Focus;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_query().await;
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any focus
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.chat.toggle_focus(),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1)),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1)),
        _ => match app.chat.focus {
            Focus::Input => handle_input_key(app, key),
            Focus::Conversation => handle_conversation_key(app, key),
        },
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    // Input is frozen while a request is outstanding
    if app.chat.is_pending() {
        return;
    }

    match key.code {
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.chat.delete_char(),
        KeyCode::Delete => app.chat.delete_char_forward(),
        KeyCode::Left => app.chat.move_cursor_left(),
        KeyCode::Right => app.chat.move_cursor_right(),
        KeyCode::Home => app.chat.move_cursor_home(),
        KeyCode::End => app.chat.move_cursor_end(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Char(c) => app.chat.insert_char(c),
        _ => {}
    }
}

fn handle_conversation_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => app.chat_scroll = 0,
        KeyCode::Char('G') | KeyCode::End => app.scroll_chat_to_bottom(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char('i') => app.chat.focus = Focus::Input,
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatClient;

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        App::new(ChatClient::new("http://127.0.0.1:9/ask"))
    }

    #[tokio::test]
    async fn test_typing_goes_to_input() {
        let mut app = app();
        for c in "Lyon".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).await;
        }
        handle_event(&mut app, press(KeyCode::Backspace)).await;
        assert_eq!(app.chat.input, "Lyo");
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_does_nothing() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Char(' '))).await;
        handle_event(&mut app, press(KeyCode::Enter)).await;
        assert!(app.chat.view.is_empty());
        assert!(app.query_task.is_none());
    }

    #[tokio::test]
    async fn test_enter_submits_and_freezes_input() {
        // Slow endpoint so the request is still outstanding while we type
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        let mut app = App::new(ChatClient::new(&server.uri()));

        for c in "Nice".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).await;
        }
        handle_event(&mut app, press(KeyCode::Enter)).await;

        assert!(app.chat.is_pending());
        assert!(app.query_task.is_some());
        assert_eq!(app.chat.view.entries()[0].text, "Nice");
        assert!(app.chat.input.is_empty());
        let entries_before = app.chat.view.len();

        // Typing and a second Enter are ignored while awaiting the reply
        for c in "Rome".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).await;
        }
        handle_event(&mut app, press(KeyCode::Enter)).await;

        assert!(app.chat.is_pending());
        assert!(app.chat.input.is_empty());
        assert_eq!(app.chat.view.len(), entries_before);
        assert_eq!(app.chat.view.count_of(crate::state::EntryKind::User), 1);
    }

    #[tokio::test]
    async fn test_tab_switches_focus_and_q_quits_from_conversation() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Char('q'))).await;
        assert!(!app.should_quit);
        assert_eq!(app.chat.input, "q");

        handle_event(&mut app, press(KeyCode::Tab)).await;
        assert_eq!(app.chat.focus, Focus::Conversation);
        handle_event(&mut app, press(KeyCode::Char('q'))).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = app();
        let event = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle_event(&mut app, event).await;
        assert!(app.should_quit);
    }
}
