use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use crate::client::{AnalysisReply, ChatClient};
use crate::controller::ChatController;
use crate::error::ChatError;
use crate::state::EntryKind;

type QueryTask = JoinHandle<Result<AnalysisReply, ChatError>>;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub chat: ChatController,
    pub client: ChatClient,

    // In-flight request (at most one)
    pub query_task: Option<QueryTask>,

    // Conversation scroll
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            chat: ChatController::new(),
            client,
            query_task: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            chat_area: None,
        }
    }

    /// Start a submission and send the question on a background task.
    pub fn submit(&mut self) {
        if self.query_task.is_some() {
            return;
        }
        let Some(question) = self.chat.begin_submission() else {
            return;
        };

        // Scroll to bottom so the indicator is visible
        self.scroll_chat_to_bottom();

        let client = self.client.clone();
        self.query_task = Some(tokio::spawn(async move { client.ask(&question).await }));
    }

    /// Hand a finished request's outcome to the controller.
    pub async fn poll_query(&mut self) {
        let finished = self
            .query_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.query_task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ChatError::Task(e)),
            };
            self.chat.finish_submission(outcome);
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.total_chat_lines().saturating_sub(self.visible_height());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
    }

    /// Scroll chat to bottom so the newest entry is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.total_chat_lines();
        let visible_height = self.visible_height();

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Estimate rendered line count; must mirror the layout in `ui::chat_lines`.
    fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for entry in self.chat.view.entries() {
            if matches!(entry.kind, EntryKind::User | EntryKind::Assistant) {
                total_lines += 1; // Role line ("Vous:" or "Claude:")
            }
            for line in entry.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total_lines += 1; // Blank line after entry
        }

        total_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(ChatClient::new("http://127.0.0.1:9/ask"))
    }

    #[test]
    fn test_tick_only_animates_while_pending() {
        let mut app = app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.chat.pending = crate::state::PendingState::AwaitingResponse;
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn test_scroll_to_bottom_follows_long_conversation() {
        let mut app = app();
        app.chat_height = 5;
        app.chat_width = 40;
        for i in 0..10 {
            app.chat.view.push_info(format!("badge {}", i));
        }
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 15);

        app.scroll_down(10);
        assert_eq!(app.chat_scroll, 15);
        app.scroll_up(20);
        assert_eq!(app.chat_scroll, 0);
    }

    #[tokio::test]
    async fn test_blank_submit_spawns_nothing() {
        let mut app = app();
        app.chat.input = "   ".into();
        app.submit();
        assert!(app.query_task.is_none());
        assert!(app.chat.view.is_empty());
    }
}
