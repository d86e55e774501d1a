use crate::client::{AnalysisReply, ChatClient};
use crate::error::ChatError;
use crate::state::{
    destinations_badge, ConversationView, Focus, PendingState, CONNECTION_ERROR_TEXT,
    NO_ANSWER_TEXT,
};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Drives one question/answer cycle at a time.
///
/// `Idle -> AwaitingResponse -> Idle`. A submission is only accepted from
/// `Idle`, and every outcome returns to `Idle` with focus on the input.
#[derive(Debug, Default)]
pub struct ChatController {
    pub view: ConversationView,
    pub input: String,
    pub cursor: usize,
    pub pending: PendingState,
    pub focus: Focus,
}

impl ChatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending == PendingState::AwaitingResponse
    }

    /// Start a submission from the input buffer.
    ///
    /// Returns the question to send, or `None` when the input is blank or a
    /// request is already outstanding. A `None` leaves every field untouched.
    pub fn begin_submission(&mut self) -> Option<String> {
        if self.is_pending() {
            tracing::debug!("submission refused: request already outstanding");
            return None;
        }

        let question = self.input.trim();
        if question.is_empty() {
            return None;
        }
        let question = question.to_string();

        self.view.push_user(question.clone());
        self.input.clear();
        self.cursor = 0;
        self.pending = PendingState::AwaitingResponse;
        self.view.show_thinking();

        Some(question)
    }

    /// Render the outcome of the outstanding request and return to `Idle`.
    pub fn finish_submission(&mut self, outcome: Result<AnalysisReply, ChatError>) {
        if !self.is_pending() {
            tracing::warn!("outcome received with no request outstanding, ignoring");
            return;
        }

        self.view.remove_thinking();

        match outcome {
            Ok(reply) => {
                // An empty answer counts as no answer
                self.view
                    .push_assistant(reply.answer().unwrap_or(NO_ANSWER_TEXT).to_string());
                self.view.push_info(destinations_badge(reply.count_text()));
            }
            Err(e) => {
                tracing::error!(error = %e, http = e.is_http(), "question failed");
                self.view.push_error(CONNECTION_ERROR_TEXT);
            }
        }

        self.pending = PendingState::Idle;
        self.focus = Focus::Input;
    }

    /// Run a full submission cycle against `client`.
    ///
    /// Returns false when nothing was submitted.
    pub async fn submit(&mut self, client: &ChatClient) -> bool {
        let Some(question) = self.begin_submission() else {
            return false;
        };
        let outcome = client.ask(&question).await;
        self.finish_submission(outcome);
        true
    }

    // Input editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Conversation,
            Focus::Conversation => Focus::Input,
        };
    }
}
