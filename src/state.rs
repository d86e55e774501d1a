//! UI-agnostic conversation state
//!
//! The conversation is an owned, append-only list of entries. Only the
//! transient "thinking" indicator is ever taken back out of it.

pub const THINKING_TEXT: &str = "Claude réfléchit";
pub const NO_ANSWER_TEXT: &str = "Erreur: Pas de réponse reçue";
pub const CONNECTION_ERROR_TEXT: &str =
    "Erreur: Impossible de contacter le serveur. Vérifiez votre connexion et l'URL de l'API.";

/// Text of the badge shown under an answer.
pub fn destinations_badge(count: impl std::fmt::Display) -> String {
    format!("📊 {} destinations analysées", count)
}

/// Who (or what) produced a conversation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Assistant,
    Error,
    Info,
    Thinking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

impl Entry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Whether a request is outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Conversation,
}

#[derive(Debug, Default)]
pub struct ConversationView {
    entries: Vec<Entry>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::new(EntryKind::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::new(EntryKind::Assistant, text));
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::new(EntryKind::Error, text));
    }

    pub fn push_info(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::new(EntryKind::Info, text));
    }

    /// Show the thinking indicator. A second indicator is never stacked.
    pub fn show_thinking(&mut self) {
        if !self.is_thinking() {
            self.entries.push(Entry::new(EntryKind::Thinking, THINKING_TEXT));
        }
    }

    /// Remove the thinking indicator. Returns false if none was shown.
    pub fn remove_thinking(&mut self) -> bool {
        match self
            .entries
            .iter()
            .rposition(|e| e.kind == EntryKind::Thinking)
        {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_thinking(&self) -> bool {
        self.entries.iter().any(|e| e.kind == EntryKind::Thinking)
    }

    pub fn count_of(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
