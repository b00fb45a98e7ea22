use std::path::PathBuf;

use crate::common::ChatMessage;

/// View-local state. The session task owns merging and dedup; everything
/// here is render state plus the user's draft.
pub struct AppState {
    pub messages: Vec<ChatMessage>,
    pub input_text: String,
    /// Path of a local file to attach, as typed by the user.
    pub attachment_input: String,
    pub counterpart_name: Option<String>,
    pub last_send_error: Option<String>,
    pub live_down: bool,
    pub send_in_flight: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input_text: String::new(),
            attachment_input: String::new(),
            counterpart_name: None,
            last_send_error: None,
            live_down: false,
            send_in_flight: false,
        }
    }

    pub fn set_history(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Draft payload for a send command: trimmed text and/or attachment
    /// path. `None` when there is nothing to submit.
    pub fn draft(&self) -> Option<(Option<String>, Option<PathBuf>)> {
        let text = {
            let trimmed = self.input_text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };
        let file = {
            let trimmed = self.attachment_input.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(PathBuf::from(trimmed))
            }
        };
        if text.is_none() && file.is_none() {
            None
        } else {
            Some((text, file))
        }
    }

    /// Called on send success only; a failed send keeps the draft for a
    /// manual retry.
    pub fn clear_draft(&mut self) {
        self.input_text.clear();
        self.attachment_input.clear();
    }
}
