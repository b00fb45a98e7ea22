use std::collections::HashSet;

use crate::common::ChatMessage;

/// Merged view of one staff/doctor conversation.
///
/// The backend exposes no message ids, and two delivery paths (full-history
/// polls and live pushes) race each other. Every append therefore goes
/// through a synthesized identity set, so a poll tick never drops or
/// duplicates a message the live channel delivered first, and vice versa.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    seen: HashSet<u64>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Merge a full-history fetch, appending only messages with an unseen
    /// identity and preserving backend order among them. Returns the newly
    /// added messages.
    pub fn merge_fetched(&mut self, fetched: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let mut added = Vec::new();
        for message in fetched {
            if self.seen.insert(message.identity()) {
                self.messages.push(message.clone());
                added.push(message);
            }
        }
        added
    }

    /// Append one live-pushed (or send-echoed) message if unseen.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if self.seen.insert(message.identity()) {
            self.messages.push(message);
            true
        } else {
            false
        }
    }

    /// Display name of the participant opposite `participant_a`, read off the
    /// first message. `None` while the conversation is empty, when neither id
    /// matches, or when the backend omitted the name.
    pub fn counterpart_name(&self, participant_a: &str) -> Option<String> {
        let first = self.messages.first()?;
        let name = if first.sender_id == participant_a {
            &first.receiver
        } else if first.receiver_id == participant_a {
            &first.sender
        } else {
            return None;
        };
        if name.is_empty() {
            None
        } else {
            Some(name.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn message(from: &str, to: &str, text: &str, secs: u32) -> ChatMessage {
        ChatMessage {
            sender_id: from.to_string(),
            receiver_id: to.to_string(),
            sender: if from == "s1" { "Alice" } else { "Dr. Bob" }.to_string(),
            receiver: if to == "s1" { "Alice" } else { "Dr. Bob" }.to_string(),
            message: Some(text.to_string()),
            file: None,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, secs).unwrap(),
        }
    }

    #[test]
    fn merge_preserves_backend_order_and_count() {
        let mut convo = Conversation::new();
        let fetched = vec![
            message("s1", "d1", "one", 0),
            message("d1", "s1", "two", 1),
            message("s1", "d1", "three", 2),
        ];
        let added = convo.merge_fetched(fetched.clone());

        assert_eq!(added.len(), 3);
        assert_eq!(convo.messages().len(), fetched.len());
        let texts: Vec<_> = convo
            .messages()
            .iter()
            .map(|m| m.message.clone().unwrap())
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn live_push_then_poll_keeps_message_exactly_once() {
        let mut convo = Conversation::new();
        convo.merge_fetched(vec![message("s1", "d1", "one", 0)]);

        // Push beats the poll to the new message.
        let live = message("d1", "s1", "two", 1);
        assert!(convo.push(live.clone()));

        // The next full fetch includes it again.
        let refetched = vec![message("s1", "d1", "one", 0), live];
        let added = convo.merge_fetched(refetched);
        assert!(added.is_empty());
        assert_eq!(convo.messages().len(), 2);
    }

    #[test]
    fn poll_then_live_push_keeps_message_exactly_once() {
        let mut convo = Conversation::new();
        convo.merge_fetched(vec![
            message("s1", "d1", "one", 0),
            message("d1", "s1", "two", 1),
        ]);

        // The push arrives after the poll already delivered it.
        assert!(!convo.push(message("d1", "s1", "two", 1)));
        assert_eq!(convo.messages().len(), 2);
    }

    #[test]
    fn counterpart_name_from_first_message() {
        let mut convo = Conversation::new();
        convo.merge_fetched(vec![message("s1", "d1", "hi", 0)]);
        assert_eq!(convo.counterpart_name("s1").as_deref(), Some("Dr. Bob"));
    }

    #[test]
    fn counterpart_name_when_first_message_is_inbound() {
        let mut convo = Conversation::new();
        convo.merge_fetched(vec![message("d1", "s1", "hello", 0)]);
        assert_eq!(convo.counterpart_name("s1").as_deref(), Some("Dr. Bob"));
    }

    #[test]
    fn counterpart_name_tolerates_missing_fields() {
        let mut convo = Conversation::new();
        assert!(convo.counterpart_name("s1").is_none());

        let mut anonymous = message("s1", "d1", "hi", 0);
        anonymous.receiver = String::new();
        convo.push(anonymous);
        assert!(convo.counterpart_name("s1").is_none());
        // Unknown participant id also yields no name.
        assert!(convo.counterpart_name("other").is_none());
    }
}
