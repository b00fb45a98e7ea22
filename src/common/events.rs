use crate::common::types::ChatMessage;

/// Events the session task sends up to the UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Initial history, in backend order.
    HistoryLoaded(Vec<ChatMessage>),
    /// A message not seen before, whether it arrived via live push, a poll
    /// tick, or the echo of our own send.
    MessageReceived(ChatMessage),
    /// Display name of the other participant, derived from history.
    CounterpartNamed(String),
    SendCompleted,
    /// The draft is left intact by the UI; the user may retry manually.
    SendFailed(String),
    /// The push channel dropped. Polling still covers the conversation.
    LiveChannelDown(String),
}
