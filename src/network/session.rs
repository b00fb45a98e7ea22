use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use crate::common::{ChatMessage, SenderRole, SessionCommand, SessionEvent, room_id};

use super::api::ApiClient;
use super::conversation::Conversation;
use super::live::LiveChannel;

/// Fixed participants of one conversation plus the local actor's role.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub staff_id: String,
    pub doctor_id: String,
    pub role: SenderRole,
    pub live_url: String,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Ready,
    Closed,
}

/// Synchronization engine for one staff/doctor conversation.
///
/// Owns all network I/O for the session: the initial history fetch, the
/// periodic full-history poll, the push channel, and outgoing sends. The UI
/// talks to it exclusively through the command/event channels, so all state
/// mutation happens on this task and stops the moment the loop exits.
pub struct ChatSession {
    api: ApiClient,
    config: SessionConfig,
    event_sender: mpsc::Sender<SessionEvent>,
    command_receiver: mpsc::Receiver<SessionCommand>,
    conversation: Conversation,
    phase: Phase,
    counterpart_named: bool,
}

impl ChatSession {
    pub fn new(
        api: ApiClient,
        config: SessionConfig,
        event_sender: mpsc::Sender<SessionEvent>,
        command_receiver: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        Self {
            api,
            config,
            event_sender,
            command_receiver,
            conversation: Conversation::new(),
            phase: Phase::Loading,
            counterpart_named: false,
        }
    }

    pub async fn run(mut self) {
        self.load_initial_history().await;

        let mut live = self.join_live_channel().await;
        let mut poll = time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // The first interval tick completes immediately; history was just
        // fetched, so consume it.
        poll.tick().await;

        log::info!(
            "Chat session ready for room {}",
            room_id(&self.config.staff_id, &self.config.doctor_id)
        );

        while self.phase == Phase::Ready {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(SessionCommand::SendMessage { text, file }) => {
                            self.handle_send(text, file).await;
                        }
                        // A dropped sender closes the session the same way
                        // an explicit Close does.
                        Some(SessionCommand::Close) | None => {
                            self.phase = Phase::Closed;
                        }
                    }
                }
                _ = poll.tick() => {
                    self.refresh_history().await;
                }
                pushed = next_live(&mut live) => {
                    match pushed {
                        Some(message) => self.handle_live_message(message).await,
                        None => {
                            log::warn!("Live channel lost; continuing on polling alone");
                            self.emit(SessionEvent::LiveChannelDown(
                                "push channel disconnected".to_string(),
                            ))
                            .await;
                            live = None;
                        }
                    }
                }
            }
        }

        if let Some(channel) = live {
            channel.close().await;
        }
        log::info!("Chat session closed");
    }

    /// Initial full fetch. On failure the view stays empty and the next poll
    /// tick retries; either way the session becomes ready.
    async fn load_initial_history(&mut self) {
        match self
            .api
            .fetch_history(&self.config.staff_id, &self.config.doctor_id)
            .await
        {
            Ok(fetched) => {
                self.conversation.merge_fetched(fetched);
                self.emit(SessionEvent::HistoryLoaded(
                    self.conversation.messages().to_vec(),
                ))
                .await;
                self.maybe_name_counterpart().await;
            }
            Err(err) => {
                log::warn!("Initial history fetch failed: {err}");
            }
        }
        self.phase = Phase::Ready;
    }

    async fn join_live_channel(&mut self) -> Option<LiveChannel> {
        let room = room_id(&self.config.staff_id, &self.config.doctor_id);
        match LiveChannel::join(&self.config.live_url, &room).await {
            Ok(channel) => {
                log::info!("Joined live room {room}");
                Some(channel)
            }
            Err(err) => {
                log::warn!("Live channel unavailable, polling only: {err}");
                self.emit(SessionEvent::LiveChannelDown(err.to_string()))
                    .await;
                None
            }
        }
    }

    /// One poll tick: re-fetch the full history and merge by identity, so a
    /// tick never drops a message the push channel delivered first. Fetch
    /// failures are swallowed; the next tick is the retry.
    async fn refresh_history(&mut self) {
        match self
            .api
            .fetch_history(&self.config.staff_id, &self.config.doctor_id)
            .await
        {
            Ok(fetched) => {
                for message in self.conversation.merge_fetched(fetched) {
                    self.emit(SessionEvent::MessageReceived(message)).await;
                }
                self.maybe_name_counterpart().await;
            }
            Err(err) => {
                log::debug!("History refresh failed: {err}");
            }
        }
    }

    async fn handle_live_message(&mut self, message: ChatMessage) {
        if self.conversation.push(message.clone()) {
            self.emit(SessionEvent::MessageReceived(message)).await;
        }
        self.maybe_name_counterpart().await;
    }

    /// Submit a draft. Blank text with no file is a no-op without a network
    /// call. On failure the UI keeps the draft; there is no auto-retry.
    async fn handle_send(&mut self, text: Option<String>, file: Option<PathBuf>) {
        let text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        if text.is_none() && file.is_none() {
            return;
        }

        let result = self
            .api
            .send_message(
                &self.config.staff_id,
                &self.config.doctor_id,
                self.config.role,
                text.as_deref(),
                file.as_deref(),
            )
            .await;

        match result {
            Ok(chat) => {
                self.emit(SessionEvent::SendCompleted).await;
                if let Some(message) = chat {
                    if self.conversation.push(message.clone()) {
                        self.emit(SessionEvent::MessageReceived(message)).await;
                    }
                }
            }
            Err(err) => {
                log::warn!("Send failed: {err}");
                self.emit(SessionEvent::SendFailed(err.to_string())).await;
            }
        }
    }

    /// The counterpart's display name becomes derivable with the first
    /// message; emit it once.
    async fn maybe_name_counterpart(&mut self) {
        if self.counterpart_named {
            return;
        }
        let local_id = match self.config.role {
            SenderRole::Staff => &self.config.staff_id,
            SenderRole::Doctor => &self.config.doctor_id,
        };
        if let Some(name) = self.conversation.counterpart_name(local_id) {
            self.counterpart_named = true;
            self.emit(SessionEvent::CounterpartNamed(name)).await;
        }
    }

    async fn emit(&self, event: SessionEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::debug!("UI receiver gone: {err}");
        }
    }
}

/// Pends forever once the live channel is gone, so the select loop falls
/// back to polling without spinning.
async fn next_live(live: &mut Option<LiveChannel>) -> Option<ChatMessage> {
    match live {
        Some(channel) => channel.next_message().await,
        None => std::future::pending().await,
    }
}
