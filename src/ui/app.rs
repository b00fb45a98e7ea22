use tokio::sync::mpsc;

use crate::common::{SessionCommand, SessionEvent};
use crate::network::ApiClient;

use super::components::{chat_area, header, input_bar};
use super::state::AppState;

pub struct ChatApp {
    state: AppState,
    // Only used to resolve attachment URLs; all real I/O lives in the
    // session task.
    api: ApiClient,
    command_sender: mpsc::Sender<SessionCommand>,
    event_receiver: mpsc::Receiver<SessionEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        api: ApiClient,
        command_sender: mpsc::Sender<SessionCommand>,
        event_receiver: mpsc::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            state: AppState::new(),
            api,
            command_sender,
            event_receiver,
        }
    }

    fn handle_session_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                SessionEvent::HistoryLoaded(messages) => self.state.set_history(messages),
                SessionEvent::MessageReceived(message) => self.state.push_message(message),
                SessionEvent::CounterpartNamed(name) => {
                    self.state.counterpart_name = Some(name);
                }
                SessionEvent::SendCompleted => {
                    self.state.clear_draft();
                    self.state.send_in_flight = false;
                    self.state.last_send_error = None;
                }
                SessionEvent::SendFailed(reason) => {
                    self.state.send_in_flight = false;
                    self.state.last_send_error = Some(reason);
                }
                SessionEvent::LiveChannelDown(_) => self.state.live_down = true,
            }
        }
    }

    fn submit_draft(&mut self) {
        let Some((text, file)) = self.state.draft() else {
            return;
        };
        match self
            .command_sender
            .try_send(SessionCommand::SendMessage { text, file })
        {
            Ok(()) => self.state.send_in_flight = true,
            Err(err) => log::warn!("Failed to queue send command: {err}"),
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_session_events();

        egui::TopBottomPanel::top("conversation_header").show(ctx, |ui| {
            header::render(ui, &self.state);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            chat_area::render(ui, &self.state.messages, &self.api);
            ui.separator();
            if input_bar::render(ui, &mut self.state) {
                self.submit_draft();
            }
        });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Every exit path must tear the session down, or its poll timer and
        // push subscription leak.
        if let Err(err) = self.command_sender.try_send(SessionCommand::Close) {
            log::warn!("Failed to close chat session: {err}");
        }
    }
}
