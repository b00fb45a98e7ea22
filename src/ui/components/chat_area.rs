use crate::common::ChatMessage;
use crate::network::ApiClient;

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage], api: &ApiClient) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                let who = if message.sender.is_empty() {
                    message.sender_id.as_str()
                } else {
                    message.sender.as_str()
                };
                if let Some(text) = &message.message {
                    ui.label(format!("{who}: {text}"));
                }
                if let Some(file) = &message.file {
                    ui.horizontal(|ui| {
                        ui.label(format!("{who}:"));
                        ui.hyperlink_to("attachment", api.attachment_url(file));
                    });
                }
            }
        });
}
