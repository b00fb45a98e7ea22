use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.heading(state.counterpart_name.as_deref().unwrap_or("Conversation"));
        if state.live_down {
            ui.colored_label(
                egui::Color32::YELLOW,
                "live updates unavailable, refreshing periodically",
            );
        }
    });
    if let Some(err) = &state.last_send_error {
        ui.colored_label(egui::Color32::RED, format!("Send failed: {err}"));
    }
}
