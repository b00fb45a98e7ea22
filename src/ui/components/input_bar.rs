use crate::ui::state::AppState;

/// Returns true when the user asked to submit the draft. Clearing is left to
/// the send-completed event, so a failed send keeps everything in place.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.input_text).hint_text("Type a message"),
        );
        ui.add(
            egui::TextEdit::singleline(&mut state.attachment_input)
                .hint_text("Attachment path")
                .desired_width(160.0),
        );
        if ui
            .add_enabled(!state.send_in_flight, egui::Button::new("Send"))
            .clicked()
        {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }
    });

    send && !state.send_in_flight
}
