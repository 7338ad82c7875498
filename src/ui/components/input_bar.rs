use eframe::egui;

/// Draw the message form. Returns `true` when the user submitted it; the
/// submission handler decides whether the text is worth sending.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let mut submit = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .hint_text("Write a message…")
                .desired_width(ui.available_width() - 60.0),
        );
        if ui.button("Send").clicked() {
            submit = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
            response.request_focus();
        }
    });

    submit
}
