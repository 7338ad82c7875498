use eframe::egui;

use crate::common::Resource;
use crate::ui::state::AppState;

/// URL bar for the conversation page. Returns `true` when "Open" was pressed.
pub fn render(ui: &mut egui::Ui, state: &mut AppState, base_url: &str, resource: Resource) -> bool {
    let mut open = false;

    ui.horizontal(|ui| {
        ui.label("Page:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.page_input)
                .hint_text(format!("{base_url}/{resource}/1"))
                .desired_width(ui.available_width() - 70.0),
        );
        if ui.button("Open").clicked() {
            open = true;
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            open = true;
        }
    });

    let target = state.form.target_id();
    ui.horizontal(|ui| {
        let color = if target.is_nan() {
            egui::Color32::YELLOW
        } else {
            egui::Color32::GREEN
        };
        ui.colored_label(color, "●");
        ui.label(egui::RichText::new(format!("{resource} {target} @ {base_url}")).weak());
        let pending = state.list.pending_count();
        if pending > 0 {
            ui.label(egui::RichText::new(format!("({pending} pending)")).weak());
        }
    });

    open
}
