use eframe::egui;

use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Events");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Rows:");
        ui.label(format!("{}", state.list.len()));
        ui.label("Pending:");
        ui.label(format!("{}", state.list.pending_count()));
    });

    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for event in state.events.iter().rev().take(20) {
            let time_str = event.timestamp.format("%H:%M:%S");
            let color = match event.kind {
                "DM_DELIVERED" => egui::Color32::GREEN,
                "DM_FAILED" => egui::Color32::RED,
                "PAGE_OPENED" => egui::Color32::YELLOW,
                _ => egui::Color32::WHITE,
            };

            ui.horizontal_wrapped(|ui| {
                ui.colored_label(color, format!("[{}]", time_str));
                ui.label(&event.message);
            });
        }
    });
}
