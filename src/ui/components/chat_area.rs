use eframe::egui;

use crate::compose::{DeliveryStatus, DmRow};

pub fn render(ui: &mut egui::Ui, rows: &[DmRow]) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if rows.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
                return;
            }

            for row in rows {
                // Own messages sit on the right.
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    render_row(ui, row);
                });
            }
        });
}

fn render_row(ui: &mut egui::Ui, row: &DmRow) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical(|ui| {
            match &row.status {
                DeliveryStatus::Pending => {
                    ui.label(egui::RichText::new(&row.text).weak());
                }
                DeliveryStatus::Delivered => {
                    ui.label(&row.text);
                }
                DeliveryStatus::Failed(reason) => {
                    ui.colored_label(egui::Color32::RED, &row.text);
                    ui.label(
                        egui::RichText::new(format!("not sent: {reason}"))
                            .small()
                            .color(egui::Color32::RED),
                    );
                }
            }
            ui.label(
                egui::RichText::new(row.created_at.format("%H:%M:%S").to_string())
                    .small()
                    .weak(),
            );
        });
    });
}
