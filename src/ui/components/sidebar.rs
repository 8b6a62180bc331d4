use eframe::egui;

use crate::common::Peer;

pub fn render(ui: &mut egui::Ui, peers: &[Peer], current_user_id: &str) {
    ui.heading("Online");
    ui.separator();

    if peers.is_empty() {
        ui.label("No peers present yet");
        return;
    }

    for peer in peers {
        ui.horizontal(|ui| {
            // Chấm xanh = đang hiện diện (không có eviction theo thời gian)
            ui.colored_label(egui::Color32::GREEN, "●");
            ui.label(&peer.display_name);
            if peer.id == current_user_id {
                ui.label(egui::RichText::new("(you)").weak());
            }
        });
    }
}
