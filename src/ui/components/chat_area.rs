use eframe::egui;

use crate::common::{ChatMessage, MessageKind};

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage], current_user_id: &str) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                match message.kind {
                    MessageKind::System => {
                        ui.label(egui::RichText::new(&message.content).weak().italics());
                    }
                    MessageKind::Text => {
                        let sender = if message.sender_id == current_user_id {
                            "You"
                        } else {
                            message.sender_name.as_str()
                        };
                        ui.label(format!("{}: {}", sender, message.content));
                    }
                }
            }
        });
}
