use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{Peer, SessionCommand, SessionEvent};

use super::components::{chat_area, input_bar, sidebar};
use super::state::AppState;

pub struct ChatApp {
    current_user: Peer,
    state: AppState,
    command_sender: mpsc::Sender<SessionCommand>,
    event_receiver: mpsc::Receiver<SessionEvent>,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        current_user: Peer,
        command_sender: mpsc::Sender<SessionCommand>,
        event_receiver: mpsc::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            state: AppState::new(current_user.clone()),
            current_user,
            command_sender,
            event_receiver,
        }
    }

    fn handle_session_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                SessionEvent::MessageAppended(message) => self.state.push_message(message),
                SessionEvent::PeerJoined(peer) => self.state.add_peer(peer),
                SessionEvent::PeerLeft(peer_id) => self.state.remove_peer(&peer_id),
            }
        }
    }

    fn send_command(&mut self, content: String) {
        if let Err(err) = self
            .command_sender
            .try_send(SessionCommand::SendChat(content))
        {
            log::warn!("Failed to send command to session: {err}");
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_session_events();

        egui::SidePanel::left("peer_sidebar").show(ctx, |ui| {
            sidebar::render(ui, &self.state.peers, &self.current_user.id);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Broadcast Chat");
            ui.separator();
            chat_area::render(ui, &self.state.messages, &self.current_user.id);

            ui.separator();
            if let Some(content) = input_bar::render(ui, &mut self.state.input_text) {
                self.send_command(content);
            }
        });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Đóng cửa sổ = rời phòng: phiên sẽ phát LEAVE và đóng transport
        if let Err(err) = self.command_sender.try_send(SessionCommand::Leave) {
            log::warn!("Failed to send leave command: {err}");
        }
    }
}
