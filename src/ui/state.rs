use crate::common::{ChatMessage, Peer};

/// Trạng thái cục bộ của UI.
pub struct AppState {
    pub messages: Vec<ChatMessage>,
    pub input_text: String,
    pub peers: Vec<Peer>,
}

impl AppState {
    pub fn new(current_user: Peer) -> Self {
        Self {
            messages: Vec::new(),
            input_text: String::new(),
            peers: vec![current_user],
        }
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_peer(&mut self, peer: Peer) {
        if !self.peers.iter().any(|known| known.id == peer.id) {
            self.peers.push(peer);
        }
    }

    pub fn remove_peer(&mut self, peer_id: &str) {
        self.peers.retain(|peer| peer.id != peer_id);
    }
}
