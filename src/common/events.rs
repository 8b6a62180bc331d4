use crate::common::types::{ChatMessage, Peer};

/// Sự kiện từ phiên giao thức gửi lên UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MessageAppended(ChatMessage),
    PeerJoined(Peer),
    PeerLeft(String),
}
