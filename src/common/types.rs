use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain model đại diện một người tham gia phòng chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    pub id: String,
    pub display_name: String,
    pub online: bool,
}

impl Peer {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.into(),
            online: true,
        }
    }
}

/// Phân loại tin nhắn: do người gửi hay do hệ thống sinh ra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    System,
}

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: i64,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn text(sender: &Peer, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: sender.id.clone(),
            sender_name: sender.display_name.clone(),
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            kind: MessageKind::Text,
        }
    }

    /// Tin nhắn hệ thống tạo cục bộ, không bao giờ phát lên medium.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: format!("system-{}", Uuid::new_v4()),
            sender_id: "system".to_string(),
            sender_name: "System".to_string(),
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            kind: MessageKind::System,
        }
    }
}
