use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::common::{ChatMessage, Peer};

/// Đơn vị truyền trên medium: type + senderId + payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(flatten)]
    pub kind: EnvelopeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EnvelopeKind {
    #[serde(rename = "JOIN")]
    Join(Peer),
    #[serde(rename = "LEAVE")]
    Leave(Peer),
    #[serde(rename = "CHAT")]
    Chat(ChatMessage),
    #[serde(rename = "HEARTBEAT")]
    Heartbeat(Peer),
    #[serde(rename = "SYNC_REQUEST")]
    SyncRequest,
}

const KNOWN_TYPES: [&str; 5] = ["JOIN", "LEAVE", "CHAT", "HEARTBEAT", "SYNC_REQUEST"];

impl Envelope {
    pub fn join(peer: &Peer) -> Self {
        Self {
            sender_id: peer.id.clone(),
            kind: EnvelopeKind::Join(peer.clone()),
        }
    }

    pub fn leave(peer: &Peer) -> Self {
        Self {
            sender_id: peer.id.clone(),
            kind: EnvelopeKind::Leave(peer.clone()),
        }
    }

    pub fn heartbeat(peer: &Peer) -> Self {
        Self {
            sender_id: peer.id.clone(),
            kind: EnvelopeKind::Heartbeat(peer.clone()),
        }
    }

    pub fn chat(sender_id: &str, message: ChatMessage) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            kind: EnvelopeKind::Chat(message),
        }
    }

    pub fn sync_request(sender_id: &str) -> Self {
        Self {
            sender_id: sender_id.to_string(),
            kind: EnvelopeKind::SyncRequest,
        }
    }
}

/// Input từ medium là untrusted: lỗi decode chỉ dẫn đến drop, không bao giờ panic.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown envelope type `{0}`")]
    UnknownType(String),
    #[error("malformed envelope payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(envelope)
}

pub fn decode(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value.get("type").and_then(Value::as_str) {
        Some(kind) if !KNOWN_TYPES.contains(&kind) => {
            Err(DecodeError::UnknownType(kind.to_string()))
        }
        _ => Ok(serde_json::from_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_peer() -> Peer {
        Peer {
            id: "peer-1".to_string(),
            display_name: "Alice".to_string(),
            online: true,
        }
    }

    #[test]
    fn round_trips_every_envelope_kind() {
        let peer = sample_peer();
        let message = ChatMessage::text(&peer, "hello");
        let envelopes = [
            Envelope::join(&peer),
            Envelope::leave(&peer),
            Envelope::heartbeat(&peer),
            Envelope::chat(&peer.id, message),
            Envelope::sync_request(&peer.id),
        ];

        for envelope in envelopes {
            let bytes = encode(&envelope).unwrap();
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded, envelope);
        }
    }

    #[test]
    fn wire_shape_matches_channel_format() {
        let envelope = Envelope::join(&sample_peer());
        let value: Value = serde_json::from_slice(&encode(&envelope).unwrap()).unwrap();

        assert_eq!(value["type"], "JOIN");
        assert_eq!(value["senderId"], "peer-1");
        assert_eq!(value["payload"]["displayName"], "Alice");
        assert_eq!(value["payload"]["online"], true);
    }

    #[test]
    fn unknown_type_is_reported_as_such() {
        let bytes = br#"{"type":"SYNC_RESPONSE","senderId":"x","payload":null}"#;
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::UnknownType(kind)) if kind == "SYNC_RESPONSE"
        ));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        // JOIN phải mang một Peer, không phải chuỗi
        let bytes = br#"{"type":"JOIN","senderId":"x","payload":"not-a-peer"}"#;
        assert!(matches!(
            decode(bytes),
            Err(DecodeError::MalformedPayload(_))
        ));

        assert!(matches!(
            decode(b"not json at all"),
            Err(DecodeError::MalformedPayload(_))
        ));
    }

    #[test]
    fn sync_request_accepts_null_payload() {
        // SYNC_REQUEST không mang payload; một số sender gửi null tường minh
        let bytes = br#"{"type":"SYNC_REQUEST","senderId":"x","payload":null}"#;
        let decoded = decode(bytes).unwrap();
        assert_eq!(decoded, Envelope::sync_request("x"));
    }
}
