use thiserror::Error;
use tokio::sync::mpsc;

use crate::common::{ChatMessage, Peer, SessionCommand, SessionEvent};

use super::bus::{BroadcastBus, BusSubscription, ChannelHandle};
use super::envelope::{Envelope, EnvelopeKind};
use super::message_log::MessageLog;
use super::registry::PeerRegistry;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Medium không dùng được khi phiên khởi động — lỗi chí mạng duy nhất.
    #[error("broadcast medium unavailable on channel `{0}`")]
    TransportUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Joining,
    Active,
    /// Trạng thái cuối, không quay lại.
    Left,
}

/// Một phiên tham gia phòng chat: state machine Joining -> Active -> Left.
///
/// Mọi mutation của registry và log đi qua đúng một vòng lặp sự kiện
/// (lệnh từ UI và envelope từ medium được serialize vào cùng một actor),
/// nên không cần khóa nội bộ.
pub struct ChatSession {
    self_peer: Peer,
    state: SessionState,
    registry: PeerRegistry,
    log: MessageLog,
    handle: ChannelHandle,
    subscription: BusSubscription,
    event_sender: mpsc::Sender<SessionEvent>,
    command_receiver: mpsc::Receiver<SessionCommand>,
}

impl ChatSession {
    pub fn new(
        self_peer: Peer,
        bus: &BroadcastBus,
        event_sender: mpsc::Sender<SessionEvent>,
        command_receiver: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        let handle = bus.attach(&self_peer.id);
        let subscription = handle.subscribe();
        Self {
            self_peer,
            state: SessionState::Joining,
            registry: PeerRegistry::new(),
            log: MessageLog::new(),
            handle,
            subscription,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), SessionError> {
        self.start().await?;
        log::info!(
            "Session {} joined channel `{}`",
            self.self_peer.id,
            self.handle.channel_id()
        );

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(SessionCommand::SendChat(content)) => {
                            self.send_chat(content).await;
                        }
                        // Kênh lệnh đóng cũng là tín hiệu rời phòng
                        Some(SessionCommand::Leave) | None => break,
                    }
                }
                envelope = self.subscription.recv() => {
                    match envelope {
                        Some(envelope) => self.handle_envelope(envelope).await,
                        None => {
                            log::warn!("Broadcast medium released; leaving session");
                            break;
                        }
                    }
                }
            }
        }

        self.leave();
        Ok(())
    }

    /// Khởi động phiên: tự ghi danh, phát JOIN rồi SYNC_REQUEST để mọi peer
    /// đang hoạt động tự giới thiệu lại qua HEARTBEAT.
    async fn start(&mut self) -> Result<(), SessionError> {
        if !self.handle.is_open() {
            return Err(SessionError::TransportUnavailable(
                self.handle.channel_id().to_string(),
            ));
        }

        self.registry.upsert_if_absent(self.self_peer.clone());
        self.handle.publish(&Envelope::join(&self.self_peer));
        self.handle.publish(&Envelope::sync_request(&self.self_peer.id));
        self.state = SessionState::Active;

        let welcome = ChatMessage::system(format!(
            "Welcome to the chat, {}! Open another session on this channel to chat.",
            self.self_peer.display_name
        ));
        if self.log.append(welcome.clone()) {
            self.emit(SessionEvent::MessageAppended(welcome)).await;
        }
        Ok(())
    }

    /// Gửi tin của chính mình: append cục bộ trước, rồi phát CHAT. Transport
    /// lọc self-origin nên bản phát đi không bao giờ quay lại phiên này.
    async fn send_chat(&mut self, content: String) {
        let content = content.trim().to_string();
        if content.is_empty() || self.state != SessionState::Active {
            return;
        }

        let message = ChatMessage::text(&self.self_peer, content);
        if self.log.append(message.clone()) {
            self.emit(SessionEvent::MessageAppended(message.clone())).await;
        }
        self.handle.publish(&Envelope::chat(&self.self_peer.id, message));
    }

    async fn handle_envelope(&mut self, envelope: Envelope) {
        match envelope.kind {
            EnvelopeKind::Join(peer) => {
                if self.registry.upsert_if_absent(peer.clone()) {
                    // Người mới biết được toàn bộ thành viên nhờ mỗi peer
                    // hiện diện trả lời JOIN bằng một HEARTBEAT
                    self.handle.publish(&Envelope::heartbeat(&self.self_peer));
                    self.emit(SessionEvent::PeerJoined(peer)).await;
                }
            }
            EnvelopeKind::Heartbeat(peer) => {
                // HEARTBEAT không bao giờ kích HEARTBEAT khác (tránh bão tin)
                if self.registry.upsert_if_absent(peer.clone()) {
                    self.emit(SessionEvent::PeerJoined(peer)).await;
                }
            }
            EnvelopeKind::SyncRequest => {
                self.handle.publish(&Envelope::heartbeat(&self.self_peer));
            }
            EnvelopeKind::Chat(message) => {
                if self.log.append(message.clone()) {
                    self.emit(SessionEvent::MessageAppended(message)).await;
                }
            }
            EnvelopeKind::Leave(peer) => {
                if self.registry.remove(&peer.id) {
                    self.emit(SessionEvent::PeerLeft(peer.id)).await;
                }
            }
        }
    }

    /// Phát LEAVE rồi đóng handle. Idempotent.
    fn leave(&mut self) {
        if self.state == SessionState::Left {
            return;
        }
        self.handle.publish(&Envelope::leave(&self.self_peer));
        self.handle.close();
        self.state = SessionState::Left;
        log::info!("Session {} left the channel", self.self_peer.id);
    }

    async fn emit(&self, event: SessionEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}
