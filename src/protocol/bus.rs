use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

use super::envelope::{self, Envelope};

/// Mỗi envelope được nhân bản cho mọi subscription; receiver chậm sẽ bị lag
/// và mất tin — đúng tính chất best-effort của medium.
const MEDIUM_CAPACITY: usize = 256;

/// Medium phát sóng trong process: nhiều writer, nhiều reader, không thứ tự,
/// không bảo đảm giao nhận.
#[derive(Clone)]
pub struct BroadcastBus {
    shared: Arc<BusShared>,
}

struct BusShared {
    channel_id: String,
    sender: broadcast::Sender<Vec<u8>>,
}

impl BroadcastBus {
    pub fn open(channel_id: impl Into<String>) -> Self {
        let (sender, _) = broadcast::channel(MEDIUM_CAPACITY);
        Self {
            shared: Arc::new(BusShared {
                channel_id: channel_id.into(),
                sender,
            }),
        }
    }

    /// Gắn một phiên vào medium. Mỗi phiên sở hữu handle riêng của nó,
    /// không có singleton toàn process.
    pub fn attach(&self, peer_id: impl Into<String>) -> ChannelHandle {
        ChannelHandle {
            shared: self.shared.clone(),
            peer_id: peer_id.into(),
            open: AtomicBool::new(true),
        }
    }
}

/// Handle của một phiên lên medium. Publish sau khi `close` bị drop
/// trong im lặng (chỉ log debug) — không bao giờ ném lỗi lên tầng trên.
pub struct ChannelHandle {
    shared: Arc<BusShared>,
    peer_id: String,
    open: AtomicBool,
}

impl ChannelHandle {
    /// No-op nếu handle đã mở; mở lại handle đã đóng.
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn channel_id(&self) -> &str {
        &self.shared.channel_id
    }

    /// Fire-and-forget: không xác nhận giao nhận, không thứ tự giữa các
    /// publisher. Không có receiver nào cũng không phải là lỗi.
    pub fn publish(&self, envelope: &Envelope) {
        if !self.is_open() {
            log::debug!(
                "Publish on closed channel `{}` dropped",
                self.shared.channel_id
            );
            return;
        }
        match envelope::encode(envelope) {
            Ok(bytes) => {
                let _ = self.shared.sender.send(bytes);
            }
            Err(err) => {
                log::warn!("Failed to serialize envelope: {err}");
            }
        }
    }

    /// Mỗi lần gọi tạo một subscription độc lập (fan-out). Hủy đăng ký
    /// bằng cách drop subscription.
    pub fn subscribe(&self) -> BusSubscription {
        BusSubscription {
            receiver: self.shared.sender.subscribe(),
            local_peer_id: self.peer_id.clone(),
        }
    }

    /// Idempotent. Handle đóng rồi vẫn giữ được subscription cũ, nhưng
    /// mọi publish tiếp theo bị bỏ qua.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

/// Một subscription nhận mọi envelope trên medium trừ envelope có senderId
/// của chính phiên này — lọc self-origin nằm ở biên transport, các tầng
/// trên không bao giờ thấy echo của mình.
pub struct BusSubscription {
    receiver: broadcast::Receiver<Vec<u8>>,
    local_peer_id: String,
}

impl BusSubscription {
    /// Envelope hợp lệ tiếp theo; `None` khi medium đã bị giải phóng hẳn.
    pub async fn recv(&mut self) -> Option<Envelope> {
        loop {
            match self.receiver.recv().await {
                Ok(bytes) => {
                    if let Some(envelope) = self.filter_decode(&bytes) {
                        return Some(envelope);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Subscription lagged; {skipped} envelopes lost");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Biến thể không chặn, dùng khi caller tự điều phối vòng lặp.
    pub fn try_recv(&mut self) -> Option<Envelope> {
        loop {
            match self.receiver.try_recv() {
                Ok(bytes) => {
                    if let Some(envelope) = self.filter_decode(&bytes) {
                        return Some(envelope);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    log::warn!("Subscription lagged; {skipped} envelopes lost");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => return None,
            }
        }
    }

    fn filter_decode(&self, bytes: &[u8]) -> Option<Envelope> {
        match envelope::decode(bytes) {
            Ok(envelope) if envelope.sender_id == self.local_peer_id => None,
            Ok(envelope) => Some(envelope),
            Err(err) => {
                log::debug!("Dropping undecodable envelope: {err}");
                None
            }
        }
    }
}
