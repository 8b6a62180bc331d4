use crate::common::Peer;

/// Danh sách hiện diện của một phiên. Thuần dữ liệu, không I/O.
///
/// Bản ghi không mang timestamp độ tươi, nên bản tin đến muộn không được
/// phép ghi đè bản ghi sẵn có: first-seen wins cho tới khi có LEAVE tường
/// minh.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: Vec<Peer>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert iff chưa có bản ghi với id này; trả về true nếu có thay đổi.
    pub fn upsert_if_absent(&mut self, peer: Peer) -> bool {
        if self.peers.iter().any(|known| known.id == peer.id) {
            return false;
        }
        self.peers.push(peer);
        true
    }

    pub fn remove(&mut self, peer_id: &str) -> bool {
        let before = self.peers.len();
        self.peers.retain(|peer| peer.id != peer_id);
        self.peers.len() != before
    }

    pub fn contains(&self, peer_id: &str) -> bool {
        self.peers.iter().any(|peer| peer.id == peer_id)
    }

    /// Thứ tự chèn, ổn định cho cùng một chuỗi input.
    pub fn snapshot(&self) -> Vec<Peer> {
        self.peers.clone()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(id: &str, name: &str) -> Peer {
        Peer {
            id: id.to_string(),
            display_name: name.to_string(),
            online: true,
        }
    }

    #[test]
    fn upsert_is_idempotent_and_first_seen_wins() {
        let mut registry = PeerRegistry::new();

        assert!(registry.upsert_if_absent(peer("a", "Alice")));
        assert!(!registry.upsert_if_absent(peer("a", "Alice")));
        // Duplicate đến muộn với tên khác không được ghi đè
        assert!(!registry.upsert_if_absent(peer("a", "Mallory")));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].display_name, "Alice");
    }

    #[test]
    fn remove_deletes_if_present_and_ignores_otherwise() {
        let mut registry = PeerRegistry::new();
        registry.upsert_if_absent(peer("a", "Alice"));

        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(!registry.contains("a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut registry = PeerRegistry::new();
        registry.upsert_if_absent(peer("c", "Carol"));
        registry.upsert_if_absent(peer("a", "Alice"));
        registry.upsert_if_absent(peer("b", "Bob"));
        registry.upsert_if_absent(peer("a", "Alice"));

        let ids: Vec<_> = registry.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }
}
