use std::collections::HashSet;

use crate::common::ChatMessage;

/// Log tin nhắn append-only theo thứ tự đến cục bộ, khử trùng lặp theo id.
/// Hai peer có thể thấy cùng một cặp tin theo thứ tự khác nhau — chấp nhận.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<ChatMessage>,
    seen_ids: HashSet<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// False nếu id đã có — duplicate là no-op, không phải lỗi.
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if !self.seen_ids.insert(message.id.clone()) {
            return false;
        }
        self.entries.push(message);
        true
    }

    pub fn all(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Peer;

    fn message(id: &str, content: &str) -> ChatMessage {
        let mut message = ChatMessage::text(&Peer::new("Alice"), content);
        message.id = id.to_string();
        message
    }

    #[test]
    fn duplicate_ids_are_appended_exactly_once() {
        let mut log = MessageLog::new();

        assert!(log.append(message("m1", "hello")));
        assert!(!log.append(message("m1", "hello")));
        assert!(log.append(message("m2", "world")));

        assert_eq!(log.len(), 2);
    }

    #[test]
    fn all_iterates_in_arrival_order_and_restarts() {
        let mut log = MessageLog::new();
        log.append(message("m2", "second sent, first seen"));
        log.append(message("m1", "first sent, second seen"));

        let ids: Vec<_> = log.all().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["m2", "m1"]);

        // Iterator khởi động lại được, log không bị tiêu thụ
        assert_eq!(log.all().count(), 2);
    }
}
