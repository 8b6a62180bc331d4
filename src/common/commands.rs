/// Lệnh UI gửi xuống phiên giao thức.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    SendChat(String),
    /// Rời phòng: phát LEAVE rồi đóng transport.
    Leave,
}
