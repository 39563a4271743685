#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPermission {
    Allowed,
    Blocked { reason: String },
}
