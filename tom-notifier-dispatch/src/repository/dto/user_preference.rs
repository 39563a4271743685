#[derive(Debug, Clone, PartialEq)]
pub struct UserPreference {
    pub recipient_id: String,
    pub channels: Vec<NotificationChannel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationChannel {
    pub channel_type: String,
    pub token: Option<String>,
    pub enabled: bool,
}
