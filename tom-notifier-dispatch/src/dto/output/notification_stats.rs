use crate::repository::NotificationFrequency;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct NotificationStats {
    pub channel_type: String,
    pub daily_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub last_sent_at: OffsetDateTime,
}

impl From<NotificationFrequency> for NotificationStats {
    fn from(value: NotificationFrequency) -> Self {
        Self {
            channel_type: value.channel_type,
            daily_count: value.daily_count,
            last_sent_at: value.last_sent_at,
        }
    }
}
