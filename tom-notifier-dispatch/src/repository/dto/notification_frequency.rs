use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationFrequency {
    pub recipient_id: String,
    pub channel_type: String,
    pub last_sent_at: OffsetDateTime,
    pub daily_count: i32,
    /// UTC calendar day the counter belongs to
    pub date: Date,
}

impl NotificationFrequency {
    ///
    /// Counter used when recipient was not contacted on the channel today
    ///
    pub fn empty(recipient_id: &str, channel_type: &str, date: Date) -> Self {
        Self {
            recipient_id: recipient_id.to_string(),
            channel_type: channel_type.to_string(),
            last_sent_at: OffsetDateTime::UNIX_EPOCH,
            daily_count: 0,
            date,
        }
    }
}
