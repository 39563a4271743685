use crate::repository::NotificationFrequency;
use bson::DateTime;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

#[derive(Serialize, Deserialize)]
pub struct NotificationFrequencyEntity {
    pub recipient_id: String,
    pub channel_type: String,
    pub last_sent_at: DateTime,
    pub daily_count: i32,
    /// UTC midnight of the counted day
    pub date: DateTime,
}

pub fn date_to_bson(date: Date) -> DateTime {
    DateTime::from(date.midnight().assume_utc())
}

impl From<&NotificationFrequency> for NotificationFrequencyEntity {
    fn from(value: &NotificationFrequency) -> Self {
        Self {
            recipient_id: value.recipient_id.clone(),
            channel_type: value.channel_type.clone(),
            last_sent_at: value.last_sent_at.into(),
            daily_count: value.daily_count,
            date: date_to_bson(value.date),
        }
    }
}

impl From<NotificationFrequencyEntity> for NotificationFrequency {
    fn from(value: NotificationFrequencyEntity) -> Self {
        Self {
            recipient_id: value.recipient_id,
            channel_type: value.channel_type,
            last_sent_at: value.last_sent_at.into(),
            daily_count: value.daily_count,
            date: OffsetDateTime::from(value.date).date(),
        }
    }
}
