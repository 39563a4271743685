use crate::repository;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UserPreference {
    pub recipient_id: String,
    pub channels: Vec<NotificationChannel>,
}

#[derive(Debug, Serialize)]
pub struct NotificationChannel {
    #[serde(rename = "type")]
    pub channel_type: String,
    pub token: Option<String>,
    pub enabled: bool,
}

impl From<repository::UserPreference> for UserPreference {
    fn from(value: repository::UserPreference) -> Self {
        Self {
            recipient_id: value.recipient_id,
            channels: value
                .channels
                .into_iter()
                .map(|channel| NotificationChannel {
                    channel_type: channel.channel_type,
                    token: channel.token,
                    enabled: channel.enabled,
                })
                .collect(),
        }
    }
}
