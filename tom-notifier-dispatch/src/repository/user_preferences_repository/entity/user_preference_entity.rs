use crate::repository::{NotificationChannel, UserPreference};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct UserPreferenceEntity {
    pub recipient_id: String,
    #[serde(default)]
    pub channels: Vec<NotificationChannelEntity>,
}

#[derive(Serialize, Deserialize)]
pub struct NotificationChannelEntity {
    #[serde(rename = "type")]
    pub channel_type: String,
    pub token: Option<String>,
    pub enabled: bool,
}

impl From<&UserPreference> for UserPreferenceEntity {
    fn from(value: &UserPreference) -> Self {
        Self {
            recipient_id: value.recipient_id.clone(),
            channels: value
                .channels
                .iter()
                .map(|channel| NotificationChannelEntity {
                    channel_type: channel.channel_type.clone(),
                    token: channel.token.clone(),
                    enabled: channel.enabled,
                })
                .collect(),
        }
    }
}

impl From<UserPreferenceEntity> for UserPreference {
    fn from(value: UserPreferenceEntity) -> Self {
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
