use crate::repository::{Notification, NotificationResponse, NotificationStatus};
use bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct NotificationEntity<'a> {
    pub recipient_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub channel_type: &'a str,
    pub status: NotificationStatus,
    pub delivery_attempts: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub content_hash: &'a str,
    pub response: Option<NotificationResponseEntity>,
}

#[derive(Serialize, Deserialize)]
pub struct NotificationResponseEntity {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime,
}

impl<'a> From<&'a Notification> for NotificationEntity<'a> {
    fn from(value: &'a Notification) -> Self {
        Self {
            recipient_id: &value.recipient_id,
            title: &value.title,
            body: &value.body,
            channel_type: &value.channel_type,
            status: value.status,
            delivery_attempts: value.delivery_attempts,
            created_at: value.created_at.into(),
            updated_at: value.updated_at.into(),
            content_hash: &value.content_hash,
            response: value.response.as_ref().map(|response| NotificationResponseEntity {
                success: response.success,
                message: response.message.clone(),
                timestamp: response.timestamp.into(),
            }),
        }
    }
}

impl From<NotificationResponseEntity> for NotificationResponse {
    fn from(value: NotificationResponseEntity) -> Self {
        Self {
            success: value.success,
            message: value.message,
            timestamp: value.timestamp.into(),
        }
    }
}
