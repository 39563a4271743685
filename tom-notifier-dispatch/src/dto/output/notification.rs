use crate::repository::{self, NotificationStatus};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: Option<String>,
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    pub channel_type: String,
    pub status: NotificationStatus,
    pub delivery_attempts: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub content_hash: String,
    pub response: Option<NotificationResponse>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<repository::Notification> for Notification {
    fn from(value: repository::Notification) -> Self {
        Self {
            id: value.id.map(|id| id.to_hex()),
            recipient_id: value.recipient_id,
            title: value.title,
            body: value.body,
            channel_type: value.channel_type,
            status: value.status,
            delivery_attempts: value.delivery_attempts,
            created_at: value.created_at,
            updated_at: value.updated_at,
            content_hash: value.content_hash,
            response: value.response.map(|response| NotificationResponse {
                success: response.success,
                message: response.message,
                timestamp: response.timestamp,
            }),
        }
    }
}
