use super::NotificationResponseEntity;
use crate::repository::{Notification, NotificationStatus};
use bson::{oid::ObjectId, DateTime};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct NotificationFindEntity {
    pub _id: ObjectId,
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    pub channel_type: String,
    pub status: NotificationStatus,
    #[serde(default)]
    pub delivery_attempts: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub content_hash: String,
    pub response: Option<NotificationResponseEntity>,
}

impl From<NotificationFindEntity> for Notification {
    fn from(value: NotificationFindEntity) -> Self {
        Self {
            id: Some(value._id),
            recipient_id: value.recipient_id,
            title: value.title,
            body: value.body,
            channel_type: value.channel_type,
            status: value.status,
            delivery_attempts: value.delivery_attempts,
            created_at: value.created_at.into(),
            updated_at: value.updated_at.into(),
            content_hash: value.content_hash,
            response: value.response.map(Into::into),
        }
    }
}
