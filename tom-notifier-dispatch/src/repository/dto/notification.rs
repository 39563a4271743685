use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Processing,
    Delivered,
    Failed,
    Duplicate,
    Blocked,
    BlockedFrequency,
    BlockedDailyLimit,
}

impl NotificationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            NotificationStatus::Pending | NotificationStatus::Processing
        )
    }

    pub fn can_transition_to(self, next: NotificationStatus) -> bool {
        use NotificationStatus::*;

        match (self, next) {
            (Pending, Processing)
            | (Pending, Duplicate)
            | (Pending, Blocked)
            | (Pending, BlockedFrequency)
            | (Pending, BlockedDailyLimit)
            | (Pending, Failed) => true,
            (Processing, Delivered) | (Processing, Failed) => true,
            (Pending, Pending | Delivered) => false,
            (Processing, _) => false,
            (Delivered | Failed | Duplicate | Blocked | BlockedFrequency | BlockedDailyLimit, _) => {
                false
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid status transition {from} -> {to}")]
pub struct InvalidStatusTransition {
    pub from: NotificationStatus,
    pub to: NotificationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// None until notification is saved for the first time
    pub id: Option<ObjectId>,
    pub recipient_id: String,
    pub title: String,
    pub body: String,
    pub channel_type: String,
    pub status: NotificationStatus,
    pub delivery_attempts: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub content_hash: String,
    pub response: Option<NotificationResponse>,
}

impl Notification {
    ///
    /// Moves notification to the next status.
    ///
    /// ### Errors
    /// - [InvalidStatusTransition] when the pair is not part of the lifecycle
    ///
    pub fn transition(
        &mut self,
        next: NotificationStatus,
        now: OffsetDateTime,
    ) -> Result<(), InvalidStatusTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = now;

        Ok(())
    }

    pub fn respond(&mut self, success: bool, message: String, now: OffsetDateTime) {
        self.response = Some(NotificationResponse {
            success,
            message,
            timestamp: now,
        });
    }
}
