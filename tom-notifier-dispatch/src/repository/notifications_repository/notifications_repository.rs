use crate::repository::{Error, Notification};
use axum::async_trait;
use bson::oid::ObjectId;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts notification when it has no id yet,
    /// otherwise replaces stored document.
    ///
    /// ### Returns
    /// ID of saved notification
    ///
    async fn save(&self, notification: &Notification) -> Result<ObjectId, Error>;

    ///
    /// Finds notifications with the same content hash
    /// sent to the recipient on the channel since `since`.
    /// Oldest first.
    ///
    async fn find_duplicates(
        &self,
        recipient_id: &str,
        channel_type: &str,
        content_hash: &str,
        since: OffsetDateTime,
    ) -> Result<Vec<Notification>, Error>;

    ///
    /// Finds all notifications of the recipient. Newest first.
    ///
    async fn find_many_by_recipient(&self, recipient_id: &str)
        -> Result<Vec<Notification>, Error>;

    async fn find_latest_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Notification>, Error>;
}
