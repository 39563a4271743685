use crate::{error::Error, repository::Notification};
use axum::async_trait;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DuplicateDetectionService: Send + Sync {
    ///
    /// Finds already delivered notification with the same content
    /// sent to the recipient on the channel within deduplication window.
    ///
    async fn find_duplicate(
        &self,
        recipient_id: &str,
        channel_type: &str,
        content_hash: &str,
        now: OffsetDateTime,
    ) -> Result<Option<Notification>, Error>;
}
