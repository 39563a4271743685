use super::{DuplicateDetectionService, DuplicateDetectionServiceConfig};
use crate::{
    error::Error,
    repository::{Notification, NotificationStatus, NotificationsRepository},
};
use axum::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

pub struct DuplicateDetectionServiceImpl {
    config: DuplicateDetectionServiceConfig,
    repository: Arc<dyn NotificationsRepository>,
}

impl DuplicateDetectionServiceImpl {
    pub fn new(
        config: DuplicateDetectionServiceConfig,
        repository: Arc<dyn NotificationsRepository>,
    ) -> Self {
        Self { config, repository }
    }
}

#[async_trait]
impl DuplicateDetectionService for DuplicateDetectionServiceImpl {
    async fn find_duplicate(
        &self,
        recipient_id: &str,
        channel_type: &str,
        content_hash: &str,
        now: OffsetDateTime,
    ) -> Result<Option<Notification>, Error> {
        let since = now - self.config.deduplication_window;
        tracing::trace!(%since, "looking for duplicates");

        let duplicate = self
            .repository
            .find_duplicates(recipient_id, channel_type, content_hash, since)
            .await?
            .into_iter()
            .find(|notification| notification.status == NotificationStatus::Delivered);

        Ok(duplicate)
    }
}
