use super::NotificationsService;
use crate::{dto::output, error::Error, repository::NotificationsRepository};
use axum::async_trait;
use std::sync::Arc;

pub struct NotificationsServiceImpl {
    repository: Arc<dyn NotificationsRepository>,
}

impl NotificationsServiceImpl {
    pub fn new(repository: Arc<dyn NotificationsRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn find_notifications(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<output::Notification>, Error> {
        tracing::info!("finding notifications");

        let notifications = self
            .repository
            .find_many_by_recipient(recipient_id)
            .await?
            .into_iter()
            .map(output::Notification::from)
            .collect::<Vec<_>>();

        tracing::info!(len = notifications.len(), "found notifications");

        Ok(notifications)
    }

    async fn find_latest_notification(
        &self,
        recipient_id: &str,
    ) -> Result<output::Notification, Error> {
        tracing::info!("finding latest notification");

        let notification = self
            .repository
            .find_latest_by_recipient(recipient_id)
            .await?
            .ok_or(Error::NotificationNotExist)?;

        tracing::info!("found notification");

        Ok(notification.into())
    }
}
