use crate::{dto::output, error::Error};
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Find all notifications sent to the recipient
    ///
    /// ### Returns
    /// Vec of notifications, newest first
    ///
    async fn find_notifications(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<output::Notification>, Error>;

    ///
    /// Find the most recent notification sent to the recipient
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when
    ///     - recipient has no notifications
    ///
    async fn find_latest_notification(
        &self,
        recipient_id: &str,
    ) -> Result<output::Notification, Error>;
}
