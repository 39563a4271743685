use crate::{dto::input, error::Error, repository::Notification};
use axum::async_trait;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchService: Send + Sync {
    ///
    /// Runs single notification through the whole pipeline:
    /// duplicate detection, recipient preference, rate limits and provider.
    ///
    /// Policy rejections are not errors, returned notification
    /// carries terminal status and response explaining the outcome.
    ///
    /// ### Errors
    /// - [Error::Provider] when provider failed or is not configured,
    ///   notification is persisted as FAILED
    /// - [Error::Database] when any store operation failed
    ///
    async fn dispatch(
        &self,
        request: input::NotificationRequest,
        now: OffsetDateTime,
    ) -> Result<Notification, Error>;
}
