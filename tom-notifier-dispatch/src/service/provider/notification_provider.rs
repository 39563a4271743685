use super::ProviderError;
use crate::dto::input;
use axum::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    ///
    /// Provider that is not configured must not be asked to send
    ///
    fn is_configured(&self) -> bool;

    async fn send(&self, request: &input::NotificationRequest) -> Result<(), ProviderError>;
}
