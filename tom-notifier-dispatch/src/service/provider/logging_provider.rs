use super::{NotificationProvider, ProviderError};
use crate::dto::input;
use axum::async_trait;

const LOGGING: &str = "Logging";

///
/// Provider for channels without external integration.
/// Writes notification to the log and reports success.
///
#[derive(Default)]
pub struct LoggingProvider;

impl LoggingProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationProvider for LoggingProvider {
    fn name(&self) -> &'static str {
        LOGGING
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, request: &input::NotificationRequest) -> Result<(), ProviderError> {
        tracing::info!(
            channel = %request.channel_type(),
            recipient_id = request.recipient_id(),
            title = request.title(),
            body = request.body(),
            "notification sent"
        );

        Ok(())
    }
}
