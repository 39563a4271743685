use super::RateLimitDecision;
use crate::{
    dto::{output, ChannelType},
    error::Error,
};
use axum::async_trait;
use time::OffsetDateTime;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitService: Send + Sync {
    ///
    /// Checks minimum interval since last send and daily cap
    /// against today's counter of the recipient's channel.
    ///
    async fn check(
        &self,
        recipient_id: &str,
        channel_type: &str,
        now: OffsetDateTime,
    ) -> Result<RateLimitDecision, Error>;

    ///
    /// Counts successful send. Must not be called for failed sends.
    ///
    async fn record_send(
        &self,
        recipient_id: &str,
        channel_type: &str,
        now: OffsetDateTime,
    ) -> Result<(), Error>;

    ///
    /// Finds today's counters of one channel or all recipient's channels
    ///
    async fn find_stats(
        &self,
        recipient_id: &str,
        channel_type: Option<ChannelType>,
        now: OffsetDateTime,
    ) -> Result<Vec<output::NotificationStats>, Error>;
}
