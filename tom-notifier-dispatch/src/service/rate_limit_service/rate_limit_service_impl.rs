use super::{RateLimitDecision, RateLimitService, RateLimitServiceConfig};
use crate::{
    dto::{output, ChannelType},
    error::Error,
    repository::{NotificationFrequenciesRepository, NotificationFrequency},
};
use axum::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

pub struct RateLimitServiceImpl {
    config: RateLimitServiceConfig,
    repository: Arc<dyn NotificationFrequenciesRepository>,
}

impl RateLimitServiceImpl {
    pub fn new(
        config: RateLimitServiceConfig,
        repository: Arc<dyn NotificationFrequenciesRepository>,
    ) -> Self {
        Self { config, repository }
    }
}

#[async_trait]
impl RateLimitService for RateLimitServiceImpl {
    async fn check(
        &self,
        recipient_id: &str,
        channel_type: &str,
        now: OffsetDateTime,
    ) -> Result<RateLimitDecision, Error> {
        let today = now.date();
        let frequency = self
            .repository
            .find(recipient_id, channel_type, today)
            .await?
            .unwrap_or_else(|| NotificationFrequency::empty(recipient_id, channel_type, today));

        let min_interval_seconds = self.config.min_interval.as_secs() as i64;
        let elapsed_seconds = (now - frequency.last_sent_at).whole_seconds();
        if elapsed_seconds < min_interval_seconds {
            let retry_after_seconds = min_interval_seconds - elapsed_seconds;
            tracing::debug!(elapsed_seconds, retry_after_seconds, "min interval not passed");

            return Ok(RateLimitDecision::TooFrequent {
                retry_after_seconds,
                reason: format!(
                    "Notification rate limit hit for {recipient_id} on channel {channel_type} \
                    due to min interval. Please wait {retry_after_seconds} seconds."
                ),
            });
        }

        let limit = self.config.max_daily_notifications;
        if i64::from(frequency.daily_count) >= i64::from(limit) {
            tracing::debug!(daily_count = frequency.daily_count, "daily limit reached");

            return Ok(RateLimitDecision::DailyLimitReached {
                limit,
                reason: format!(
                    "Notification daily limit hit for {recipient_id} on channel {channel_type}. \
                    Max daily limit of {limit} reached."
                ),
            });
        }

        Ok(RateLimitDecision::Allowed)
    }

    async fn record_send(
        &self,
        recipient_id: &str,
        channel_type: &str,
        now: OffsetDateTime,
    ) -> Result<(), Error> {
        let today = now.date();
        let frequency = match self
            .repository
            .find(recipient_id, channel_type, today)
            .await?
        {
            Some(mut frequency) => {
                if frequency.date != today {
                    frequency.daily_count = 1;
                    frequency.date = today;
                } else {
                    frequency.daily_count += 1;
                }
                frequency.last_sent_at = now;
                frequency
            }
            None => NotificationFrequency {
                recipient_id: recipient_id.to_string(),
                channel_type: channel_type.to_string(),
                last_sent_at: now,
                daily_count: 1,
                date: today,
            },
        };

        self.repository.save(&frequency).await?;
        tracing::debug!(daily_count = frequency.daily_count, "recorded send");

        Ok(())
    }

    async fn find_stats(
        &self,
        recipient_id: &str,
        channel_type: Option<ChannelType>,
        now: OffsetDateTime,
    ) -> Result<Vec<output::NotificationStats>, Error> {
        tracing::info!("finding stats");

        let today = now.date();
        let frequencies = match channel_type {
            Some(channel_type) => self
                .repository
                .find(recipient_id, channel_type.as_ref(), today)
                .await?
                .into_iter()
                .collect::<Vec<_>>(),
            None => self.repository.find_many(recipient_id, today).await?,
        };

        let stats = frequencies
            .into_iter()
            .map(output::NotificationStats::from)
            .collect();

        Ok(stats)
    }
}
