use std::time::Duration;

pub struct RateLimitServiceConfig {
    pub min_interval: Duration,
    pub max_daily_notifications: u32,
}
