use std::time::Duration;

#[derive(Clone)]
pub struct RabbitmqConnectionConfig {
    /// Interval between attempts to restore connection, channels and consumers
    pub retry_interval: Duration,
}
