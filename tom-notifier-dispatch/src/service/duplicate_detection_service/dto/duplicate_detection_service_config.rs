use std::time::Duration;

pub struct DuplicateDetectionServiceConfig {
    pub deduplication_window: Duration,
}
