#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    TooFrequent { retry_after_seconds: i64, reason: String },
    DailyLimitReached { limit: u32, reason: String },
}
