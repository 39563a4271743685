pub mod dispatch_service;
pub mod duplicate_detection_service;
pub mod notifications_consumer_service;
pub mod notifications_service;
pub mod preferences_service;
pub mod provider;
pub mod rate_limit_service;
