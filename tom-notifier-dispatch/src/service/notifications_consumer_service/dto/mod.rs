mod notifications_consumer_service_config;

pub use notifications_consumer_service_config::*;
