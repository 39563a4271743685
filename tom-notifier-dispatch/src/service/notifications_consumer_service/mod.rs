mod dto;
mod notifications_consumer_service;

pub use dto::{NotificationQueueConfig, NotificationsConsumerServiceConfig};
pub use notifications_consumer_service::*;
